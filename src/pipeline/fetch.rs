//! Fetch: download the PDF named by the request into memory.
//!
//! pdfium can load a document straight from a byte slice, so the body is
//! buffered in memory rather than spooled to disk. The `reqwest::Response`
//! is consumed by `bytes()` or dropped on the error paths before this
//! function returns, which hands the connection back to the pool (or closes
//! it) regardless of outcome.
//!
//! The PDF signature is checked before anything reaches the renderer so a
//! plain-text or HTML answer fails fast with a meaningful error.

use crate::error::Pdf2PngError;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

/// How far into the body the `%PDF-` header may appear. Some producers emit
/// leading junk and pdfium tolerates it within the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Build the process-wide HTTP client used for downloads.
pub fn build_client() -> Result<Client, Pdf2PngError> {
    Client::builder()
        .user_agent(concat!("pdf2png/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Pdf2PngError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// GET `url` and return the body if it looks like a PDF.
///
/// `timeout_secs` is optional; when `None` the request may run until the
/// Lambda invocation itself times out.
pub async fn download_pdf(
    client: &Client,
    url: &Url,
    timeout_secs: Option<u64>,
) -> Result<Vec<u8>, Pdf2PngError> {
    info!(url = %url, "Downloading PDF");

    let mut request = client.get(url.clone());
    if let Some(secs) = timeout_secs {
        request = request.timeout(Duration::from_secs(secs));
    }

    let map_transport = |e: reqwest::Error| match timeout_secs {
        Some(secs) if e.is_timeout() => Pdf2PngError::FetchTimeout {
            url: url.to_string(),
            secs,
        },
        _ => Pdf2PngError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        },
    };

    let response = request.send().await.map_err(map_transport)?;

    if !response.status().is_success() {
        return Err(Pdf2PngError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_transport)?;
    debug!(url = %url, bytes = bytes.len(), "Download complete");

    check_pdf_header(url.as_str(), &bytes)?;
    Ok(bytes.to_vec())
}

/// Reject bodies that do not carry a `%PDF-` header near the start.
pub fn check_pdf_header(url: &str, bytes: &[u8]) -> Result<(), Pdf2PngError> {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        return Ok(());
    }
    Err(Pdf2PngError::NotAPdf {
        url: url.to_string(),
        magic: bytes.iter().take(4).copied().collect(),
    })
}
