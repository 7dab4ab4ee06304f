//! Error types for the pdf2png handler.
//!
//! [`Pdf2PngError`] carries the full detail of what went wrong so it can be
//! logged, while [`ErrorKind`] collapses it to the step that failed. Callers
//! of the Lambda never see either: every request-time error becomes the same
//! generic 500 response (see [`crate::event::ProxyResponse::failure`]).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while handling a request or starting the function.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Request errors ────────────────────────────────────────────────────
    /// The invocation body could not be turned into a `PdfRequest`.
    #[error("Malformed request: {detail}")]
    MalformedRequest { detail: String },

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The URL could not be fetched or answered with a non-success status.
    #[error("Failed to download '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// The optional download timeout elapsed.
    #[error("Download timed out after {secs}s for '{url}'")]
    FetchTimeout { url: String, secs: u64 },

    /// The downloaded body does not start with the `%PDF` signature.
    #[error("Content at '{url}' is not a PDF (first bytes: {magic:?})")]
    NotAPdf { url: String, magic: Vec<u8> },

    // ── Render errors ─────────────────────────────────────────────────────
    /// pdfium could not parse the document.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// The document is encrypted and no password is available.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// The document parsed but has no pages to render.
    #[error("PDF has no pages")]
    EmptyDocument,

    /// pdfium failed while rasterising the first page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The rendered bitmap could not be encoded as PNG.
    #[error("PNG encoding failed: {0}")]
    EncodeFailed(#[from] image::ImageError),

    // ── Upload errors ─────────────────────────────────────────────────────
    /// The object store rejected the write or could not be reached.
    #[error("Failed to upload '{key}' to bucket '{bucket}': {reason}")]
    UploadFailed {
        bucket: String,
        key: String,
        reason: String,
    },

    // ── Startup errors ────────────────────────────────────────────────────
    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {reason}\n\
Set PDFIUM_LIB_PATH to the libpdfium file or its directory, or deploy it in a layer under /opt/lib."
    )]
    PdfiumBindingFailed {
        path: Option<PathBuf>,
        reason: String,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked blocking task).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline step a [`Pdf2PngError`] belongs to.
///
/// Logged alongside every failure so operators can tell a dead source URL
/// from a storage permission problem even though callers get the same 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Body was not JSON or had no usable `url`.
    MalformedRequest,
    /// Network failure, non-PDF content, or renderer failure.
    FetchOrRender,
    /// Object storage rejected or could not be reached.
    Upload,
    /// Configuration or library binding failure outside a request.
    Startup,
}

impl ErrorKind {
    /// Stable snake_case name used as a structured log field.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MalformedRequest => "malformed_request",
            ErrorKind::FetchOrRender => "fetch_or_render",
            ErrorKind::Upload => "upload",
            ErrorKind::Startup => "startup",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Pdf2PngError {
    /// Classify this error by the step that produced it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2PngError::MalformedRequest { .. } => ErrorKind::MalformedRequest,
            Pdf2PngError::FetchFailed { .. }
            | Pdf2PngError::FetchTimeout { .. }
            | Pdf2PngError::NotAPdf { .. }
            | Pdf2PngError::CorruptPdf { .. }
            | Pdf2PngError::PasswordRequired
            | Pdf2PngError::EmptyDocument
            | Pdf2PngError::RasterisationFailed { .. }
            | Pdf2PngError::EncodeFailed(_)
            | Pdf2PngError::PdfiumBindingFailed { .. }
            | Pdf2PngError::Internal(_) => ErrorKind::FetchOrRender,
            Pdf2PngError::UploadFailed { .. } => ErrorKind::Upload,
            Pdf2PngError::InvalidConfig(_) => ErrorKind::Startup,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Pdf2PngError::MalformedRequest {
            detail: detail.into(),
        }
    }
}
