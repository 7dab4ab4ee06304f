//! # pdf2png
//!
//! An AWS Lambda that turns a PDF URL into a public PNG preview of its first
//! page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! {"url": "..."}
//!  │
//!  ├─ 1. Parse   validate the JSON body into a PdfRequest
//!  ├─ 2. Fetch   download the PDF over HTTP(S) into memory
//!  ├─ 3. Render  rasterise page 1 at 100 DPI via pdfium (spawn_blocking)
//!  ├─ 4. Encode  PNG in memory
//!  ├─ 5. Upload  images/<uuid>.png, public-read, to S3
//!  └─ 6. Reply   200 {"imageUrl": ...} or 500 {"error": ...}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{HandlerConfig, Pdf2Png, ProxyRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = Pdf2Png::from_config(HandlerConfig::from_env()?).await?;
//!     let response = handler
//!         .handle(ProxyRequest::with_body(r#"{"url": "https://example.com/doc.pdf"}"#))
//!         .await;
//!     println!("{} {}", response.status_code, response.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | off     | Enables the local `pdf2png` binary (clap + anyhow) |
//!
//! The `bootstrap` binary is the Lambda entry point and is always built.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod pipeline;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{HandlerConfig, HandlerConfigBuilder};
pub use error::{ErrorKind, Pdf2PngError};
pub use event::{ProxyRequest, ProxyResponse, GENERIC_ERROR_MESSAGE};
pub use handler::Pdf2Png;
pub use pipeline::render::{PageRenderer, PdfiumRenderer};
pub use pipeline::upload::{ObjectKey, ObjectStore, PutObject, S3Store};
pub use request::PdfRequest;

/// Configure structured JSON logging for CloudWatch.
///
/// The filter comes from `RUST_LOG` when set and defaults to `info`. Safe to
/// call more than once; only the first call installs a subscriber.
///
/// ```
/// pdf2png::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .without_time();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
