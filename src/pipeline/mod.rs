//! Pipeline stages for PDF-to-PNG publishing.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and the rendering or storage backend can be swapped
//! without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ render ──▶ encode ──▶ upload
//! (reqwest)  (pdfium)   (PNG)     (S3)
//! ```
//!
//! 1. [`fetch`]  — download the PDF into memory and check its header
//! 2. [`render`] — rasterise page 1; runs in `spawn_blocking` because pdfium
//!    is not async-safe
//! 3. [`encode`] — PNG-encode the `DynamicImage` in memory
//! 4. [`upload`] — generate a unique key and write the object public-read

pub mod encode;
pub mod fetch;
pub mod render;
pub mod upload;
