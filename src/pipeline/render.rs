//! Render: rasterise the first page of a PDF via pdfium.
//!
//! pdfium is a blocking C++ library, so callers run
//! [`PageRenderer::render_first_page`] inside `tokio::task::spawn_blocking`.
//! The trait exists so the handler can be exercised without a pdfium shared
//! library present.
//!
//! Resolution is expressed in DPI. PDF user space is 72 points per inch, so
//! the page is scaled by `dpi / 72`: a US-Letter page (612 × 792 pt) at the
//! default 100 DPI comes out at 850 × 1100 px.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory Lambda layers are mounted under.
pub const LAMBDA_LAYER_LIB_DIR: &str = "/opt/lib";

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// Something that can turn PDF bytes into a raster of page one.
pub trait PageRenderer: Send + Sync {
    /// Render page 1 (index 0) of `pdf` at `dpi`.
    fn render_first_page(&self, pdf: &[u8], dpi: u32) -> Result<DynamicImage, Pdf2PngError>;
}

/// Scale factor applied to page dimensions for a given DPI.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// [`PageRenderer`] backed by the pdfium shared library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    lib_path: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// `lib_path` may point at the library file itself or at its directory.
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    /// Bind to pdfium, trying in order: the configured path, the Lambda
    /// layer directory, the working directory, then the system search path.
    pub fn bind(&self) -> Result<Pdfium, Pdf2PngError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = &self.lib_path {
            candidates.push(library_file(path));
        }
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(LAMBDA_LAYER_LIB_DIR));
        candidates.push(Pdfium::pdfium_platform_library_name_at_path("./"));

        let mut last_error = None;
        for candidate in &candidates {
            match Pdfium::bind_to_library(candidate) {
                Ok(bindings) => {
                    debug!(path = %candidate.display(), "Bound pdfium");
                    return Ok(Pdfium::new(bindings));
                }
                Err(e) => last_error = Some((candidate.clone(), e)),
            }
        }

        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| {
                let tried = last_error
                    .as_ref()
                    .map(|(p, err)| format!(" (last tried {}: {err:?})", p.display()))
                    .unwrap_or_default();
                Pdf2PngError::PdfiumBindingFailed {
                    path: self.lib_path.clone(),
                    reason: format!("{e:?}{tried}"),
                }
            })
    }
}

/// Accept either the library file or the directory containing it.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_first_page(&self, pdf: &[u8], dpi: u32) -> Result<DynamicImage, Pdf2PngError> {
        let pdfium = self.bind()?;
        render_first_page_with(&pdfium, pdf, dpi)
    }
}

/// Blocking implementation of first-page rendering.
///
/// The document borrows `pdf` and is dropped when this function returns, on
/// the error paths included, which closes it inside pdfium.
pub fn render_first_page_with(
    pdfium: &Pdfium,
    pdf: &[u8],
    dpi: u32,
) -> Result<DynamicImage, Pdf2PngError> {
    let document = pdfium
        .load_pdf_from_byte_slice(pdf, None)
        .map_err(classify_load_error)?;

    let pages = document.pages();
    if pages.is_empty() {
        return Err(Pdf2PngError::EmptyDocument);
    }
    info!(pages = pages.len(), dpi, "PDF loaded, rendering page 1");

    let page = pages
        .first()
        .map_err(|e| Pdf2PngError::RasterisationFailed {
            page: 1,
            detail: format!("{:?}", e),
        })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale_for_dpi(dpi));

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| Pdf2PngError::RasterisationFailed {
            page: 1,
            detail: format!("{:?}", e),
        })?;

    let image = bitmap.as_image();
    debug!("Rendered page 1 → {}x{} px", image.width(), image.height());

    Ok(image)
}

/// Encrypted documents are reported apart from unreadable ones.
fn classify_load_error(e: PdfiumError) -> Pdf2PngError {
    match e {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Pdf2PngError::PasswordRequired
        }
        other => Pdf2PngError::CorruptPdf {
            detail: format!("{other:?}"),
        },
    }
}
