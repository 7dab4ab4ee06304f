//! Image encoding: `DynamicImage` → in-memory PNG bytes.
//!
//! PNG is lossless, so text on the rendered page stays crisp.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, Pdf2PngError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    debug!(
        width = img.width(),
        height = img.height(),
        bytes = buf.len(),
        "Encoded page as PNG"
    );

    Ok(buf)
}
