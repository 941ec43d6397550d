// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page codecs — translate between on-disk document bytes and in-memory
// raster pages. Decode yields one `RgbImage` per page in document order;
// encode serialises edited pages back into the codec's output format.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use radier_core::error::RadierError;
use tracing::{debug, instrument};

/// Translates between encoded document bytes and raster pages.
pub trait PageCodec {
    /// Decode document bytes into raster pages, in document order.
    fn decode(&self, data: &[u8]) -> Result<Vec<RgbImage>, RadierError>;

    /// Encode raster pages back into document bytes.
    fn encode(&self, pages: &[RgbImage]) -> Result<Vec<u8>, RadierError>;
}

/// Encode one page as PNG bytes.
pub fn png_bytes(page: &RgbImage) -> Result<Vec<u8>, RadierError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    page.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| RadierError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Codec for standalone raster images (PNG, JPEG, ...) treated as
/// single-page documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl PageCodec for ImageCodec {
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    fn decode(&self, data: &[u8]) -> Result<Vec<RgbImage>, RadierError> {
        if data.is_empty() {
            return Err(RadierError::InvalidInput("empty image data".into()));
        }
        let image = image::load_from_memory(data)
            .map_err(|err| RadierError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded as single-page document"
        );
        Ok(vec![image.to_rgb8()])
    }

    fn encode(&self, pages: &[RgbImage]) -> Result<Vec<u8>, RadierError> {
        match pages {
            [page] => png_bytes(page),
            _ => Err(RadierError::InvalidInput(format!(
                "image output holds exactly one page, got {}",
                pages.len()
            ))),
        }
    }
}

#[cfg(feature = "render")]
pub use pdf_codec::PdfCodec;

#[cfg(feature = "render")]
mod pdf_codec {
    use image::RgbImage;
    use radier_core::RenderConfig;
    use radier_core::error::RadierError;
    use tracing::{debug, instrument, warn};

    use super::PageCodec;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::render::PdfRenderer;
    use crate::pdf::writer::PdfWriter;

    /// Round-trip codec for PDF documents: rasterise on decode, re-assemble
    /// one full-bleed image page per input page on encode.
    pub struct PdfCodec {
        renderer: PdfRenderer,
        writer: PdfWriter,
    }

    impl PdfCodec {
        /// Build a codec rendering and re-assembling at `config.dpi`.
        pub fn new(config: RenderConfig) -> Result<Self, RadierError> {
            Ok(Self {
                writer: PdfWriter::new(&config),
                renderer: PdfRenderer::new(config)?,
            })
        }
    }

    impl PageCodec for PdfCodec {
        /// Structural validation runs first, so encrypted or damaged files
        /// are rejected before rasterisation starts.
        #[instrument(skip_all, fields(bytes_len = data.len()))]
        fn decode(&self, data: &[u8]) -> Result<Vec<RgbImage>, RadierError> {
            let reader = PdfReader::from_bytes(data)?;
            reader.validate()?;

            let pages = self.renderer.render_pages(data)?;
            if pages.len() != reader.page_count() {
                warn!(
                    rendered = pages.len(),
                    declared = reader.page_count(),
                    "rendered page count differs from the page tree"
                );
            }
            debug!(pages = pages.len(), "PDF decoded to raster pages");
            Ok(pages)
        }

        fn encode(&self, pages: &[RgbImage]) -> Result<Vec<u8>, RadierError> {
            self.writer.assemble(pages)
        }
    }
}

// -- Tests --------------------------------------------------------------------
