// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasterisation via the `pdfium-render` bindings. Behind the `render`
// feature gate because it needs the native pdfium library at runtime.

use image::RgbImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use radier_core::RenderConfig;
use radier_core::error::RadierError;
use tracing::{debug, info, instrument};

/// Renders PDF pages to RGB raster images at a fixed DPI.
///
/// Binds the native pdfium library once at construction; one renderer serves
/// a whole document run.
pub struct PdfRenderer {
    pdfium: Pdfium,
    dpi: f32,
}

impl PdfRenderer {
    /// Bind to the pdfium library and fix the rasterisation density.
    ///
    /// Looks for a bundled pdfium library beside the executable first, then
    /// falls back to the system-installed one.
    pub fn new(config: RenderConfig) -> Result<Self, RadierError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| {
                RadierError::PdfError(format!("failed to bind to the pdfium library: {}", err))
            })?;

        info!(dpi = config.dpi, "pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi: config.dpi,
        })
    }

    /// Rasterise every page of the PDF in `data`, in document order.
    ///
    /// Pixel dimensions derive from each page's own point size at the
    /// configured DPI, so mixed-size documents keep their proportions.
    #[instrument(skip_all, fields(bytes_len = data.len(), dpi = self.dpi))]
    pub fn render_pages(&self, data: &[u8]) -> Result<Vec<RgbImage>, RadierError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| {
                RadierError::PdfError(format!("pdfium could not parse the document: {}", err))
            })?;

        let mut pages = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            // PDF user space is 72 points per inch.
            let width_pt = page.width().value;
            let target_width = (width_pt / 72.0 * self.dpi).round().max(1.0) as i32;
            let render_config = PdfRenderConfig::new().set_target_width(target_width);

            let bitmap = page.render_with_config(&render_config).map_err(|err| {
                RadierError::PdfError(format!("failed to render page {}: {}", index + 1, err))
            })?;
            let image = bitmap.as_image().into_rgb8();

            debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "Page rasterised"
            );
            pages.push(image);
        }

        info!(pages = pages.len(), "Document rasterised");
        Ok(pages)
    }
}
