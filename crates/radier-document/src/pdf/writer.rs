// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — re-assemble edited raster pages into a PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Every output page is one full-bleed image whose
// physical size derives from its pixel dimensions at the configured DPI, so a
// round trip through the renderer and back preserves page geometry.

use std::path::Path;

use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use radier_core::RenderConfig;
use radier_core::error::RadierError;
use tracing::{debug, info, instrument};

const MM_PER_INCH: f32 = 25.4;

/// Creates PDF documents from ordered raster pages.
///
/// Each input image becomes one page sized to hold it exactly at the writer's
/// DPI, with the image drawn edge to edge.
pub struct PdfWriter {
    /// Dots per inch relating pixel dimensions to physical page size.
    dpi: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a writer matching the given rendering density.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            dpi: config.dpi,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    // -- Assembly -------------------------------------------------------------

    /// Serialise `pages` into a PDF, one full-bleed image page per entry.
    #[instrument(skip_all, fields(page_count = pages.len(), dpi = self.dpi))]
    pub fn assemble(&self, pages: &[RgbImage]) -> Result<Vec<u8>, RadierError> {
        if pages.is_empty() {
            return Err(RadierError::InvalidInput(
                "cannot assemble a PDF from zero pages".into(),
            ));
        }

        let title = self.title.as_deref().unwrap_or("Radier Document");
        info!(pages = pages.len(), title, "Assembling PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let (px_w, px_h) = page.dimensions();
            if px_w == 0 || px_h == 0 {
                return Err(RadierError::InvalidInput(format!(
                    "page {} has zero pixel size",
                    index + 1
                )));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(page.as_raw().clone()),
                width: px_w as usize,
                height: px_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Physical page size from pixel dimensions at the writer's DPI.
            let page_w = Mm(px_w as f32 / self.dpi * MM_PER_INCH);
            let page_h = Mm(px_h as f32 / self.dpi * MM_PER_INCH);

            // Drawn at the same DPI from the bottom-left corner, the image
            // covers the page exactly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];

            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(page = index + 1, px_w, px_h, "Page placed");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "PDF serialiser reported warnings");
        }

        info!(output_bytes = output.len(), "PDF assembled");
        Ok(output)
    }

    // -- File output convenience ----------------------------------------------

    /// Assemble a PDF and write it directly to a file.
    pub fn write_to_file(
        &self,
        pages: &[RgbImage],
        path: impl AsRef<Path>,
    ) -> Result<(), RadierError> {
        let bytes = self.assemble(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote assembled PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------
