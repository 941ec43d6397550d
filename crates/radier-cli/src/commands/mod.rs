// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations plus the input handling they share.

pub mod detect;
pub mod erase;
pub mod info;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbImage;
use radier_document::{ImageCodec, PageCodec};
use radier_engine::TextRecognizer;
use tracing::{info, warn};

/// Decode an input document into raster pages at the given DPI.
///
/// PDF inputs go through the pdfium-backed codec (feature `render`); raster
/// images load as single-page documents.
pub(crate) fn load_pages(input: &Path, dpi: f32) -> anyhow::Result<Vec<RgbImage>> {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let pages = match extension.as_str() {
        "pdf" => decode_pdf(&data, dpi)?,
        "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif" => ImageCodec.decode(&data)?,
        other => anyhow::bail!("unsupported input format: {:?}", other),
    };

    info!(pages = pages.len(), input = %input.display(), "document loaded");
    Ok(pages)
}

#[cfg(feature = "render")]
fn decode_pdf(data: &[u8], dpi: f32) -> anyhow::Result<Vec<RgbImage>> {
    use radier_core::RenderConfig;
    use radier_document::PdfCodec;

    let codec = PdfCodec::new(RenderConfig { dpi })?;
    Ok(codec.decode(data)?)
}

#[cfg(not(feature = "render"))]
fn decode_pdf(_data: &[u8], _dpi: f32) -> anyhow::Result<Vec<RgbImage>> {
    anyhow::bail!(
        "PDF input needs the `render` feature; rebuild with --features render or supply a PNG/JPEG"
    )
}

/// Build the recogniser, degrading to no OCR when models are missing.
#[cfg(feature = "ocr")]
pub(crate) fn build_recognizer() -> Arc<dyn TextRecognizer> {
    use radier_engine::{NullRecognizer, OcrsRecognizer};

    if !radier_engine::ocr::models_available() {
        warn!(
            "OCR models not found; text commands will match nothing (coordinate erasure still works)"
        );
        return Arc::new(NullRecognizer);
    }
    match OcrsRecognizer::with_defaults() {
        Ok(recognizer) => Arc::new(recognizer),
        Err(err) => {
            warn!(error = %err, "OCR backend failed to initialise; continuing without text recognition");
            Arc::new(NullRecognizer)
        }
    }
}

#[cfg(not(feature = "ocr"))]
pub(crate) fn build_recognizer() -> Arc<dyn TextRecognizer> {
    use radier_engine::NullRecognizer;

    warn!("built without the `ocr` feature; text commands will match nothing");
    Arc::new(NullRecognizer)
}

/// Resolve an optional 1-based page argument against the page count.
pub(crate) fn resolve_pages(page: Option<usize>, total: usize) -> anyhow::Result<Vec<usize>> {
    match page {
        None => Ok((0..total).collect()),
        Some(0) => anyhow::bail!("pages are numbered from 1"),
        Some(n) if n > total => {
            anyhow::bail!("page {} out of range; the document has {} page(s)", n, total)
        }
        Some(n) => Ok(vec![n - 1]),
    }
}

// -- Tests --------------------------------------------------------------------
