// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// radier-document — Document I/O for the Radier erasure engine.
//
// Provides PDF validation (lopdf), PDF re-assembly from edited raster pages
// (printpdf), PNG export, and optional PDF rasterisation via pdfium behind
// the `render` feature gate. The `PageCodec` trait ties decode and encode
// together for the caller layer.

pub mod codec;
pub mod pdf;

// Re-export the primary structs so callers can use `radier_document::PdfReader` etc.
pub use codec::{ImageCodec, PageCodec, png_bytes};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;

#[cfg(feature = "render")]
pub use codec::PdfCodec;
#[cfg(feature = "render")]
pub use pdf::render::PdfRenderer;
