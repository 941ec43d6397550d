// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — validation, rasterisation, and re-assembly.

pub mod reader;
#[cfg(feature = "render")]
pub mod render;
pub mod writer;

pub use reader::PdfReader;
pub use writer::PdfWriter;

#[cfg(feature = "render")]
pub use render::PdfRenderer;
