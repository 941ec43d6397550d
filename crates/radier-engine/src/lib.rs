// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// radier-engine — Region-targeted erasure for raster document pages.
//
// Provides text-region detection (Otsu binarisation, contour extraction,
// per-region OCR), erase-mask building, content-aware fast-marching
// inpainting with a graceful fallback chain, keyword command matching, and
// a bounded undo/redo history, wired together by a caller-owned engine.

pub mod detect;
pub mod engine;
pub mod history;
pub mod inpaint;
pub mod mask;
pub mod matcher;
pub mod ocr;
pub mod session;

// Re-export the primary types so callers can use `radier_engine::EraseEngine` etc.
pub use detect::RegionDetector;
pub use engine::EraseEngine;
pub use history::{HistoryStack, HistoryStatus};
pub use inpaint::InpaintEngine;
pub use mask::MaskBuilder;
pub use matcher::{KeywordMatcher, RegionMatcher};
pub use ocr::{NullRecognizer, Recognition, TextRecognizer};
pub use session::{DocumentEditor, PageEditor};

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrsRecognizer};
