// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Radier.

use thiserror::Error;

/// Top-level error type for all Radier operations.
#[derive(Debug, Error)]
pub enum RadierError {
    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("document is encrypted; decrypt it before processing")]
    EncryptedDocument,

    #[error("empty or unreadable document input: {0}")]
    InvalidInput(String),

    #[error("page {page} out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // -- Pixel errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("mask dimensions {mask_w}x{mask_h} do not match image {image_w}x{image_h}")]
    MaskMismatch {
        mask_w: u32,
        mask_h: u32,
        image_w: u32,
        image_h: u32,
    },

    #[error("inpainting failed: {0}")]
    InpaintError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RadierError>;
