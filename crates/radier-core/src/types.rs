// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Radier erasure engine.

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, half-open on the right and bottom.
///
/// `x2` and `y2` are exclusive, so a box covering a single pixel at the
/// origin is `{0, 0, 1, 1}` and `width() == x2 - x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels; zero when the box is degenerate.
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    /// Height in pixels; zero when the box is degenerate.
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Pixel area of the box.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// True when the box encloses no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Grow the box by `margin` on every side, clamped to `[0, width) x [0, height)`.
    pub fn expanded(&self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            x1: self.x1.saturating_sub(margin).min(width),
            y1: self.y1.saturating_sub(margin).min(height),
            x2: self.x2.saturating_add(margin).min(width),
            y2: self.y2.saturating_add(margin).min(height),
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{},{}]", self.x1, self.y1, self.x2, self.y2)
    }
}

/// A detected text region on one page raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Bounding box of the region in page pixel coordinates.
    pub bbox: BoundingBox,
    /// Recognised text, trimmed.
    pub text: String,
    /// Recognizer confidence in `[0, 1]`; advisory only.
    pub confidence: f32,
}

impl TextRegion {
    pub fn new(bbox: BoundingBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }
}

/// What the caller wants erased from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EraseRequest {
    /// Natural-language command routed through region detection and matching.
    Command(String),
    /// Explicit pixel rectangles; no OCR involved.
    Regions(Vec<BoundingBox>),
}

impl EraseRequest {
    /// Short label for logs and history entries.
    pub fn action_label(&self) -> String {
        match self {
            Self::Command(cmd) => format!("erase: {cmd}"),
            Self::Regions(boxes) => format!("erase {} region(s)", boxes.len()),
        }
    }
}

/// How masked regions are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    /// Fast-marching inpainting of the masked pixels, nothing else.
    Direct,
    /// Neutralise the masked pixels to white, inpaint, then blend the
    /// result back over the original for softer edges.
    Enhanced,
}

impl std::fmt::Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expansion clamps to the page bounds on every side.
    #[test]
    fn expansion_clamps_to_page() {
        let bbox = BoundingBox::new(2, 3, 98, 99);
        let grown = bbox.expanded(5, 100, 100);
        assert_eq!(grown, BoundingBox::new(0, 0, 100, 100));
    }

    /// A degenerate box reports empty and zero area.
    #[test]
    fn degenerate_box_is_empty() {
        let bbox = BoundingBox::new(10, 10, 10, 20);
        assert!(bbox.is_empty());
        assert_eq!(bbox.area(), 0);
    }

    /// Expansion never produces an inverted box even for out-of-range input.
    #[test]
    fn expansion_handles_out_of_range_boxes() {
        let bbox = BoundingBox::new(150, 150, 300, 300);
        let grown = bbox.expanded(5, 100, 100);
        assert!(grown.is_empty());
        assert!(grown.x1 <= grown.x2 && grown.y1 <= grown.y2);
    }
}
