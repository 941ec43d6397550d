// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Erase-mask construction from region bounding boxes.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use radier_core::BoundingBox;
use tracing::trace;

/// Pixel value marking "erase this" in a mask.
pub const MASK_ON: u8 = 255;

/// Builds single-channel erase masks from bounding boxes.
///
/// A mask has the same dimensions as its page: 0 means keep, 255 means
/// erase. The region rectangle is grown by a fixed margin on every side so
/// the fill overlaps the surrounding anti-aliased edge of the text, then
/// clamped to the page bounds.
#[derive(Debug, Clone, Copy)]
pub struct MaskBuilder {
    margin: u32,
}

impl MaskBuilder {
    pub fn new(margin: u32) -> Self {
        Self { margin }
    }

    /// Build a mask for `bbox` on a page of `width` x `height` pixels.
    ///
    /// Pure function of its inputs: the positive pixel count always equals
    /// the area of the margin-expanded, clamped rectangle. A box that
    /// clamps to nothing yields an all-zero mask.
    pub fn build(&self, width: u32, height: u32, bbox: &BoundingBox) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        let grown = bbox.expanded(self.margin, width, height);

        if grown.is_empty() {
            trace!(%bbox, "region clamps to nothing; empty mask");
            return mask;
        }

        draw_filled_rect_mut(
            &mut mask,
            Rect::at(grown.x1 as i32, grown.y1 as i32).of_size(grown.width(), grown.height()),
            Luma([MASK_ON]),
        );
        mask
    }
}

impl Default for MaskBuilder {
    fn default() -> Self {
        Self::new(radier_core::EngineConfig::default().mask_margin)
    }
}

/// Count of erase pixels in a mask.
pub fn positive_pixels(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p.0[0] != 0).count() as u64
}
