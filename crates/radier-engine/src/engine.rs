// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The erase engine: detection, matching, masking, and filling wired together.

use std::sync::Arc;

use image::RgbImage;
use radier_core::{BoundingBox, EngineConfig, Result, TextRegion};
use tracing::{info, instrument};

use crate::detect::RegionDetector;
use crate::inpaint::InpaintEngine;
use crate::mask::MaskBuilder;
use crate::matcher::{KeywordMatcher, RegionMatcher};
use crate::ocr::TextRecognizer;

/// Caller-owned erasure engine for page rasters.
///
/// The OCR recognizer is injected at construction and the matcher can be
/// swapped out; the engine itself holds no page state, so one instance
/// serves any number of pages, including in parallel.
pub struct EraseEngine {
    detector: RegionDetector,
    matcher: Box<dyn RegionMatcher>,
    masks: MaskBuilder,
    inpaint: InpaintEngine,
}

impl EraseEngine {
    /// Build an engine from a recognizer and a validated configuration.
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: RegionDetector::new(recognizer, &config),
            matcher: Box::new(KeywordMatcher),
            masks: MaskBuilder::new(config.mask_margin),
            inpaint: InpaintEngine::new(&config),
        })
    }

    /// Replace the keyword matcher with custom selection logic.
    pub fn with_matcher(mut self, matcher: Box<dyn RegionMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Detect text regions without erasing anything.
    pub fn detect_regions(&self, page: &RgbImage) -> Vec<TextRegion> {
        self.detector.detect(page)
    }

    /// Erase the regions a command refers to.
    ///
    /// Detection and matching run first; each selected region is then
    /// masked and filled in turn into an accumulating working copy.
    /// Returns the result and the regions actually erased. An empty
    /// selection is success: the page comes back unchanged.
    #[instrument(skip_all, fields(command))]
    pub fn erase_by_command(&self, page: &RgbImage, command: &str) -> (RgbImage, Vec<TextRegion>) {
        let regions = self.detector.detect(page);
        let selected = self.matcher.select(&regions, command);
        if selected.is_empty() {
            info!(command, "no regions matched; page unchanged");
            return (page.clone(), selected);
        }

        let boxes: Vec<BoundingBox> = selected.iter().map(|region| region.bbox).collect();
        let result = self.erase_regions(page, &boxes);
        info!(erased = selected.len(), command, "command erase complete");
        (result, selected)
    }

    /// Erase explicit rectangles: one mask per box, applied sequentially.
    #[instrument(skip_all, fields(regions = boxes.len()))]
    pub fn erase_regions(&self, page: &RgbImage, boxes: &[BoundingBox]) -> RgbImage {
        let mut working = page.clone();
        for bbox in boxes {
            let mask = self.masks.build(working.width(), working.height(), bbox);
            working = self.inpaint.fill(&working, &mask);
        }
        working
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::Recognition;
    use image::{GrayImage, Rgb};

    fn invoice_page() -> RgbImage {
        let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for y in 10..20 {
            for x in 10..40 {
                page.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        page
    }

    fn invoice_engine() -> EraseEngine {
        let recognizer = Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Ok(Recognition::new("Invoice No. 1234", 0.8))
        });
        EraseEngine::new(recognizer, EngineConfig::default()).unwrap()
    }

    fn mean_intensity(image: &RgbImage, bbox: &BoundingBox) -> f64 {
        let mut sum = 0u64;
        let mut count = 0u64;
        for y in bbox.y1..bbox.y2 {
            for x in bbox.x1..bbox.x2 {
                let p = image.get_pixel(x, y).0;
                sum += (p[0] as u64 + p[1] as u64 + p[2] as u64) / 3;
                count += 1;
            }
        }
        sum as f64 / count as f64
    }

    /// End to end: the black rectangle is detected, matched, masked, and
    /// filled; the surrounding area brightens toward the white background.
    #[test]
    fn command_erase_lifts_ink_toward_background() {
        let page = invoice_page();
        let engine = invoice_engine();

        let (result, erased) = engine.erase_by_command(&page, "Remove invoice number");
        assert_eq!(erased.len(), 1);
        assert_eq!(erased[0].bbox, BoundingBox::new(10, 10, 40, 20));

        let probe = BoundingBox::new(5, 5, 45, 25);
        let before = mean_intensity(&page, &probe);
        let after = mean_intensity(&result, &probe);
        assert!(
            after > 220.0 && after > before,
            "expected brightening, got {before} -> {after}"
        );
    }

    /// A command that matches nothing returns the page unchanged.
    #[test]
    fn unmatched_command_leaves_page_untouched() {
        let page = invoice_page();
        let engine = invoice_engine();

        let (result, erased) = engine.erase_by_command(&page, "erase the watermark");
        assert!(erased.is_empty());
        assert_eq!(result, page);
    }

    /// An empty box list is identity.
    #[test]
    fn erasing_no_regions_is_identity() {
        let page = invoice_page();
        let engine = invoice_engine();
        assert_eq!(engine.erase_regions(&page, &[]), page);
    }

    /// A substituted matcher drives selection instead of the keyword table.
    #[test]
    fn custom_matcher_is_honoured() {
        struct Nothing;
        impl RegionMatcher for Nothing {
            fn select(&self, _regions: &[TextRegion], _command: &str) -> Vec<TextRegion> {
                Vec::new()
            }
        }

        let page = invoice_page();
        let engine = invoice_engine().with_matcher(Box::new(Nothing));
        let (result, erased) = engine.erase_by_command(&page, "remove all text");
        assert!(erased.is_empty());
        assert_eq!(result, page);
    }

    /// Invalid configuration is rejected at construction.
    #[test]
    fn invalid_config_rejected_at_construction() {
        let recognizer = Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Ok(Recognition::new("", 0.0))
        });
        let config = EngineConfig {
            blend_weight: 2.0,
            ..Default::default()
        };
        assert!(EraseEngine::new(recognizer, config).is_err());
    }
}
