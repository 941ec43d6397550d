// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-region detection on page rasters.
//
// Pipeline: grayscale → inverted Otsu binarisation (ink becomes foreground)
// → external contour extraction → area filter → per-region OCR. Detection
// is best-effort by contract: a page that defeats every stage yields an
// empty region list and a warning, never an error.

use std::sync::Arc;

use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;
use radier_core::{BoundingBox, EngineConfig, TextRegion};
use tracing::{debug, info, instrument, warn};

use crate::ocr::TextRecognizer;

/// Finds candidate text regions on one page raster.
pub struct RegionDetector {
    recognizer: Arc<dyn TextRecognizer>,
    min_region_area: f64,
    min_text_len: usize,
}

impl RegionDetector {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: &EngineConfig) -> Self {
        Self {
            recognizer,
            min_region_area: config.min_region_area,
            min_text_len: config.min_text_len,
        }
    }

    /// Detect text regions on `page`.
    ///
    /// Each surviving contour is cropped from the grayscale page and handed
    /// to the recognizer individually. Per-region recognition failures skip
    /// that region; the rest of the page is unaffected.
    #[instrument(skip_all, fields(width = page.width(), height = page.height()))]
    pub fn detect(&self, page: &RgbImage) -> Vec<TextRegion> {
        if page.width() == 0 || page.height() == 0 {
            warn!("degenerate page raster; returning no regions");
            return Vec::new();
        }

        let gray = imageops::grayscale(page);
        let threshold = otsu_threshold(&gray);
        let binary = binarize_inverted(&gray, threshold);

        let contours: Vec<Contour<i32>> = find_contours(&binary);
        debug!(
            contours = contours.len(),
            threshold, "contours extracted from binarised page"
        );

        let mut regions = Vec::new();
        for contour in &contours {
            // Holes inside glyph outlines are not candidate regions.
            if contour.border_type != BorderType::Outer {
                continue;
            }
            let area = contour_area(&contour.points);
            if area < self.min_region_area {
                continue;
            }
            let Some(bbox) = bounding_box(&contour.points) else {
                continue;
            };

            let crop =
                imageops::crop_imm(&gray, bbox.x1, bbox.y1, bbox.width(), bbox.height()).to_image();
            match self.recognizer.recognize(&crop) {
                Ok(recognition) => {
                    let text = recognition.text.trim();
                    if text.chars().count() >= self.min_text_len {
                        debug!(%bbox, text, "text region accepted");
                        regions.push(TextRegion::new(bbox, text, recognition.confidence));
                    }
                }
                Err(err) => {
                    debug!(%bbox, error = %err, "recognition failed; skipping region");
                }
            }
        }

        info!(regions = regions.len(), "text-region detection complete");
        regions
    }
}

/// Compute the Otsu threshold of a grayscale image by maximising
/// between-class variance over the intensity histogram.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

/// Inverted binarisation: pixels at or below the threshold (ink) become
/// foreground (255), everything else background (0).
fn binarize_inverted(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel.0[0] <= threshold { 255 } else { 0 };
        binary.put_pixel(x, y, Luma([value]));
    }
    binary
}

/// Enclosed area of a contour polygon via the shoelace formula. The points
/// come ordered from contour tracing, which is what the formula needs.
fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}

/// Tight bounding box of a contour, half-open on the right and bottom.
fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::new(
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        (max_x.max(0) + 1) as u32,
        (max_y.max(0) + 1) as u32,
    ))
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::Recognition;
    use image::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// White page with solid black rectangles at the given boxes.
    fn page_with_rects(rects: &[BoundingBox]) -> RgbImage {
        let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for rect in rects {
            for y in rect.y1..rect.y2 {
                for x in rect.x1..rect.x2 {
                    page.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        page
    }

    fn fixed_recognizer(text: &'static str) -> Arc<dyn TextRecognizer> {
        Arc::new(move |_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Ok(Recognition::new(text, 0.9))
        })
    }

    /// A black rectangle on a white page comes back with its exact box.
    #[test]
    fn detects_rectangle_with_exact_bbox() {
        let bbox = BoundingBox::new(10, 10, 40, 20);
        let page = page_with_rects(&[bbox]);
        let detector =
            RegionDetector::new(fixed_recognizer("SAMPLE 42"), &EngineConfig::default());

        let regions = detector.detect(&page);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bbox, bbox);
        assert_eq!(regions[0].text, "SAMPLE 42");
    }

    /// Specks below the area floor never reach the recognizer.
    #[test]
    fn small_specks_are_filtered_before_ocr() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let counting = Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Recognition::new("DOT", 0.9))
        });

        let page = page_with_rects(&[BoundingBox::new(50, 50, 53, 53)]);
        let detector = RegionDetector::new(counting, &EngineConfig::default());

        let regions = detector.detect(&page);
        assert!(regions.is_empty());
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    /// Single-character reads are discarded.
    #[test]
    fn single_character_text_is_discarded() {
        let page = page_with_rects(&[BoundingBox::new(10, 10, 40, 20)]);
        let detector = RegionDetector::new(fixed_recognizer("X"), &EngineConfig::default());
        assert!(detector.detect(&page).is_empty());
    }

    /// A recognizer error skips the region instead of failing the page.
    #[test]
    fn recognizer_failure_skips_region() {
        let failing = Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Err(radier_core::RadierError::OcrError("backend exploded".into()))
        });
        let page = page_with_rects(&[BoundingBox::new(10, 10, 40, 20)]);
        let detector = RegionDetector::new(failing, &EngineConfig::default());
        assert!(detector.detect(&page).is_empty());
    }

    /// Two separated rectangles yield two regions.
    #[test]
    fn detects_multiple_regions() {
        let upper = BoundingBox::new(10, 10, 60, 22);
        let lower = BoundingBox::new(10, 50, 45, 62);
        let page = page_with_rects(&[upper, lower]);
        let detector = RegionDetector::new(fixed_recognizer("WORDS 99"), &EngineConfig::default());

        let mut regions = detector.detect(&page);
        regions.sort_by_key(|r| r.bbox.y1);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].bbox, upper);
        assert_eq!(regions[1].bbox, lower);
    }

    /// A blank page yields no regions and no recognizer calls.
    #[test]
    fn blank_page_yields_nothing() {
        let page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let detector = RegionDetector::new(fixed_recognizer("GHOST"), &EngineConfig::default());
        assert!(detector.detect(&page).is_empty());
    }

    /// Shoelace area of an axis-aligned square boundary.
    #[test]
    fn contour_area_of_square() {
        let points = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(contour_area(&points), 100.0);
    }

    /// Otsu lands between the two modes of a bimodal image.
    #[test]
    fn otsu_separates_bimodal_histogram() {
        let mut gray = GrayImage::from_pixel(10, 10, Luma([220u8]));
        for y in 0..5 {
            for x in 0..10 {
                gray.put_pixel(x, y, Luma([30u8]));
            }
        }
        let t = otsu_threshold(&gray);
        assert!((30..220).contains(&t), "threshold {t} outside the modes");
    }
}
