// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the radier-engine crate. Covers region detection
// and the fast-marching fill on a small synthetic page.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Rgb, RgbImage};

use radier_core::{BoundingBox, EngineConfig, FillMode};
use radier_engine::{InpaintEngine, MaskBuilder, Recognition, RegionDetector, TextRecognizer};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 100x100 white page with a black rectangle standing in for a text block.
fn synthetic_page() -> RgbImage {
    let mut page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
    for y in 10..20 {
        for x in 10..40 {
            page.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    page
}

/// Benchmark detection on a 100x100 synthetic page.
///
/// The recognizer is a fixed-string closure, so the numbers isolate the
/// binarisation and contour stages rather than any OCR backend.
fn bench_region_detection(c: &mut Criterion) {
    let page = synthetic_page();
    let recognizer: Arc<dyn TextRecognizer> =
        Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Ok(Recognition::new("SAMPLE 42", 0.9))
        });
    let detector = RegionDetector::new(recognizer, &EngineConfig::default());

    c.bench_function("region_detection (100x100)", |b| {
        b.iter(|| {
            let regions = detector.detect(black_box(&page));
            black_box(regions);
        });
    });
}

/// Benchmark the direct fast-marching fill over a margin-expanded mask.
fn bench_direct_fill(c: &mut Criterion) {
    let page = synthetic_page();
    let mask = MaskBuilder::new(5).build(100, 100, &BoundingBox::new(10, 10, 40, 20));
    let engine = InpaintEngine::new(&EngineConfig {
        fill_mode: FillMode::Direct,
        ..Default::default()
    });

    c.bench_function("direct_fill (100x100)", |b| {
        b.iter(|| {
            let filled = engine.fill(black_box(&page), black_box(&mask));
            black_box(filled);
        });
    });
}

/// Benchmark the enhanced fill: neutralise, inpaint, blend.
fn bench_enhanced_fill(c: &mut Criterion) {
    let page = synthetic_page();
    let mask = MaskBuilder::new(5).build(100, 100, &BoundingBox::new(10, 10, 40, 20));
    let engine = InpaintEngine::new(&EngineConfig::default());

    c.bench_function("enhanced_fill (100x100)", |b| {
        b.iter(|| {
            let filled = engine.fill(black_box(&page), black_box(&mask));
            black_box(filled);
        });
    });
}

criterion_group!(
    benches,
    bench_region_detection,
    bench_direct_fill,
    bench_enhanced_fill
);
criterion_main!(benches);
