// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `radier detect` — list detected text regions without touching the document.

use std::path::PathBuf;

use clap::Args;
use radier_core::{EngineConfig, RenderConfig, TextRegion};
use radier_engine::EraseEngine;
use serde::Serialize;
use tracing::debug;

use super::{build_recognizer, load_pages, resolve_pages};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input document (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// 1-based page to scan (default: all pages)
    #[arg(short, long)]
    page: Option<usize>,

    /// Rasterisation density for PDF input
    #[arg(long, default_value_t = RenderConfig::DEFAULT_DPI)]
    dpi: f32,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One page's detection result, for JSON output.
#[derive(Serialize)]
struct PageReport {
    page: usize,
    regions: Vec<TextRegion>,
}

pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let pages = load_pages(&args.input, args.dpi)?;
    let targets = resolve_pages(args.page, pages.len())?;

    let engine = EraseEngine::new(build_recognizer(), EngineConfig::default())?;

    let mut reports = Vec::with_capacity(targets.len());
    for index in targets {
        let regions = engine.detect_regions(&pages[index]);
        debug!(page = index + 1, regions = regions.len(), "page scanned");
        reports.push(PageReport {
            page: index + 1,
            regions,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("page {}: {} region(s)", report.page, report.regions.len());
        for region in &report.regions {
            println!(
                "  {} {:?} (confidence {:.2})",
                region.bbox, region.text, region.confidence
            );
        }
    }

    Ok(())
}
