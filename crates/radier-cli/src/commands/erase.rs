// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `radier erase` — run the erase pipeline and export the edited document.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use radier_core::human_errors::nothing_matched;
use radier_core::{BoundingBox, EngineConfig, EraseRequest, FillMode, RenderConfig, TextRegion};
use radier_document::{PdfWriter, png_bytes};
use radier_engine::{DocumentEditor, EraseEngine};
use serde::Serialize;
use tracing::info;

use super::{build_recognizer, load_pages, resolve_pages};

/// Arguments for the erase command.
#[derive(Args)]
pub struct EraseArgs {
    /// Input document (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Natural-language command, e.g. "remove the invoice number"
    #[arg(short, long, conflicts_with = "region")]
    command: Option<String>,

    /// Pixel rectangle to erase; repeatable
    #[arg(short, long, value_name = "X1,Y1,X2,Y2")]
    region: Vec<String>,

    /// 1-based page to edit (default: all pages)
    #[arg(short, long)]
    page: Option<usize>,

    /// Rasterisation density for PDF input
    #[arg(long, default_value_t = RenderConfig::DEFAULT_DPI)]
    dpi: f32,

    /// Use the direct fast-marching fill instead of the blended enhanced mode
    #[arg(long)]
    direct: bool,

    /// Write the edited document as a PDF
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write each edited page as a PNG into this directory
    #[arg(long, value_name = "DIR")]
    png_dir: Option<PathBuf>,

    /// Emit a JSON report of what was erased
    #[arg(long)]
    json: bool,
}

/// One page's erase outcome, for JSON output.
#[derive(Serialize)]
struct EraseReport {
    page: usize,
    changed: bool,
    erased: Vec<TextRegion>,
}

pub fn run(args: EraseArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    if args.output.is_none() && args.png_dir.is_none() {
        anyhow::bail!("nothing to write; pass --output and/or --png-dir");
    }

    let pages = load_pages(&args.input, args.dpi)?;
    let targets = resolve_pages(args.page, pages.len())?;

    let config = EngineConfig {
        fill_mode: if args.direct {
            FillMode::Direct
        } else {
            FillMode::Enhanced
        },
        ..Default::default()
    };
    let engine = EraseEngine::new(build_recognizer(), config.clone())?;
    let mut editor = DocumentEditor::new(pages, &config);

    let mut reports = Vec::with_capacity(targets.len());
    for index in targets {
        let erased = editor.apply(&engine, index, &request)?;
        let changed = match &request {
            EraseRequest::Command(_) => !erased.is_empty(),
            EraseRequest::Regions(boxes) => !boxes.is_empty(),
        };
        reports.push(EraseReport {
            page: index + 1,
            changed,
            erased,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&request, &reports);
    }

    let edited = editor.into_pages();

    if let Some(path) = &args.output {
        let writer = PdfWriter::new(&RenderConfig { dpi: args.dpi });
        writer.write_to_file(&edited, path)?;
        info!("edited document written to {}", path.display());
        println!("wrote {}", path.display());
    }

    if let Some(dir) = &args.png_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        for (index, page) in edited.iter().enumerate() {
            let path = dir.join(format!("page-{:03}.png", index + 1));
            std::fs::write(&path, png_bytes(page)?)?;
        }
        println!("wrote {} PNG page(s) to {}", edited.len(), dir.display());
    }

    Ok(())
}

fn print_reports(request: &EraseRequest, reports: &[EraseReport]) {
    for report in reports {
        match (request, report.erased.len()) {
            (EraseRequest::Command(command), 0) => {
                let human = nothing_matched(command);
                println!("page {}: {}", report.page, human.message);
            }
            (EraseRequest::Command(_), count) => {
                println!("page {}: erased {} region(s)", report.page, count);
                for region in &report.erased {
                    println!("  {} {:?}", region.bbox, region.text);
                }
            }
            (EraseRequest::Regions(boxes), _) => {
                println!("page {}: filled {} region(s)", report.page, boxes.len());
            }
        }
    }
}

fn build_request(args: &EraseArgs) -> anyhow::Result<EraseRequest> {
    if let Some(command) = &args.command {
        return Ok(EraseRequest::Command(command.clone()));
    }
    if args.region.is_empty() {
        anyhow::bail!("pass --command or at least one --region");
    }
    let boxes = args
        .region
        .iter()
        .map(|spec| parse_region(spec))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(EraseRequest::Regions(boxes))
}

/// Parse `"X1,Y1,X2,Y2"` into a bounding box; `X2`/`Y2` are exclusive.
fn parse_region(spec: &str) -> anyhow::Result<BoundingBox> {
    let parts = spec.split(',').map(str::trim).collect::<Vec<_>>();
    let &[x1, y1, x2, y2] = parts.as_slice() else {
        anyhow::bail!("region {:?} must be X1,Y1,X2,Y2", spec);
    };

    let parse = |value: &str| -> anyhow::Result<u32> {
        value
            .parse()
            .with_context(|| format!("bad coordinate {:?} in region {:?}", value, spec))
    };

    let bbox = BoundingBox::new(parse(x1)?, parse(y1)?, parse(x2)?, parse(y2)?);
    if bbox.is_empty() {
        anyhow::bail!("region {:?} encloses no pixels (x2 and y2 are exclusive)", spec);
    }
    Ok(bbox)
}

// -- Tests --------------------------------------------------------------------
