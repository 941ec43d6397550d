// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `radier info` — inspect a PDF before editing it.

use std::path::PathBuf;

use clap::Args;
use radier_core::human_errors::humanize_error;
use radier_document::PdfReader;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// PDF file to inspect
    #[arg(required = true)]
    input: PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let reader = PdfReader::open(&args.input)?;

    println!("file:      {}", args.input.display());
    println!("pages:     {}", reader.page_count());
    println!(
        "encrypted: {}",
        if reader.is_encrypted() { "yes" } else { "no" }
    );

    match reader.validate() {
        Ok(()) => println!("status:    ok"),
        Err(err) => {
            let human = humanize_error(&err);
            println!("status:    {}", human.message);
            println!("           {}", human.suggestion);
        }
    }

    Ok(())
}
