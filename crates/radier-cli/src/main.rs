// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// radier — region-targeted erasure for PDF and image documents.
//
// Entry point. Initialises logging and dispatches subcommands.

mod commands;

use clap::{Parser, Subcommand};

use commands::{detect, erase, info};

/// Region-targeted erasure for PDF and image documents.
#[derive(Parser)]
#[command(name = "radier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a PDF: page count and validation status
    Info(info::InfoArgs),

    /// Detect text regions on document pages
    Detect(detect::DetectArgs),

    /// Erase content from document pages and export the result
    Erase(erase::EraseArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info(args) => info::run(args),
        Commands::Detect(args) => detect::run(args),
        Commands::Erase(args) => erase::run(args),
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity picks the default level.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}
