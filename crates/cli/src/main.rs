// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sous - simulated cooking appliance CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod completions;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, run, show};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "sous",
    version,
    about = "Sous - run recipes on a simulated cooking appliance"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a recipe file
    Check(check::CheckArgs),
    /// Print a recipe and its steps
    Show(show::ShowArgs),
    /// Run a recipe to completion
    Run(run::RunArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check::check(args)?,
        Commands::Show(args) => show::show(args)?,
        Commands::Run(args) => return run::run(args).await,
        Commands::Completions(args) => completions::generate_completions::<Cli>(args.shell),
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, filtered by `SOUS_LOG` or `RUST_LOG` (default `warn`)
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("SOUS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
