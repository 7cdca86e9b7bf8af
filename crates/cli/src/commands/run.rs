// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sous run <recipe>` - Run a recipe on a simulated appliance
//!
//! Ctrl-C once cancels the recipe; a second Ctrl-C triggers an emergency stop.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sous_core::{ApplianceState, ApplianceStatus, Controller, Notification};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct RunArgs {
    /// Recipe file (.toml or .json)
    pub recipe: PathBuf,

    /// Appliance configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Real seconds per simulated second, e.g. 0.01 runs 100x faster
    #[arg(long)]
    pub speed_multiplier: Option<f64>,

    /// Only print the final status
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let config = super::load_config(args.config.as_deref())?;
    let recipe = super::load_recipe(&args.recipe)?;

    let controller = Controller::with_config(config);
    if let Some(multiplier) = args.speed_multiplier {
        controller.appliance().set_speed_multiplier(multiplier)?;
    }

    let mut printer = Printer::new(args.format, args.quiet);
    let mut notifications = controller.subscribe();
    controller.power_on();
    let mut handle = controller.spawn_recipe(recipe)?;

    let mut interrupts = 0;
    let completed = loop {
        tokio::select! {
            result = &mut handle => break result??,
            Some(notification) = notifications.recv() => printer.notification(&notification),
            _ = tokio::signal::ctrl_c() => {
                interrupts += 1;
                if interrupts == 1 {
                    tracing::info!("interrupt received, cancelling recipe");
                    if let Err(e) = controller.cancel() {
                        tracing::warn!(error = %e, "cancel failed");
                    }
                } else {
                    controller.emergency_stop();
                }
            }
        }
    };

    while let Ok(notification) = notifications.try_recv() {
        printer.notification(&notification);
    }

    let status = controller.status();
    output::print(&StatusReport(status), args.format);

    Ok(if completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Streams notifications to stdout
struct Printer {
    format: OutputFormat,
    quiet: bool,
    /// Last printed progress, in tens of percent
    last_decile: u8,
}

impl Printer {
    fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            last_decile: 0,
        }
    }

    fn notification(&mut self, notification: &Notification) {
        if self.quiet {
            return;
        }
        match (self.format, notification) {
            (OutputFormat::Json, n) => output::print_json_line(n),
            (OutputFormat::Text, Notification::StateChanged(state)) => println!("[{}]", state),
            (OutputFormat::Text, Notification::Event(message)) => println!("{}", message),
            (OutputFormat::Text, Notification::ProgressChanged(percent)) => {
                let decile = percent / 10;
                if decile > self.last_decile {
                    self.last_decile = decile;
                    println!("{}%", percent);
                }
            }
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct StatusReport(ApplianceStatus);

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = &self.0;
        let outcome = match status.state {
            ApplianceState::Done => "completed",
            ApplianceState::Error => "failed",
            ApplianceState::Idle => "stopped",
            _ => "interrupted",
        };
        write!(
            f,
            "Recipe {} ({}/{} steps, {}%)",
            outcome, status.step_index, status.total_steps, status.recipe_progress
        )
    }
}
