// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sous check <recipe>` - Validate a recipe file

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Recipe file (.toml or .json)
    pub recipe: PathBuf,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let recipe = super::load_recipe(&args.recipe)?;
    println!("ok: {}", recipe);
    Ok(())
}
