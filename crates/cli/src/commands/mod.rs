// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod run;
pub mod show;

use crate::error::CliError;
use sous_core::{ApplianceConfig, Recipe};
use std::path::Path;

fn load_recipe(path: &Path) -> Result<Recipe, CliError> {
    Recipe::load(path).map_err(|e| CliError::recipe(path, e))
}

fn load_config(path: Option<&Path>) -> Result<ApplianceConfig, CliError> {
    match path {
        Some(path) => ApplianceConfig::load(path).map_err(|e| CliError::config(path, e)),
        None => Ok(ApplianceConfig::default()),
    }
}
