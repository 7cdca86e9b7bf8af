// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sous show <recipe>` - Print a recipe and its steps

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sous_core::{Recipe, Task};
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    /// Recipe file (.toml or .json)
    pub recipe: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn show(args: ShowArgs) -> Result<()> {
    let recipe = super::load_recipe(&args.recipe)?;
    output::print(&RecipeView(&recipe), args.format);
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct RecipeView<'a>(&'a Recipe);

impl fmt::Display for RecipeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = self.0;
        writeln!(f, "{}", recipe.name)?;
        if !recipe.description.is_empty() {
            writeln!(f, "{}", recipe.description)?;
        }
        writeln!(
            f,
            "Servings: {} | Difficulty: {} | Time: {}",
            recipe.servings,
            recipe.difficulty,
            recipe.duration_label()
        )?;

        if !recipe.ingredients.is_empty() {
            writeln!(f)?;
            writeln!(f, "Ingredients:")?;
            for ingredient in &recipe.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        writeln!(f)?;
        write!(f, "Steps:")?;
        for (i, step) in recipe.steps.iter().enumerate() {
            write!(f, "\n  {}. ", i + 1)?;
            match Task::from_step(step) {
                Ok(task) => write!(f, "{}", task)?,
                Err(_) => write!(f, "{}", step.label())?,
            }
            if let Some(description) = &step.description {
                write!(f, " - {}", description)?;
            }
        }
        Ok(())
    }
}
