// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe value objects consumed by the appliance
//!
//! Recipes are read-only inputs. Files are parsed from TOML or JSON and
//! validated once at load time; recipes built in code are validated only
//! when they run.

use crate::error::ApplianceError;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported recipe format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid recipe: {0}")]
    Invalid(#[from] ApplianceError),
}

/// Serialized description of one recipe step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Task family: cut, temperature or mechanical
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Free name for mechanical steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub duration_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StepSpec {
    pub fn new(kind: &str, duration_seconds: u32) -> Self {
        Self {
            kind: kind.to_string(),
            operation: None,
            name: None,
            duration_seconds,
            temperature_c: None,
            speed: None,
            description: None,
        }
    }

    pub fn cut(operation: &str, duration_seconds: u32) -> Self {
        Self {
            operation: Some(operation.to_string()),
            ..Self::new("cut", duration_seconds)
        }
    }

    pub fn temperature(operation: &str, duration_seconds: u32, temperature_c: i32) -> Self {
        Self {
            operation: Some(operation.to_string()),
            temperature_c: Some(temperature_c),
            ..Self::new("temperature", duration_seconds)
        }
    }

    pub fn mechanical(name: &str, duration_seconds: u32) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new("mechanical", duration_seconds)
        }
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Label used in logs: the operation or name, falling back to the type
    pub fn label(&self) -> &str {
        self.operation
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.kind)
    }
}

/// An ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity == 0.0 || self.unit == "to taste" {
            return write!(f, "{} (to taste)", self.name);
        }
        if self.quantity.fract() == 0.0 {
            write!(f, "{} {} of {}", self.quantity as i64, self.unit, self.name)
        } else {
            write!(f, "{:.1} {} of {}", self.quantity, self.unit, self.name)
        }
    }
}

/// An ordered list of steps plus descriptive metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<StepSpec>,
    /// Declared total time; informational, the engine sums step durations
    #[serde(default)]
    pub total_duration_seconds: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn sum_durations(steps: &[StepSpec]) -> u32 {
    steps
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.duration_seconds))
}

fn default_unit() -> String {
    "unit".to_string()
}

fn default_servings() -> u32 {
    4
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

impl Recipe {
    /// Create a recipe whose declared total is the sum of its steps
    pub fn new(name: impl Into<String>, steps: Vec<StepSpec>) -> Self {
        let total_duration_seconds = sum_durations(&steps);
        Self {
            name: name.into(),
            description: String::new(),
            ingredients: Vec::new(),
            steps,
            total_duration_seconds,
            servings: default_servings(),
            difficulty: default_difficulty(),
        }
    }

    /// Load and validate a recipe file, choosing the format by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecipeLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let recipe = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(RecipeLoadError::UnsupportedFormat(other.to_string())),
        };
        Ok(recipe)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RecipeLoadError> {
        let recipe: Recipe = toml::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn from_json_str(content: &str) -> Result<Self, RecipeLoadError> {
        let recipe: Recipe = serde_json::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Check that the recipe has steps and every step builds a valid task
    pub fn validate(&self) -> Result<(), ApplianceError> {
        if self.steps.is_empty() {
            return Err(ApplianceError::Recipe(format!(
                "recipe {:?} has no steps",
                self.name
            )));
        }

        for (index, step) in self.steps.iter().enumerate() {
            let task = Task::from_step(step).map_err(|e| {
                ApplianceError::Recipe(format!("step {}: {}", index + 1, e))
            })?;
            task.validate().map_err(|reason| {
                ApplianceError::Recipe(format!("step {}: {}", index + 1, reason))
            })?;
        }

        let total = self
            .steps
            .iter()
            .try_fold(0u32, |acc, s| acc.checked_add(s.duration_seconds));
        if total.is_none() {
            return Err(ApplianceError::Recipe(format!(
                "recipe {:?} is longer than {}s in total",
                self.name,
                u32::MAX
            )));
        }
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Sum of the durations of all steps, in simulated seconds, saturating
    pub fn steps_duration(&self) -> u32 {
        sum_durations(&self.steps)
    }

    /// Total duration formatted for display; the step sum when none is declared
    pub fn duration_label(&self) -> String {
        match self.total_duration_seconds {
            0 => format_duration(self.steps_duration()),
            declared => format_duration(declared),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} steps)",
            self.name,
            self.duration_label(),
            self.step_count()
        )
    }
}

/// Format seconds as `1h 5min`, `12 min`, `2m 30s` or `45s`
pub fn format_duration(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;

    if minutes >= 60 {
        format!("{}h {}min", minutes / 60, minutes % 60)
    } else if minutes > 0 && secs == 0 {
        format!("{minutes} min")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
#[path = "recipe_tests.rs"]
mod tests;
