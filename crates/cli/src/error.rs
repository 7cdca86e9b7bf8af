// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use sous_core::{ConfigError, RecipeLoadError};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A recipe file could not be loaded.
    pub fn recipe(path: &Path, err: RecipeLoadError) -> Self {
        let base = CliError::new(format!("cannot load recipe '{}'", path.display()));
        let base = match &err {
            RecipeLoadError::Io(_) => base
                .with_context("The file could not be read")
                .with_suggestion("Check that the path exists and is readable"),
            RecipeLoadError::UnsupportedFormat(ext) => base
                .with_context(format!("Unrecognized extension {ext:?}"))
                .with_suggestion("Save the recipe as .toml or .json"),
            RecipeLoadError::Toml(_) | RecipeLoadError::Json(_) => base
                .with_context(err.to_string())
                .with_suggestion("Fix the syntax error and try again"),
            RecipeLoadError::Invalid(inner) => base
                .with_context(inner.to_string())
                .with_suggestion("Step types are cut, temperature and mechanical")
                .with_suggestion("Every step needs duration_seconds greater than 0"),
        };
        base.with_source(err)
    }

    /// A configuration file could not be loaded.
    pub fn config(path: &Path, err: ConfigError) -> Self {
        CliError::new(format!("cannot load config '{}'", path.display()))
            .with_context(err.to_string())
            .with_suggestion("Durations use humantime syntax, e.g. \"50ms\" or \"2s\"")
            .with_source(err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
