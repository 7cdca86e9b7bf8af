// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for appliance commands

use thiserror::Error;

/// Errors returned by appliance commands and task construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplianceError {
    #[error("appliance is powered off")]
    PoweredOff,
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("appliance is busy running a recipe")]
    Busy,
    #[error("recipe error: {0}")]
    Recipe(String),
    #[error("invalid task: {0}")]
    InvalidTask(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error(
        "speed multiplier must be a positive number no greater than {max}, got {0}",
        max = crate::simulator::MAX_SPEED_MULTIPLIER
    )]
    InvalidSpeedMultiplier(f64),
}

impl ApplianceError {
    /// Short stable code for the error kind, used in event messages and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            ApplianceError::PoweredOff => "powered_off",
            ApplianceError::InvalidOperation(_) => "invalid_operation",
            ApplianceError::Busy => "busy",
            ApplianceError::Recipe(_) => "recipe",
            ApplianceError::InvalidTask(_) => "invalid_task",
            ApplianceError::Execution(_) => "execution",
            ApplianceError::OutOfRange { .. } => "out_of_range",
            ApplianceError::InvalidSpeedMultiplier(_) => "invalid_speed_multiplier",
        }
    }
}
