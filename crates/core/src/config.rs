// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Appliance configuration
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock timing. Durations use humantime syntax: `"2s"`, `"50ms"`.

use crate::simulator::{is_valid_speed_multiplier, MAX_SPEED_MULTIPLIER};
use crate::task::TaskRules;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Time compression settings for the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Real seconds per simulated second (0.01 = 100x faster)
    pub speed_multiplier: f64,
    /// Floor for the real wait of one step
    #[serde(with = "humantime_serde")]
    pub min_real_wait: Duration,
    pub min_ticks: u32,
    pub max_ticks: u32,
    #[serde(with = "humantime_serde")]
    pub pause_poll_interval: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 0.01,
            min_real_wait: Duration::from_secs(2),
            min_ticks: 10,
            max_ticks: 100,
            pause_poll_interval: Duration::from_millis(50),
        }
    }
}

/// Top-level appliance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceConfig {
    pub simulator: SimulatorConfig,
    /// Suspension after each completed step so observers see it before the next one
    #[serde(with = "humantime_serde")]
    pub step_settle: Duration,
    /// Require steaming steps to run at exactly 100°C
    pub strict_steam: bool,
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            step_settle: Duration::from_millis(100),
            strict_steam: false,
        }
    }
}

impl ApplianceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ApplianceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulator;
        if !is_valid_speed_multiplier(sim.speed_multiplier) {
            return Err(ConfigError::Invalid(format!(
                "simulator.speed_multiplier must be positive and at most {}, got {}",
                MAX_SPEED_MULTIPLIER, sim.speed_multiplier
            )));
        }
        if sim.min_ticks == 0 || sim.min_ticks > sim.max_ticks {
            return Err(ConfigError::Invalid(format!(
                "simulator tick bounds must satisfy 0 < min_ticks <= max_ticks, got {}..{}",
                sim.min_ticks, sim.max_ticks
            )));
        }
        if sim.pause_poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "simulator.pause_poll_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn task_rules(&self) -> TaskRules {
        TaskRules {
            strict_steam: self.strict_steam,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
