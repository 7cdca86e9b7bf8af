// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Appliance lifecycle states and the transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of the appliance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceState {
    /// Powered off, setpoints zeroed
    #[default]
    Off,
    /// Powered on, no recipe loaded
    Idle,
    /// Recipe loaded and ready to run
    Prepared,
    /// Executing recipe steps
    Running,
    /// Execution suspended by the user
    Paused,
    /// Last recipe completed successfully
    Done,
    /// Last run aborted by a failure
    Error,
}

impl ApplianceState {
    pub const ALL: [ApplianceState; 7] = [
        ApplianceState::Off,
        ApplianceState::Idle,
        ApplianceState::Prepared,
        ApplianceState::Running,
        ApplianceState::Paused,
        ApplianceState::Done,
        ApplianceState::Error,
    ];

    /// States reachable from this one through a regular transition
    pub fn allowed_targets(self) -> &'static [ApplianceState] {
        use ApplianceState::*;

        match self {
            Off => &[Idle],
            Idle => &[Off, Prepared],
            Prepared => &[Idle, Running],
            Running => &[Paused, Done, Idle, Error],
            Paused => &[Running, Idle],
            Done => &[Idle, Prepared],
            Error => &[Idle],
        }
    }

    /// Check whether `target` is reachable; staying put is always allowed
    pub fn can_transition_to(self, target: ApplianceState) -> bool {
        self == target || self.allowed_targets().contains(&target)
    }

    /// Pure transition function - returns the next state, or None when rejected
    pub fn transition(self, target: ApplianceState) -> Option<ApplianceState> {
        if self.can_transition_to(target) {
            Some(target)
        } else {
            None
        }
    }

    /// Check if a recipe run owns the appliance
    pub fn is_busy(self) -> bool {
        matches!(self, ApplianceState::Running | ApplianceState::Paused)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplianceState::Off => "off",
            ApplianceState::Idle => "idle",
            ApplianceState::Prepared => "prepared",
            ApplianceState::Running => "running",
            ApplianceState::Paused => "paused",
            ApplianceState::Done => "done",
            ApplianceState::Error => "error",
        }
    }
}

impl fmt::Display for ApplianceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
