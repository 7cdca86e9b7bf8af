// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Appliance status and its public snapshots

use crate::recipe::Recipe;
use crate::state::ApplianceState;
use crate::task::Setpoints;
use serde::Serialize;
use std::sync::Arc;

/// Mutable appliance status, guarded by the appliance mutex
#[derive(Debug, Default)]
pub(super) struct Status {
    pub state: ApplianceState,
    pub setpoints: Setpoints,
    pub recipe: Option<Arc<Recipe>>,
    pub active_task: Option<String>,
    pub step_index: usize,
    pub step_progress: u8,
    pub recipe_progress: u8,
    pub step_remaining_s: u32,
    pub recipe_remaining_s: u32,
}

impl Status {
    pub fn reset_setpoints(&mut self) {
        self.setpoints = Setpoints::default();
    }

    pub fn reset_progress(&mut self) {
        self.active_task = None;
        self.step_index = 0;
        self.step_progress = 0;
        self.recipe_progress = 0;
        self.step_remaining_s = 0;
        self.recipe_remaining_s = 0;
    }

    /// Drop the recipe and zero everything except the lifecycle state
    pub fn reset_all(&mut self) {
        self.reset_setpoints();
        self.reset_progress();
        self.recipe = None;
    }

    pub fn total_steps(&self) -> usize {
        self.recipe.as_ref().map_or(0, |r| r.step_count())
    }

    pub fn snapshot(&self) -> ApplianceStatus {
        ApplianceStatus {
            state: self.state,
            temperature_c: self.setpoints.temperature_c,
            speed: self.setpoints.speed,
            step_progress: self.step_progress,
            recipe_progress: self.recipe_progress,
            active_task: self.active_task.clone(),
            active_recipe: self.recipe.as_ref().map(|r| r.name.clone()),
            step_index: self.step_index,
            total_steps: self.total_steps(),
        }
    }
}

/// Point-in-time view of the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplianceStatus {
    pub state: ApplianceState,
    pub temperature_c: u16,
    pub speed: u8,
    pub step_progress: u8,
    pub recipe_progress: u8,
    pub active_task: Option<String>,
    pub active_recipe: Option<String>,
    /// Number of steps completed so far
    pub step_index: usize,
    pub total_steps: usize,
}

/// Simulated seconds left in the current step and the whole recipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemainingTimes {
    pub step_seconds: u32,
    pub recipe_seconds: u32,
}

/// What the appliance is doing right now
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveParameters {
    pub task: Option<String>,
    pub temperature_c: u16,
    pub speed: u8,
}
