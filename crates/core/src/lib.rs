// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sous-core: control engine for a simulated cooking appliance
//!
//! This crate provides:
//! - The appliance lifecycle state machine and its transition table
//! - A closed set of tasks (cut, temperature, mechanical) built from recipe steps
//! - A time-compressed, pausable, cancelable step simulator
//! - Observer fan-out for state, progress and event notifications
//! - Recipe and configuration loading

pub mod appliance;
pub mod config;
pub mod controller;
pub mod error;
pub mod observer;
pub mod recipe;
pub mod simulator;
pub mod state;
pub mod task;

pub use appliance::{ActiveParameters, Appliance, ApplianceStatus, RemainingTimes};
pub use config::{ApplianceConfig, ConfigError, SimulatorConfig};
pub use controller::Controller;
pub use error::ApplianceError;
pub use observer::{
    ChannelObserver, FnObserver, Notification, Observer, ObserverId, ObserverRegistry,
};
pub use recipe::{format_duration, Ingredient, Recipe, RecipeLoadError, StepSpec};
pub use simulator::{Simulator, TickPlan, MAX_SPEED_MULTIPLIER};
pub use state::ApplianceState;
pub use task::{Operation, Setpoints, Task, TaskKind, TaskRules};
