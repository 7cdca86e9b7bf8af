// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The appliance state machine
//!
//! [`Appliance`] is a cheap handle; clones share one appliance. Commands may
//! be issued from any task while a recipe runs and take effect at the run's
//! next suspension point. Notifications are collected while the status lock
//! is held and delivered after it is released, so observers may call back
//! into the appliance.

mod runtime;
mod status;

pub use status::{ActiveParameters, ApplianceStatus, RemainingTimes};

use crate::config::ApplianceConfig;
use crate::error::ApplianceError;
use crate::observer::{Notification, Observer, ObserverId, ObserverRegistry};
use crate::recipe::Recipe;
use crate::simulator::Simulator;
use crate::state::ApplianceState;
use crate::task::{Setpoints, MAX_SPEED, MAX_TEMPERATURE_C, MIN_SPEED, MIN_TEMPERATURE_C};
use status::Status;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{info, warn};

struct Shared {
    status: Mutex<Status>,
    simulator: Simulator,
    observers: ObserverRegistry,
    cancel_requested: AtomicBool,
    /// Bumped when a run starts and on emergency stop; a run whose epoch is
    /// stale must not touch the status
    epoch: AtomicU64,
    config: ApplianceConfig,
}

/// Notifications queued while the status lock is held
#[derive(Default)]
struct Outbox(Vec<Notification>);

impl Outbox {
    fn state(&mut self, state: ApplianceState) {
        self.0.push(Notification::StateChanged(state));
    }

    fn progress(&mut self, percent: u8) {
        self.0.push(Notification::ProgressChanged(percent));
    }

    fn event(&mut self, message: impl Into<String>) {
        self.0.push(Notification::Event(message.into()));
    }
}

/// Move through the transition table, notifying on change
///
/// Staying put succeeds silently; a target outside the table is rejected
/// without touching the status.
fn transition(status: &mut Status, outbox: &mut Outbox, target: ApplianceState) -> bool {
    let from = status.state;
    if from == target {
        return true;
    }
    match from.transition(target) {
        Some(next) => {
            status.state = next;
            info!(%from, to = %next, "state transition");
            outbox.state(next);
            true
        }
        None => {
            warn!(%from, to = %target, "rejected state transition");
            false
        }
    }
}

/// Set the state bypassing the table, notifying only on change
fn force(status: &mut Status, outbox: &mut Outbox, target: ApplianceState) {
    let from = status.state;
    if from != target {
        status.state = target;
        info!(%from, to = %target, "forced state transition");
        outbox.state(target);
    }
}

/// Handle to a simulated cooking appliance
#[derive(Clone)]
pub struct Appliance {
    shared: Arc<Shared>,
}

impl Default for Appliance {
    fn default() -> Self {
        Self::new(ApplianceConfig::default())
    }
}

impl Appliance {
    /// Create a powered-off appliance
    pub fn new(config: ApplianceConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                status: Mutex::new(Status::default()),
                simulator: Simulator::new(config.simulator.clone()),
                observers: ObserverRegistry::new(),
                cancel_requested: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &ApplianceConfig {
        &self.shared.config
    }

    /// Mutate the status under the lock, then deliver queued notifications
    fn update<R>(&self, f: impl FnOnce(&mut Status, &mut Outbox) -> R) -> R {
        let mut outbox = Outbox::default();
        let result = {
            let mut status = self.shared.status.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut status, &mut outbox)
        };
        for notification in outbox.0 {
            self.shared.observers.notify(&notification);
        }
        result
    }

    /// Like `update`, but skipped when the run `epoch` has been superseded
    fn update_run<R>(
        &self,
        epoch: u64,
        f: impl FnOnce(&mut Status, &mut Outbox) -> R,
    ) -> Option<R> {
        self.update(|status, outbox| {
            if self.shared.epoch.load(Ordering::SeqCst) != epoch {
                return None;
            }
            Some(f(status, outbox))
        })
    }

    fn read<R>(&self, f: impl FnOnce(&Status) -> R) -> R {
        let status = self.shared.status.lock().unwrap_or_else(|e| e.into_inner());
        f(&status)
    }

    // Commands

    /// Power on from OFF; returns false from any other state
    pub fn power_on(&self) -> bool {
        self.update(|status, outbox| {
            if status.state != ApplianceState::Off {
                warn!(state = %status.state, "power on ignored");
                return false;
            }
            status.reset_all();
            transition(status, outbox, ApplianceState::Idle);
            outbox.event("Appliance powered on and ready");
            true
        })
    }

    /// Power off from any non-busy state, clearing everything
    ///
    /// Returns false when already off.
    pub fn power_off(&self) -> Result<bool, ApplianceError> {
        self.update(|status, outbox| {
            if status.state.is_busy() {
                return Err(ApplianceError::Busy);
            }
            if status.state == ApplianceState::Off {
                return Ok(false);
            }
            status.reset_all();
            force(status, outbox, ApplianceState::Off);
            outbox.event("Appliance powered off");
            Ok(true)
        })
    }

    /// Stop everything immediately and land in IDLE from any state
    ///
    /// A run in flight notices at its next suspension point and returns
    /// false without touching the post-stop status.
    pub fn emergency_stop(&self) {
        self.update(|status, outbox| {
            self.shared.epoch.fetch_add(1, Ordering::SeqCst);
            self.shared.simulator.cancel();
            self.shared.cancel_requested.store(false, Ordering::SeqCst);

            let had_progress = status.recipe_progress > 0;
            status.reset_all();
            force(status, outbox, ApplianceState::Idle);
            if had_progress {
                outbox.progress(0);
            }
            warn!("emergency stop");
            outbox.event("EMERGENCY STOP ACTIVATED");
        })
    }

    /// Suspend the running recipe
    pub fn pause(&self) -> Result<bool, ApplianceError> {
        self.update(|status, outbox| {
            if status.state != ApplianceState::Running {
                return Err(ApplianceError::InvalidOperation(format!(
                    "cannot pause while {}",
                    status.state
                )));
            }
            self.shared.simulator.pause();
            transition(status, outbox, ApplianceState::Paused);
            outbox.event("Recipe paused");
            Ok(true)
        })
    }

    /// Continue a paused recipe
    pub fn resume(&self) -> Result<bool, ApplianceError> {
        self.update(|status, outbox| {
            if status.state != ApplianceState::Paused {
                return Err(ApplianceError::InvalidOperation(format!(
                    "cannot resume while {}",
                    status.state
                )));
            }
            self.shared.simulator.resume();
            transition(status, outbox, ApplianceState::Running);
            outbox.event("Recipe resumed");
            Ok(true)
        })
    }

    /// Ask the running recipe to stop; it ends in IDLE
    pub fn cancel(&self) -> Result<(), ApplianceError> {
        self.update(|status, _| {
            if !status.state.is_busy() {
                return Err(ApplianceError::InvalidOperation(format!(
                    "no recipe running (state {})",
                    status.state
                )));
            }
            self.shared.cancel_requested.store(true, Ordering::SeqCst);
            self.shared.simulator.cancel();
            info!("cancellation requested");
            Ok(())
        })
    }

    /// Load a recipe for the next run
    pub fn prepare(&self, recipe: Recipe) -> Result<bool, ApplianceError> {
        self.update(|status, outbox| {
            match status.state {
                ApplianceState::Off => return Err(ApplianceError::PoweredOff),
                ApplianceState::Idle | ApplianceState::Done => {}
                other => {
                    return Err(ApplianceError::InvalidOperation(format!(
                        "cannot prepare a recipe while {other}"
                    )))
                }
            }
            if recipe.steps.is_empty() {
                return Err(ApplianceError::Recipe(format!(
                    "recipe {:?} has no steps",
                    recipe.name
                )));
            }

            self.shared.cancel_requested.store(false, Ordering::SeqCst);
            self.shared.simulator.reset();

            status.reset_progress();
            status.recipe_remaining_s = recipe.steps_duration();
            let message = format!(
                "Recipe \"{}\" prepared ({} steps)",
                recipe.name,
                recipe.step_count()
            );
            info!(recipe = %recipe.name, steps = recipe.step_count(), "recipe prepared");
            status.recipe = Some(Arc::new(recipe));

            transition(status, outbox, ApplianceState::Prepared);
            outbox.event(message);
            Ok(true)
        })
    }

    /// Drop a prepared or finished recipe and return to IDLE
    pub fn clear_recipe(&self) -> Result<(), ApplianceError> {
        self.update(|status, outbox| match status.state {
            ApplianceState::Prepared | ApplianceState::Done => {
                status.reset_all();
                transition(status, outbox, ApplianceState::Idle);
                Ok(())
            }
            ApplianceState::Off => Err(ApplianceError::PoweredOff),
            other => Err(ApplianceError::InvalidOperation(format!(
                "no recipe to clear while {other}"
            ))),
        })
    }

    /// Leave ERROR for IDLE
    pub fn acknowledge_error(&self) -> Result<(), ApplianceError> {
        self.update(|status, outbox| {
            if status.state != ApplianceState::Error {
                return Err(ApplianceError::InvalidOperation(format!(
                    "no error to acknowledge (state {})",
                    status.state
                )));
            }
            status.reset_all();
            transition(status, outbox, ApplianceState::Idle);
            Ok(())
        })
    }

    /// Set the temperature directly; out-of-range values are rejected
    pub fn set_temperature(&self, value: i32) -> Result<(), ApplianceError> {
        let temperature_c = u16::try_from(value)
            .ok()
            .filter(|t| (MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(t))
            .ok_or(ApplianceError::OutOfRange {
                field: "temperature",
                value: i64::from(value),
                min: i64::from(MIN_TEMPERATURE_C),
                max: i64::from(MAX_TEMPERATURE_C),
            })?;
        self.update(|status, _| {
            if status.state == ApplianceState::Off {
                return Err(ApplianceError::PoweredOff);
            }
            status.setpoints.temperature_c = temperature_c;
            Ok(())
        })
    }

    /// Set the speed directly; out-of-range values are rejected
    pub fn set_speed(&self, value: i32) -> Result<(), ApplianceError> {
        let speed = u8::try_from(value)
            .ok()
            .filter(|s| (MIN_SPEED..=MAX_SPEED).contains(s))
            .ok_or(ApplianceError::OutOfRange {
                field: "speed",
                value: i64::from(value),
                min: i64::from(MIN_SPEED),
                max: i64::from(MAX_SPEED),
            })?;
        self.update(|status, _| {
            if status.state == ApplianceState::Off {
                return Err(ApplianceError::PoweredOff);
            }
            status.setpoints.speed = speed;
            Ok(())
        })
    }

    /// Change time compression; applies from the next step
    pub fn set_speed_multiplier(&self, multiplier: f64) -> Result<(), ApplianceError> {
        self.shared.simulator.set_speed_multiplier(multiplier)
    }

    // Queries

    pub fn state(&self) -> ApplianceState {
        self.read(|status| status.state)
    }

    pub fn status(&self) -> ApplianceStatus {
        self.read(Status::snapshot)
    }

    pub fn setpoints(&self) -> Setpoints {
        self.read(|status| status.setpoints)
    }

    pub fn remaining_times(&self) -> RemainingTimes {
        self.read(|status| RemainingTimes {
            step_seconds: status.step_remaining_s,
            recipe_seconds: status.recipe_remaining_s,
        })
    }

    pub fn active_parameters(&self) -> ActiveParameters {
        self.read(|status| ActiveParameters {
            task: status.active_task.clone(),
            temperature_c: status.setpoints.temperature_c,
            speed: status.setpoints.speed,
        })
    }

    /// Check if a recipe is running or paused
    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }

    pub fn cancel_requested(&self) -> bool {
        self.shared.cancel_requested.load(Ordering::SeqCst)
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.shared.simulator.speed_multiplier()
    }

    // Observers

    pub fn add_observer(&self, observer: Arc<dyn Observer>) -> ObserverId {
        self.shared.observers.add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.shared.observers.remove(id)
    }

    /// Receive every notification through a channel
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (_id, rx) = self.shared.observers.subscribe();
        rx
    }
}
