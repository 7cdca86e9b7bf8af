// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-compressed step simulator
//!
//! Turns a nominal step duration into a short real wait split into ticks,
//! reporting simulated progress after each tick. Pause and cancel are atomic
//! flags that the running simulation observes at its next suspension point.

use crate::config::SimulatorConfig;
use crate::error::ApplianceError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Largest accepted multiplier: one simulated second takes at most this many real seconds
pub const MAX_SPEED_MULTIPLIER: f64 = 100.0;

/// Whether `multiplier` is finite, positive and no larger than [`MAX_SPEED_MULTIPLIER`]
pub fn is_valid_speed_multiplier(multiplier: f64) -> bool {
    multiplier.is_finite() && multiplier > 0.0 && multiplier <= MAX_SPEED_MULTIPLIER
}

/// Real-time plan for simulating one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    /// Total real time the step takes
    pub real_wait: Duration,
    pub ticks: u32,
    /// Real time between progress callbacks
    pub interval: Duration,
}

impl TickPlan {
    /// Plan a step of `duration_s` simulated seconds: wait `max(floor, D*m)`
    /// split into `clamp(D, min_ticks, max_ticks)` ticks
    ///
    /// Tick bounds are forced to at least one tick with `max >= min`, and a
    /// wait too long for a `Duration` saturates.
    pub fn new(duration_s: u32, multiplier: f64, config: &SimulatorConfig) -> Self {
        let scaled = f64::from(duration_s) * multiplier;
        let real_secs = scaled.max(config.min_real_wait.as_secs_f64());
        let min_ticks = config.min_ticks.max(1);
        let max_ticks = config.max_ticks.max(min_ticks);
        let ticks = duration_s.clamp(min_ticks, max_ticks);
        let real_wait = Duration::try_from_secs_f64(real_secs).unwrap_or(Duration::MAX);
        Self {
            real_wait,
            ticks,
            interval: real_wait / ticks,
        }
    }

    /// Simulated seconds elapsed after `tick` ticks, rounded down
    pub fn elapsed_at(&self, tick: u32, duration_s: u32) -> u32 {
        (u64::from(tick) * u64::from(duration_s) / u64::from(self.ticks)) as u32
    }
}

/// Cancelable, pausable progress engine
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    /// f64 bits
    speed_multiplier: AtomicU64,
    paused: AtomicBool,
    cancelled: AtomicBool,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let multiplier = config.speed_multiplier;
        Self {
            config,
            speed_multiplier: AtomicU64::new(multiplier.to_bits()),
            paused: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn speed_multiplier(&self) -> f64 {
        f64::from_bits(self.speed_multiplier.load(Ordering::SeqCst))
    }

    /// Change the multiplier; a step already in flight keeps its plan
    pub fn set_speed_multiplier(&self, multiplier: f64) -> Result<(), ApplianceError> {
        if !is_valid_speed_multiplier(multiplier) {
            return Err(ApplianceError::InvalidSpeedMultiplier(multiplier));
        }
        self.speed_multiplier
            .store(multiplier.to_bits(), Ordering::SeqCst);
        Ok(())
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        debug!("simulator paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        debug!("simulator resumed");
    }

    /// Stop the simulation at its next suspension point; also lifts a pause
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        debug!("simulator cancelled");
    }

    /// Clear both flags before a new recipe
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Plan a step with the current multiplier
    pub fn plan(&self, duration_s: u32) -> TickPlan {
        TickPlan::new(duration_s, self.speed_multiplier(), &self.config)
    }

    /// Wait while paused, polling at a fixed interval
    ///
    /// Returns false if the simulation was cancelled.
    pub async fn hold_while_paused(&self) -> bool {
        while self.is_paused() && !self.is_cancelled() {
            tokio::time::sleep(self.config.pause_poll_interval).await;
        }
        !self.is_cancelled()
    }

    /// Simulate a step of `duration_s` simulated seconds
    ///
    /// Calls `on_progress(elapsed, duration_s)` after every tick and once more
    /// with `(duration_s, duration_s)` at the end. Returns false as soon as a
    /// cancellation is observed.
    pub async fn simulate<F>(&self, duration_s: u32, mut on_progress: F) -> bool
    where
        F: FnMut(u32, u32),
    {
        if duration_s == 0 {
            on_progress(0, 0);
            return true;
        }

        let plan = self.plan(duration_s);
        debug!(
            duration_s,
            real_wait_ms = plan.real_wait.as_millis() as u64,
            ticks = plan.ticks,
            "simulating step"
        );

        for tick in 1..=plan.ticks {
            if self.is_cancelled() {
                debug!(tick, "simulation stopped");
                return false;
            }
            if !self.hold_while_paused().await {
                debug!(tick, "simulation stopped while paused");
                return false;
            }

            tokio::time::sleep(plan.interval).await;
            on_progress(plan.elapsed_at(tick, duration_s), duration_s);
        }

        on_progress(duration_s, duration_s);
        debug!(duration_s, "simulation complete");
        true
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

#[cfg(test)]
#[path = "simulator_tests.rs"]
mod tests;
