// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe execution loop

use super::{transition, Appliance, Outbox, Status};
use crate::error::ApplianceError;
use crate::recipe::Recipe;
use crate::state::ApplianceState;
use crate::task::Task;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Recipe progress never reaches 100 before completion
const MAX_RUNNING_PROGRESS: u8 = 99;

/// Percentage of a step, rounded down
fn step_percent(elapsed: u32, duration: u32) -> u8 {
    if duration == 0 {
        return 100;
    }
    (u64::from(elapsed.min(duration)) * 100 / u64::from(duration)) as u8
}

/// `((completed + fraction) / total) * 100`, capped below 100
fn overall_progress(completed: usize, elapsed: u32, duration: u32, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let fraction = if duration == 0 {
        1.0
    } else {
        f64::from(elapsed.min(duration)) / f64::from(duration)
    };
    let percent = (completed as f64 + fraction) / total as f64 * 100.0;
    (percent.floor() as u8).min(MAX_RUNNING_PROGRESS)
}

/// A run may only finish from RUNNING; a pending pause is lifted first
fn leave_paused(appliance: &Appliance, status: &mut Status, outbox: &mut Outbox) {
    if status.state == ApplianceState::Paused {
        appliance.shared.simulator.resume();
        transition(status, outbox, ApplianceState::Running);
    }
}

impl Appliance {
    /// Execute the prepared recipe
    ///
    /// Guard failures are returned as errors. Once running, the result is
    /// `Ok(true)` on completion and `Ok(false)` when the run was cancelled,
    /// failed mid-step, or was superseded by an emergency stop.
    pub async fn run(&self) -> Result<bool, ApplianceError> {
        let (epoch, recipe) = self.update(|status, outbox| {
            match status.state {
                ApplianceState::Off => return Err(ApplianceError::PoweredOff),
                ApplianceState::Prepared => {}
                other => {
                    return Err(ApplianceError::InvalidOperation(format!(
                        "cannot run while {other}"
                    )))
                }
            }
            let recipe = status
                .recipe
                .clone()
                .ok_or_else(|| ApplianceError::Recipe("no recipe prepared".to_string()))?;

            let epoch = self.shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            transition(status, outbox, ApplianceState::Running);
            outbox.event(format!("Starting recipe: {}", recipe.name));
            Ok((epoch, recipe))
        })?;

        info!(recipe = %recipe.name, steps = recipe.step_count(), "recipe started");
        Ok(self.execute(epoch, recipe).await)
    }

    async fn execute(&self, epoch: u64, recipe: Arc<Recipe>) -> bool {
        let total = recipe.step_count();
        let rules = self.shared.config.task_rules();

        for (index, step) in recipe.steps.iter().enumerate() {
            if self.cancel_requested() {
                return self.finish_cancelled(epoch);
            }

            let future_s = recipe.steps[index + 1..]
                .iter()
                .fold(0u32, |acc, s| acc.saturating_add(s.duration_seconds));
            let begun = self.update_run(epoch, |status, _| {
                status.step_index = index;
                status.step_progress = 0;
                status.step_remaining_s = step.duration_seconds;
                status.recipe_remaining_s = step.duration_seconds.saturating_add(future_s);
            });
            if begun.is_none() {
                return false;
            }

            let task = match Task::from_step(step).and_then(|task| {
                task.validate_with(&rules)
                    .map_err(ApplianceError::InvalidTask)
                    .map(|()| task)
            }) {
                Ok(task) => task,
                Err(e) => return self.fail(epoch, index, e),
            };

            debug!(step = index + 1, total, %task, "starting step");
            let applied = self.update_run(epoch, |status, outbox| {
                task.apply(&mut status.setpoints);
                status.active_task = Some(task.name());
                outbox.event(task.start_message());
            });
            if applied.is_none() {
                return false;
            }

            let completed = self
                .shared
                .simulator
                .simulate(task.duration_s(), |elapsed, duration| {
                    self.update_run(epoch, |status, outbox| {
                        status.step_progress = step_percent(elapsed, duration);
                        let remaining = duration.saturating_sub(elapsed);
                        status.step_remaining_s = remaining;
                        status.recipe_remaining_s = remaining.saturating_add(future_s);

                        let progress = overall_progress(index, elapsed, duration, total);
                        if progress > status.recipe_progress {
                            status.recipe_progress = progress;
                            outbox.progress(progress);
                        }
                    });
                })
                .await;

            if !completed {
                if self.cancel_requested() {
                    return self.finish_cancelled(epoch);
                }
                let e = ApplianceError::Execution(format!("{} was interrupted", task.name()));
                return self.fail(epoch, index, e);
            }

            let finished = self.update_run(epoch, |status, outbox| {
                status.step_progress = 100;
                status.active_task = None;
                outbox.event(task.finish_message());
            });
            if finished.is_none() {
                return false;
            }
            debug!(step = index + 1, total, "step finished");

            tokio::time::sleep(self.shared.config.step_settle).await;
            self.shared.simulator.hold_while_paused().await;
        }

        if self.cancel_requested() {
            return self.finish_cancelled(epoch);
        }
        self.complete(epoch, total)
    }

    fn complete(&self, epoch: u64, total: usize) -> bool {
        let done = self.update_run(epoch, |status, outbox| {
            status.reset_setpoints();
            status.active_task = None;
            status.step_index = total;
            status.step_progress = 100;
            status.recipe_progress = 100;
            status.step_remaining_s = 0;
            status.recipe_remaining_s = 0;

            leave_paused(self, status, outbox);
            transition(status, outbox, ApplianceState::Done);
            outbox.progress(100);
            outbox.event("Recipe completed successfully");
        });
        if done.is_some() {
            info!("recipe completed");
        }
        done.is_some()
    }

    fn finish_cancelled(&self, epoch: u64) -> bool {
        let cancelled = self.update_run(epoch, |status, outbox| {
            self.shared.cancel_requested.store(false, Ordering::SeqCst);
            status.reset_all();
            transition(status, outbox, ApplianceState::Idle);
            outbox.event("Recipe cancelled");
        });
        if cancelled.is_some() {
            info!("recipe cancelled");
        }
        false
    }

    fn fail(&self, epoch: u64, index: usize, e: ApplianceError) -> bool {
        let failed = self.update_run(epoch, |status, outbox| {
            status.reset_setpoints();
            status.active_task = None;
            leave_paused(self, status, outbox);
            transition(status, outbox, ApplianceState::Error);
            outbox.event(format!("Error: {e}"));
        });
        if failed.is_some() {
            error!(step = index + 1, error = %e, "recipe run failed");
        }
        false
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
