// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pass-through façade for UI layers

use crate::appliance::{Appliance, ApplianceStatus};
use crate::config::ApplianceConfig;
use crate::error::ApplianceError;
use crate::observer::{Notification, Observer, ObserverId};
use crate::recipe::Recipe;
use crate::state::ApplianceState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Forwards UI commands to one appliance
#[derive(Clone, Default)]
pub struct Controller {
    appliance: Appliance,
}

impl Controller {
    pub fn new(appliance: Appliance) -> Self {
        Self { appliance }
    }

    pub fn with_config(config: ApplianceConfig) -> Self {
        Self::new(Appliance::new(config))
    }

    pub fn appliance(&self) -> &Appliance {
        &self.appliance
    }

    pub fn power_on(&self) -> bool {
        self.appliance.power_on()
    }

    pub fn power_off(&self) -> Result<bool, ApplianceError> {
        self.appliance.power_off()
    }

    pub fn pause(&self) -> Result<bool, ApplianceError> {
        self.appliance.pause()
    }

    pub fn resume(&self) -> Result<bool, ApplianceError> {
        self.appliance.resume()
    }

    pub fn cancel(&self) -> Result<(), ApplianceError> {
        self.appliance.cancel()
    }

    pub fn emergency_stop(&self) {
        self.appliance.emergency_stop()
    }

    pub fn prepare(&self, recipe: Recipe) -> Result<bool, ApplianceError> {
        self.appliance.prepare(recipe)
    }

    pub async fn run(&self) -> Result<bool, ApplianceError> {
        self.appliance.run().await
    }

    /// Prepare and run a recipe to the end
    pub async fn run_recipe(&self, recipe: Recipe) -> Result<bool, ApplianceError> {
        self.appliance.prepare(recipe)?;
        self.appliance.run().await
    }

    /// Prepare a recipe and run it on a background task
    ///
    /// Preparation errors are returned immediately; the handle resolves to
    /// the run result.
    pub fn spawn_recipe(
        &self,
        recipe: Recipe,
    ) -> Result<JoinHandle<Result<bool, ApplianceError>>, ApplianceError> {
        self.appliance.prepare(recipe)?;
        let appliance = self.appliance.clone();
        Ok(tokio::spawn(async move { appliance.run().await }))
    }

    pub fn state(&self) -> ApplianceState {
        self.appliance.state()
    }

    pub fn status(&self) -> ApplianceStatus {
        self.appliance.status()
    }

    pub fn add_observer(&self, observer: Arc<dyn Observer>) -> ObserverId {
        self.appliance.add_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.appliance.remove_observer(id)
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification> {
        self.appliance.subscribe()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
