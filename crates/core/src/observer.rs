// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification fan-out to observers
//!
//! Observers are called synchronously, in registration order. A panicking
//! observer is logged and skipped; the others are still notified.

use crate::state::ApplianceState;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// A change reported by the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Notification {
    StateChanged(ApplianceState),
    /// Recipe-level progress, 0-100
    ProgressChanged(u8),
    Event(String),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::StateChanged(_) => "state",
            Notification::ProgressChanged(_) => "progress",
            Notification::Event(_) => "event",
        }
    }
}

/// Listener for appliance notifications
///
/// All methods default to no-ops so observers implement only what they need.
pub trait Observer: Send + Sync {
    fn on_state_changed(&self, _state: ApplianceState) {}
    fn on_progress_changed(&self, _percent: u8) {}
    fn on_event(&self, _message: &str) {}

    /// A closed observer is dropped from its registry
    fn is_closed(&self) -> bool {
        false
    }
}

fn deliver(observer: &dyn Observer, notification: &Notification) {
    match notification {
        Notification::StateChanged(state) => observer.on_state_changed(*state),
        Notification::ProgressChanged(percent) => observer.on_progress_changed(*percent),
        Notification::Event(message) => observer.on_event(message),
    }
}

/// Observer backed by a closure receiving every notification
pub struct FnObserver<F>(F);

impl<F> FnObserver<F>
where
    F: Fn(&Notification) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Observer for FnObserver<F>
where
    F: Fn(&Notification) + Send + Sync,
{
    fn on_state_changed(&self, state: ApplianceState) {
        (self.0)(&Notification::StateChanged(state))
    }

    fn on_progress_changed(&self, percent: u8) {
        (self.0)(&Notification::ProgressChanged(percent))
    }

    fn on_event(&self, message: &str) {
        (self.0)(&Notification::Event(message.to_string()))
    }
}

/// Observer forwarding notifications into an unbounded channel
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Observer for ChannelObserver {
    fn on_state_changed(&self, state: ApplianceState) {
        let _ = self.tx.send(Notification::StateChanged(state));
    }

    fn on_progress_changed(&self, percent: u8) {
        let _ = self.tx.send(Notification::ProgressChanged(percent));
    }

    fn on_event(&self, message: &str) {
        let _ = self.tx.send(Notification::Event(message.to_string()));
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle returned when registering an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

type Entry = (ObserverId, Arc<dyn Observer>);

/// Ordered list of observers
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    observers: Arc<RwLock<Vec<Entry>>>,
    next_id: Arc<AtomicU64>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; registering the same instance twice returns its existing id
    pub fn add(&self, observer: Arc<dyn Observer>) -> ObserverId {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        observers.retain(|(_, o)| !o.is_closed());

        let existing = observers
            .iter()
            .find(|(_, o)| same_instance(o, &observer))
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            return id;
        }

        let id = ObserverId(self.next_id.fetch_add(1, Ordering::SeqCst));
        observers.push((id, observer));
        id
    }

    /// Remove an observer, returning whether it was registered
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Register a channel observer and return its receiver
    pub fn subscribe(&self) -> (ObserverId, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.add(Arc::new(ChannelObserver::new(tx)));
        (id, rx)
    }

    /// Number of live observers
    pub fn len(&self) -> usize {
        self.prune();
        self.observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a notification to every observer
    ///
    /// The list is snapshotted first, so observers may call back into the
    /// appliance or register other observers.
    pub fn notify(&self, notification: &Notification) {
        let snapshot: Vec<Entry> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        let mut closed = false;
        for (id, observer) in snapshot {
            if observer.is_closed() {
                closed = true;
                continue;
            }
            let delivered = catch_unwind(AssertUnwindSafe(|| {
                deliver(observer.as_ref(), notification)
            }));
            if delivered.is_err() {
                tracing::error!(
                    %id,
                    notification = notification.name(),
                    "observer panicked while handling notification"
                );
            }
        }
        if closed {
            self.prune();
        }
    }

    /// Drop observers that can no longer receive, such as channels whose receiver is gone
    fn prune(&self) {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(_, o)| !o.is_closed());
        if observers.len() != before {
            tracing::debug!(removed = before - observers.len(), "pruned closed observers");
        }
    }
}

fn same_instance(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
