//! Transition notification.
//!
//! # Responsibilities
//! - Hold the configured zero-argument hooks and any registered observers
//! - Fire them when a call moves the breaker into a different state
//!
//! # Design Decisions
//! - Generic "state changed" fires before the specific trip/reset callback
//! - Hooks run synchronously on the caller's task, after the ledger is updated
//!   and while the call is still serialised, so they arrive in transition order
//! - A panicking hook is caught and logged; the breaker stays usable
//! - Hooks are swapped atomically so they can be reassigned at any time

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::resilience::state::ProtectiveState;

/// Zero-argument event callback.
pub type Hook = Arc<dyn Fn() + Send + Sync>;

/// A state change observed across one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: ProtectiveState,
    pub to: ProtectiveState,
    /// Failure count after the call.
    pub failure_count: u32,
}

/// Receives breaker transitions.
pub trait BreakerObserver: Send + Sync {
    fn on_state_changed(&self, _transition: &Transition) {}

    /// New state is Blocked.
    fn on_tripped(&self, _transition: &Transition) {}

    /// New state is Normal.
    fn on_reset(&self, _transition: &Transition) {}
}

/// The three optional hooks from the configuration.
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_trip: Option<Hook>,
    pub on_reset: Option<Hook>,
    pub on_state_change: Option<Hook>,
}

impl BreakerObserver for Hooks {
    fn on_state_changed(&self, _transition: &Transition) {
        if let Some(hook) = &self.on_state_change {
            hook();
        }
    }

    fn on_tripped(&self, _transition: &Transition) {
        if let Some(hook) = &self.on_trip {
            hook();
        }
    }

    fn on_reset(&self, _transition: &Transition) {
        if let Some(hook) = &self.on_reset {
            hook();
        }
    }
}

/// Dispatches transitions to hooks and observers.
pub struct Notifier {
    hooks: ArcSwap<Hooks>,
    observers: ArcSwap<Vec<Arc<dyn BreakerObserver>>>,
}

impl Notifier {
    pub fn new(hooks: Hooks) -> Self {
        Self {
            hooks: ArcSwap::from_pointee(hooks),
            observers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Replace hooks in place.
    pub fn update_hooks<F>(&self, update: F)
    where
        F: Fn(&mut Hooks),
    {
        self.hooks.rcu(|current| {
            let mut hooks = Hooks::clone(current);
            update(&mut hooks);
            hooks
        });
    }

    pub fn add_observer(&self, observer: Arc<dyn BreakerObserver>) {
        self.observers.rcu(|current| {
            let mut observers = Vec::clone(current);
            observers.push(observer.clone());
            observers
        });
    }

    /// Fire callbacks if `transition` actually changed the state.
    pub fn notify(&self, breaker: &str, transition: Transition) {
        if transition.from == transition.to {
            return;
        }

        let hooks = self.hooks.load_full();
        let observers = self.observers.load_full();

        let mut all: Vec<&dyn BreakerObserver> = Vec::with_capacity(observers.len() + 1);
        all.push(&*hooks);
        for observer in observers.iter() {
            all.push(&**observer);
        }

        for observer in all {
            contained(breaker, "state_changed", || observer.on_state_changed(&transition));
            match transition.to {
                ProtectiveState::Blocked => {
                    contained(breaker, "tripped", || observer.on_tripped(&transition))
                }
                ProtectiveState::Normal => {
                    contained(breaker, "reset", || observer.on_reset(&transition))
                }
                ProtectiveState::Probing => {}
            }
        }
    }
}

fn contained<F: FnOnce()>(breaker: &str, hook: &'static str, f: F) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(breaker = %breaker, hook, "Breaker hook panicked");
    }
}
