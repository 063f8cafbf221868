//! Circuit breaker guarding calls to an unreliable operation.
//!
//! # Call Flow
//! ```text
//! call()
//!     → derive pre-call state from the ledger
//!     → Blocked:        skip target, fallback or reject
//!     → Normal/Probing: bounded invocation, fallback on failure
//!     → ledger: reset on genuine success, record on failure
//!     → derive post-call state
//!     → notifier: hooks for any transition
//! ```
//!
//! # Design Decisions
//! - Per-operation breaker; share it behind an `Arc`
//! - The derive / dispatch / record sequence is serialised per breaker, so a
//!   Probing breaker lets exactly one trial call through
//! - Calls rejected while Blocked leave the ledger alone; the grace period
//!   runs from the last genuine failure
//! - Calls rejected while Blocked are not counted as failures, even when the
//!   fallback serves them, so they never extend the block
//! - Hooks fire before the gate is released, in transition order; a hook must
//!   not call back into `call()`
//! - Fail fast in Blocked (no waiting for timeout)

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::config::breaker::BreakerConfig;
use crate::config::schema::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_GRACE_PERIOD_MS, DEFAULT_TIMEOUT_MS};
use crate::resilience::error::{BoxError, BreakerError};
use crate::resilience::ledger::FailureLedger;
use crate::resilience::notifier::{BreakerObserver, Hook, Hooks, Notifier, Transition};
use crate::resilience::state::ProtectiveState;
use crate::resilience::timeouts::{invoke_with_timeout, SharedOperation};

/// Result of one guarded call.
#[derive(Debug)]
pub struct CallOutcome<T> {
    /// Content from the target or the fallback.
    pub content: Option<T>,
    /// True when the fallback produced this outcome.
    pub via_fallback: bool,
    /// `None` only for a genuine target success.
    pub error: Option<BreakerError>,
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Serializable view of a breaker.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: ProtectiveState,
    pub failure_count: u32,
    pub failures: Vec<String>,
    pub failure_threshold: u32,
    pub timeout_ms: u64,
    pub grace_period_ms: u64,
}

enum LedgerUpdate {
    Untouched,
    Reset,
    Failure(String),
}

pub struct CircuitBreaker<T> {
    name: String,
    target: SharedOperation<T>,
    fallback: Option<SharedOperation<T>>,
    timeout: Duration,
    grace_period: Duration,
    failure_threshold: u32,
    cancel_on_timeout: bool,
    ledger: Mutex<FailureLedger>,
    call_gate: tokio::sync::Mutex<()>,
    notifier: Notifier,
}

impl<T: Send + 'static> CircuitBreaker<T> {
    /// Build a breaker, filling unset settings with defaults.
    ///
    /// Fails with [`BreakerError::Configuration`] when no target is given.
    pub fn new(config: BreakerConfig<T>) -> Result<Self, BreakerError> {
        let target = config.target.ok_or_else(|| {
            BreakerError::Configuration("a target operation must be provided".to_string())
        })?;

        let breaker = Self {
            name: config.name.unwrap_or_else(|| "default".to_string()),
            target,
            fallback: config.fallback,
            timeout: config
                .timeout
                .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            grace_period: config
                .grace_period
                .unwrap_or(Duration::from_millis(DEFAULT_GRACE_PERIOD_MS)),
            failure_threshold: config
                .failure_threshold
                .filter(|t| *t > 0)
                .unwrap_or(DEFAULT_FAILURE_THRESHOLD),
            cancel_on_timeout: config.cancel_on_timeout,
            ledger: Mutex::new(FailureLedger::new()),
            call_gate: tokio::sync::Mutex::new(()),
            notifier: Notifier::new(config.hooks),
        };

        tracing::info!(
            breaker = %breaker.name,
            timeout_ms = breaker.timeout.as_millis() as u64,
            grace_period_ms = breaker.grace_period.as_millis() as u64,
            failure_threshold = breaker.failure_threshold,
            has_fallback = breaker.fallback.is_some(),
            "Circuit breaker initialized"
        );

        Ok(breaker)
    }

    /// Current protective state, recomputed on every query.
    pub fn state(&self) -> ProtectiveState {
        self.ledger()
            .state(self.failure_threshold, self.grace_period, Instant::now())
    }

    /// Guarded call to the target operation.
    ///
    /// Never waits longer than the timeout plus the fallback's own duration,
    /// not counting time spent queued behind concurrent calls or in hooks.
    pub async fn call(&self) -> CallOutcome<T> {
        let _gate = self.call_gate.lock().await;
        let pre = self.state();
        let (outcome, update) = self.dispatch(pre).await;
        let transition = self.settle(pre, update);

        // Still gated: observers see transitions in the order they happened.
        if transition.from != transition.to {
            self.log_transition(&transition);
            self.notifier.notify(&self.name, transition);
        }

        outcome
    }

    async fn dispatch(&self, pre: ProtectiveState) -> (CallOutcome<T>, LedgerUpdate) {
        if pre == ProtectiveState::Blocked {
            tracing::debug!(breaker = %self.name, "Call rejected while blocked");
            let outcome = match &self.fallback {
                Some(fallback) => {
                    let (content, fallback_error) = split(fallback.invoke().await);
                    CallOutcome {
                        content,
                        via_fallback: true,
                        error: Some(BreakerError::RejectedWhileBlocked { fallback_error }),
                    }
                }
                None => CallOutcome {
                    content: None,
                    via_fallback: false,
                    error: Some(BreakerError::RejectedWhileBlocked { fallback_error: None }),
                },
            };
            return (outcome, LedgerUpdate::Untouched);
        }

        match invoke_with_timeout(&self.target, self.timeout, self.cancel_on_timeout).await {
            Ok(content) => {
                let outcome = CallOutcome {
                    content: Some(content),
                    via_fallback: false,
                    error: None,
                };
                (outcome, LedgerUpdate::Reset)
            }
            Err(cause) => {
                tracing::warn!(
                    breaker = %self.name,
                    state = %pre,
                    error = %cause,
                    "Target operation failed"
                );
                let outcome = match &self.fallback {
                    Some(fallback) => {
                        let (content, fallback_error) = split(fallback.invoke().await);
                        CallOutcome {
                            content,
                            via_fallback: true,
                            error: Some(cause.with_fallback(fallback_error)),
                        }
                    }
                    None => CallOutcome {
                        content: None,
                        via_fallback: false,
                        error: Some(cause),
                    },
                };
                let description = outcome.error.as_ref().map(ToString::to_string);
                (outcome, LedgerUpdate::Failure(description.unwrap_or_default()))
            }
        }
    }

    /// Apply the ledger update and derive the post-call state.
    fn settle(&self, pre: ProtectiveState, update: LedgerUpdate) -> Transition {
        let now = Instant::now();
        let mut ledger = self.ledger();
        match update {
            LedgerUpdate::Untouched => {}
            LedgerUpdate::Reset => ledger.reset(),
            LedgerUpdate::Failure(description) => {
                let description = Some(description).filter(|d| !d.is_empty());
                ledger.record_failure(description, self.failure_threshold, now);
            }
        }

        Transition {
            from: pre,
            to: ledger.state(self.failure_threshold, self.grace_period, now),
            failure_count: ledger.failure_count(),
        }
    }

    fn log_transition(&self, transition: &Transition) {
        match transition.to {
            ProtectiveState::Blocked => tracing::warn!(
                breaker = %self.name,
                from = %transition.from,
                failure_count = transition.failure_count,
                grace_period_ms = self.grace_period.as_millis() as u64,
                "Circuit breaker tripped"
            ),
            ProtectiveState::Normal => tracing::info!(
                breaker = %self.name,
                from = %transition.from,
                "Circuit breaker reset"
            ),
            ProtectiveState::Probing => tracing::info!(
                breaker = %self.name,
                from = %transition.from,
                "Circuit breaker probing"
            ),
        }
    }
}

impl<T> CircuitBreaker<T> {
    fn ledger(&self) -> MutexGuard<'_, FailureLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn failure_count(&self) -> u32 {
        self.ledger().failure_count()
    }

    /// Descriptions of every failure since the last success, oldest first.
    pub fn failure_log(&self) -> Vec<String> {
        self.ledger().failures().to_vec()
    }

    /// Time since the last recorded failure.
    pub fn last_failure_age(&self) -> Option<Duration> {
        self.ledger()
            .last_failure()
            .map(|at| Instant::now().saturating_duration_since(at))
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let ledger = self.ledger();
        BreakerSnapshot {
            name: self.name.clone(),
            state: ledger.state(self.failure_threshold, self.grace_period, Instant::now()),
            failure_count: ledger.failure_count(),
            failures: ledger.failures().to_vec(),
            failure_threshold: self.failure_threshold,
            timeout_ms: self.timeout.as_millis() as u64,
            grace_period_ms: self.grace_period.as_millis() as u64,
        }
    }

    pub fn set_on_trip(&self, hook: impl Fn() + Send + Sync + 'static) {
        let hook: Hook = std::sync::Arc::new(hook);
        self.notifier.update_hooks(|h: &mut Hooks| h.on_trip = Some(hook.clone()));
    }

    pub fn set_on_reset(&self, hook: impl Fn() + Send + Sync + 'static) {
        let hook: Hook = std::sync::Arc::new(hook);
        self.notifier.update_hooks(|h: &mut Hooks| h.on_reset = Some(hook.clone()));
    }

    pub fn set_on_state_change(&self, hook: impl Fn() + Send + Sync + 'static) {
        let hook: Hook = std::sync::Arc::new(hook);
        self.notifier
            .update_hooks(|h: &mut Hooks| h.on_state_change = Some(hook.clone()));
    }

    /// Register an observer notified after the configured hooks.
    pub fn add_observer(&self, observer: std::sync::Arc<dyn BreakerObserver>) {
        self.notifier.add_observer(observer);
    }
}

impl<T> fmt::Debug for CircuitBreaker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("grace_period", &self.grace_period)
            .field("failure_threshold", &self.failure_threshold)
            .field("has_fallback", &self.fallback.is_some())
            .field("ledger", &*self.ledger())
            .finish()
    }
}

fn split<T>(result: Result<Option<T>, BoxError>) -> (Option<T>, Option<BoxError>) {
    match result {
        Ok(content) => (content, None),
        Err(e) => (None, Some(e)),
    }
}
