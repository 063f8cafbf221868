//! Failure ledger.
//!
//! # Responsibilities
//! - Count consecutive failures since the last success
//! - Remember when the last failure happened
//! - Keep a readable log of what went wrong
//!
//! # Design Decisions
//! - The count saturates at the threshold; the timestamp and log keep moving
//! - Reset clears everything, including the timestamp

use std::time::Duration;

use tokio::time::Instant;

use crate::resilience::state::{derive_state, ProtectiveState};

/// Log entry used when a failure carries no description of its own.
pub const FALLBACK_ONLY_DESCRIPTION: &str = "relying on fallback";

/// Consecutive failures recorded since the last success.
#[derive(Debug, Default, Clone)]
pub struct FailureLedger {
    failure_count: u32,
    last_failure: Option<Instant>,
    failures: Vec<String>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure at `now`.
    ///
    /// The count grows by one until it reaches `threshold`.
    pub fn record_failure(&mut self, description: Option<String>, threshold: u32, now: Instant) {
        if self.failure_count < threshold {
            self.failure_count += 1;
        }
        self.last_failure = Some(now);
        self.failures
            .push(description.unwrap_or_else(|| FALLBACK_ONLY_DESCRIPTION.to_string()));
    }

    /// Forget every recorded failure.
    pub fn reset(&mut self) {
        self.failure_count = 0;
        self.last_failure = None;
        self.failures.clear();
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn last_failure(&self) -> Option<Instant> {
        self.last_failure
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Derive the protective state from the current counters.
    pub fn state(&self, threshold: u32, grace_period: Duration, now: Instant) -> ProtectiveState {
        derive_state(self.failure_count, self.last_failure, threshold, grace_period, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure_appends_and_counts() {
        let mut ledger = FailureLedger::new();
        let now = Instant::now();

        ledger.record_failure(Some("boom".into()), 3, now);
        assert_eq!(ledger.failure_count(), 1);
        assert_eq!(ledger.last_failure(), Some(now));
        assert_eq!(ledger.failures(), ["boom".to_string()]);

        ledger.record_failure(None, 3, now);
        assert_eq!(ledger.failure_count(), 2);
        assert_eq!(ledger.failures()[1], FALLBACK_ONLY_DESCRIPTION);
    }

    #[test]
    fn test_count_saturates_at_threshold() {
        let mut ledger = FailureLedger::new();
        let first = Instant::now();
        ledger.record_failure(Some("a".into()), 2, first);
        ledger.record_failure(Some("b".into()), 2, first);

        let later = first + Duration::from_secs(1);
        ledger.record_failure(Some("c".into()), 2, later);

        assert_eq!(ledger.failure_count(), 2);
        assert_eq!(ledger.last_failure(), Some(later));
        assert_eq!(ledger.failures().len(), 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = FailureLedger::new();
        ledger.record_failure(Some("a".into()), 2, Instant::now());
        ledger.reset();

        assert_eq!(ledger.failure_count(), 0);
        assert!(ledger.last_failure().is_none());
        assert!(ledger.failures().is_empty());
    }

    #[test]
    fn test_state_follows_counters() {
        let mut ledger = FailureLedger::new();
        let grace = Duration::from_millis(100);
        let now = Instant::now();
        assert_eq!(ledger.state(1, grace, now), ProtectiveState::Normal);

        ledger.record_failure(None, 1, now);
        assert_eq!(ledger.state(1, grace, now), ProtectiveState::Blocked);
        assert_eq!(
            ledger.state(1, grace, now + Duration::from_millis(101)),
            ProtectiveState::Probing
        );
    }
}
