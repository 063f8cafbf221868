//! Protective state derivation.
//!
//! # States
//! - Normal: failures below threshold, requests pass through
//! - Blocked: threshold reached, grace period still running, requests short-circuit
//! - Probing: threshold reached, grace period elapsed, one trial call goes through
//!
//! # State Transitions
//! ```text
//! Normal  → Blocked: failure_count reaches threshold
//! Blocked → Probing: grace period elapses since last failure
//! Probing → Normal:  trial call succeeds (ledger reset)
//! Probing → Blocked: trial call fails (timestamp refreshed)
//! ```
//!
//! # Design Decisions
//! - State is never stored; it is recomputed from the ledger on every query
//! - Elapsed time and grace period are compared in the same unit, unscaled

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Protective state of a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectiveState {
    /// Calls pass through to the target.
    Normal,
    /// One trial call is let through.
    Probing,
    /// Calls are diverted to the fallback or rejected.
    Blocked,
}

impl fmt::Display for ProtectiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtectiveState::Normal => "normal",
            ProtectiveState::Probing => "probing",
            ProtectiveState::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

/// Map failure counters and elapsed time to a protective state.
///
/// Pure: the result depends only on the arguments.
pub fn derive_state(
    failure_count: u32,
    last_failure: Option<Instant>,
    threshold: u32,
    grace_period: Duration,
    now: Instant,
) -> ProtectiveState {
    if failure_count < threshold {
        return ProtectiveState::Normal;
    }

    match last_failure {
        Some(at) if now.saturating_duration_since(at) <= grace_period => ProtectiveState::Blocked,
        // Counters at threshold without a timestamp cannot be held blocked.
        _ => ProtectiveState::Probing,
    }
}
