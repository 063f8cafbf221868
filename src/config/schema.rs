//! Configuration schema definitions.
//!
//! Declarative breaker settings that can live in a config file. Operations and
//! hooks are code, so they are attached later through `BreakerConfig`.

use serde::{Deserialize, Serialize};

/// Default bound on a single target call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default time a tripped breaker stays blocked, in milliseconds.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 3000;

/// Default consecutive failures before tripping.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 2;

/// File-loadable breaker settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Breaker identifier for logging.
    pub name: String,

    /// Target call timeout in milliseconds.
    pub timeout_ms: u64,

    /// Grace period before probing resumes, in milliseconds.
    pub grace_period_ms: u64,

    /// Consecutive failures that trip the breaker.
    pub failure_threshold: u32,

    /// Abort the target task when it times out instead of letting it finish.
    pub cancel_on_timeout: bool,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cancel_on_timeout: false,
        }
    }
}
