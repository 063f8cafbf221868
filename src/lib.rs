//! Circuit breaker guarding calls to unreliable remote operations.
//!
//! A breaker tracks consecutive failures of a target operation and derives a
//! protective state from them: Normal (calls pass), Blocked (calls divert to a
//! fallback or fail fast) and Probing (one trial call after the grace period).
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use circuit_guard::{BreakerConfig, CircuitBreaker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let breaker = CircuitBreaker::new(
//!     BreakerConfig::new()
//!         .name("quotes")
//!         .target(|| async { Ok(Some("fresh quote".to_string())) })
//!         .fallback(|| async { Ok(Some("cached quote".to_string())) })
//!         .timeout(Duration::from_millis(250))
//!         .failure_threshold(3),
//! )?;
//!
//! let outcome = breaker.call().await;
//! println!("{:?} via_fallback={}", outcome.content, outcome.via_fallback);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::{BreakerConfig, BreakerSettings};
pub use resilience::{
    BreakerError, BreakerObserver, BreakerSnapshot, CallOutcome, CircuitBreaker, ProtectiveState,
    Transition,
};
