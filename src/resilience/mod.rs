//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! CircuitBreaker::call():
//!     → state.rs (derive Normal / Probing / Blocked from the ledger)
//!     → timeouts.rs (bounded invocation of the target)
//!     → ledger.rs (reset on success, record on failure)
//!     → notifier.rs (hooks and observers on state change)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every target call has a deadline
//! - No automatic retries; the grace period and the caller drive recovery
//! - Errors are never swallowed; every degraded call reports why

pub mod circuit_breaker;
pub mod error;
pub mod ledger;
pub mod notifier;
pub mod state;
pub mod timeouts;

pub use circuit_breaker::{BreakerSnapshot, CallOutcome, CircuitBreaker};
pub use error::{BoxError, BreakerError};
pub use ledger::FailureLedger;
pub use notifier::{BreakerObserver, Hook, Hooks, Transition};
pub use state::{derive_state, ProtectiveState};
pub use timeouts::{invoke_with_timeout, Operation, OperationFuture, SharedOperation};
