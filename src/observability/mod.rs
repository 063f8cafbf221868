//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers produce:
//!     → structured tracing events (construction, failures, trips, resets)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout, filtered by level)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's job
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};
