//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BreakerSettings (validated, immutable)
//!     → breaker.rs (BreakerConfig::from_settings, attach target/fallback/hooks)
//!     → CircuitBreaker::new (defaults for anything still unset)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the breaker is built; only hooks can be swapped
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod breaker;
pub mod loader;
pub mod schema;
pub mod validation;

pub use breaker::BreakerConfig;
pub use loader::{load_settings, parse_settings, ConfigError};
pub use schema::BreakerSettings;
pub use validation::{validate_settings, ValidationError};
