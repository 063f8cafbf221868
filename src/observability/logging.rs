//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config or environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Compact format by default, pretty format for interactive runs

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn directive(&self) -> String {
        format!("circuit_guard={}", self.level)
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_uses_level() {
        let config = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Pretty,
        };
        assert_eq!(config.directive(), "circuit_guard=debug");
    }

    #[test]
    fn test_format_parses_lowercase() {
        let config: LoggingConfig = toml::from_str("format = \"pretty\"").unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
    }
}
