//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BreakerSettings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate breaker settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<BreakerSettings, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse and validate breaker settings from TOML text.
pub fn parse_settings(content: &str) -> Result<BreakerSettings, ConfigError> {
    let settings: BreakerSettings = toml::from_str(content)?;
    validate_settings(&settings).map_err(ConfigError::Validation)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("circuit-guard-{}.toml", std::process::id()));
        fs::write(
            &path,
            "name = \"quotes\"\ntimeout_ms = 50\ngrace_period_ms = 200\nfailure_threshold = 3\n",
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.name, "quotes");
        assert_eq!(settings.timeout_ms, 50);
        assert_eq!(settings.grace_period_ms, 200);
        assert_eq!(settings.failure_threshold, 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_settings(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = parse_settings("timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_are_collected() {
        let err = parse_settings("timeout_ms = 0\nfailure_threshold = 0").unwrap_err();
        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Validation failed: timeout_ms"));
    }
}
