//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, threshold > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BreakerSettings → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::BreakerSettings;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_settings(settings: &BreakerSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.name.trim().is_empty() {
        errors.push(ValidationError {
            field: "name",
            message: "must not be empty".to_string(),
        });
    }
    if settings.timeout_ms == 0 {
        errors.push(ValidationError {
            field: "timeout_ms",
            message: "must be greater than zero".to_string(),
        });
    }
    if settings.grace_period_ms == 0 {
        errors.push(ValidationError {
            field: "grace_period_ms",
            message: "must be greater than zero".to_string(),
        });
    }
    if settings.failure_threshold == 0 {
        errors.push(ValidationError {
            field: "failure_threshold",
            message: "must be a positive integer".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
