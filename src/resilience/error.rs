//! Breaker error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Error type returned by target and fallback operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a breaker call or construction can report.
#[derive(Debug, Error)]
pub enum BreakerError {
    /// Invalid breaker configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Target did not answer within the bound.
    #[error("operation timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    /// Target returned an error.
    #[error("operation error: {0}")]
    Operation(#[source] BoxError),

    /// Target succeeded without usable content.
    #[error("operation returned an invalid empty response")]
    EmptyResponse,

    /// Target not called because the breaker is blocked.
    #[error("{}", rejected_message(.fallback_error))]
    RejectedWhileBlocked { fallback_error: Option<BoxError> },

    /// Target failed and the fallback answered instead.
    #[error("served by fallback after failure: {cause}")]
    FellBack {
        #[source]
        cause: Box<BreakerError>,
    },

    /// Target failed and the fallback failed too.
    #[error("fallback failed ({fallback_error}) after failure: {cause}")]
    FallbackFailed {
        #[source]
        cause: Box<BreakerError>,
        fallback_error: BoxError,
    },
}

fn rejected_message(fallback_error: &Option<BoxError>) -> String {
    match fallback_error {
        Some(e) => format!("rejected while blocked; fallback failed too: {}", e),
        None => "rejected while blocked".to_string(),
    }
}

impl BreakerError {
    /// Innermost breaker failure, unwrapping fallback compositions.
    pub fn cause(&self) -> &BreakerError {
        match self {
            BreakerError::FellBack { cause } | BreakerError::FallbackFailed { cause, .. } => {
                cause.cause()
            }
            other => other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause(), BreakerError::Timeout { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, BreakerError::RejectedWhileBlocked { .. })
    }

    /// Attach a fallback outcome to an invocation failure.
    pub(crate) fn with_fallback(self, fallback_error: Option<BoxError>) -> BreakerError {
        let cause = Box::new(self);
        match fallback_error {
            Some(fallback_error) => BreakerError::FallbackFailed { cause, fallback_error },
            None => BreakerError::FellBack { cause },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_in_millis() {
        let err = BreakerError::Timeout { timeout: Duration::from_millis(50) };
        assert_eq!(err.to_string(), "operation timed out after 50ms");
    }

    #[test]
    fn test_fallback_composition_preserves_cause() {
        let err = BreakerError::Timeout { timeout: Duration::from_millis(50) }.with_fallback(None);
        assert!(matches!(err, BreakerError::FellBack { .. }));
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out after 50ms"));

        let err = BreakerError::EmptyResponse.with_fallback(Some("cache miss".into()));
        assert!(matches!(err.cause(), BreakerError::EmptyResponse));
        let msg = err.to_string();
        assert!(msg.contains("cache miss"));
        assert!(msg.contains("empty response"));
    }

    #[test]
    fn test_rejection_messages() {
        let plain = BreakerError::RejectedWhileBlocked { fallback_error: None };
        assert_eq!(plain.to_string(), "rejected while blocked");
        assert!(plain.is_rejected());

        let wrapped = BreakerError::RejectedWhileBlocked { fallback_error: Some("stale".into()) };
        assert!(wrapped.to_string().ends_with("fallback failed too: stale"));
    }
}
