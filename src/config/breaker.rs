//! Programmatic breaker configuration.
//!
//! Unset fields stay `None` here; `CircuitBreaker::new` fills them with the
//! documented defaults.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::BreakerSettings;
use crate::resilience::error::BoxError;
use crate::resilience::notifier::{Hook, Hooks};
use crate::resilience::timeouts::SharedOperation;

/// Everything needed to build a breaker.
pub struct BreakerConfig<T> {
    /// Breaker identifier for logging.
    pub name: Option<String>,
    /// Operation being protected. Mandatory.
    pub target: Option<SharedOperation<T>>,
    /// Substitute used when the target is unavailable.
    pub fallback: Option<SharedOperation<T>>,
    pub timeout: Option<Duration>,
    pub grace_period: Option<Duration>,
    /// Zero is treated as unset.
    pub failure_threshold: Option<u32>,
    pub cancel_on_timeout: bool,
    pub hooks: Hooks,
}

impl<T> Default for BreakerConfig<T> {
    fn default() -> Self {
        Self {
            name: None,
            target: None,
            fallback: None,
            timeout: None,
            grace_period: None,
            failure_threshold: None,
            cancel_on_timeout: false,
            hooks: Hooks::default(),
        }
    }
}

impl<T: Send + 'static> BreakerConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a configuration from file settings.
    pub fn from_settings(settings: &BreakerSettings) -> Self {
        Self {
            name: Some(settings.name.clone()),
            timeout: Some(Duration::from_millis(settings.timeout_ms)),
            grace_period: Some(Duration::from_millis(settings.grace_period_ms)),
            failure_threshold: Some(settings.failure_threshold),
            cancel_on_timeout: settings.cancel_on_timeout,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target<F, Fut>(mut self, target: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, BoxError>> + Send + 'static,
    {
        self.target = Some(Arc::new(target) as SharedOperation<T>);
        self
    }

    pub fn fallback<F, Fut>(mut self, fallback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, BoxError>> + Send + 'static,
    {
        self.fallback = Some(Arc::new(fallback) as SharedOperation<T>);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = Some(grace_period);
        self
    }

    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = Some(threshold);
        self
    }

    pub fn cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.cancel_on_timeout = cancel;
        self
    }

    pub fn on_trip(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.on_trip = Some(Arc::new(hook) as Hook);
        self
    }

    pub fn on_reset(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.on_reset = Some(Arc::new(hook) as Hook);
        self
    }

    pub fn on_state_change(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.on_state_change = Some(Arc::new(hook) as Hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_converts_millis() {
        let settings = BreakerSettings {
            name: "inventory".into(),
            timeout_ms: 50,
            grace_period_ms: 200,
            failure_threshold: 4,
            cancel_on_timeout: true,
        };
        let config = BreakerConfig::<String>::from_settings(&settings);

        assert_eq!(config.name.as_deref(), Some("inventory"));
        assert_eq!(config.timeout, Some(Duration::from_millis(50)));
        assert_eq!(config.grace_period, Some(Duration::from_millis(200)));
        assert_eq!(config.failure_threshold, Some(4));
        assert!(config.cancel_on_timeout);
        assert!(config.target.is_none());
    }

    #[test]
    fn test_builder_sets_operations_and_hooks() {
        let config = BreakerConfig::<u32>::new()
            .target(|| async { Ok(Some(1)) })
            .fallback(|| async { Ok(Some(0)) })
            .on_trip(|| {});

        assert!(config.target.is_some());
        assert!(config.fallback.is_some());
        assert!(config.hooks.on_trip.is_some());
        assert!(config.hooks.on_reset.is_none());
    }
}
