//! Shared fixtures for breaker integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use circuit_guard::resilience::BoxError;
use circuit_guard::BreakerConfig;

pub const FALLBACK_CONTENT: &str = "cached";
pub const TARGET_CONTENT: &str = "fresh";

/// threshold=2, timeout=50ms, grace=200ms.
pub fn scenario_config() -> BreakerConfig<String> {
    BreakerConfig::new()
        .name("scenario")
        .timeout(Duration::from_millis(50))
        .grace_period(Duration::from_millis(200))
        .failure_threshold(2)
}

/// Target that never answers within any reasonable timeout.
pub fn slow_target(config: BreakerConfig<String>) -> BreakerConfig<String> {
    config.target(|| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok::<_, BoxError>(Some("too late".to_string()))
    })
}

pub fn cached_fallback(config: BreakerConfig<String>) -> BreakerConfig<String> {
    config.fallback(|| async { Ok::<_, BoxError>(Some(FALLBACK_CONTENT.to_string())) })
}

pub fn failing_fallback(config: BreakerConfig<String>) -> BreakerConfig<String> {
    config.fallback(|| async { Err::<Option<String>, BoxError>("cache unavailable".into()) })
}

/// Target whose health can be flipped from the test, counting invocations.
#[derive(Clone, Default)]
pub struct SwitchableTarget {
    healthy: Arc<AtomicBool>,
    calls: Arc<AtomicU32>,
}

impl SwitchableTarget {
    pub fn attach(&self, config: BreakerConfig<String>) -> BreakerConfig<String> {
        let healthy = self.healthy.clone();
        let calls = self.calls.clone();
        config.target(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let healthy = healthy.load(Ordering::SeqCst);
            async move {
                if healthy {
                    Ok(Some(TARGET_CONTENT.to_string()))
                } else {
                    Err::<Option<String>, BoxError>("connection refused".into())
                }
            }
        })
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Records hook invocations in order.
#[derive(Clone, Default)]
pub struct HookLog(Arc<Mutex<Vec<&'static str>>>);

impl HookLog {
    pub fn attach(&self, config: BreakerConfig<String>) -> BreakerConfig<String> {
        let (changed, trip, reset) = (self.clone(), self.clone(), self.clone());
        config
            .on_state_change(move || changed.push("changed"))
            .on_trip(move || trip.push("trip"))
            .on_reset(move || reset.push("reset"))
    }

    pub fn push(&self, label: &'static str) {
        self.0.lock().unwrap().push(label);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}
