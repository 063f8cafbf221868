//! Timeout enforcement.
//!
//! # Responsibilities
//! - Run the target operation as an independent task
//! - Race it against the configured deadline
//! - Classify the outcome (content, operation error, empty response, timeout)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - A timed-out task is detached unless `cancel_on_timeout` is set; the
//!   late result is discarded either way

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::resilience::error::{BoxError, BreakerError};

/// Future returned by an [`Operation`].
pub type OperationFuture<T> = Pin<Box<dyn Future<Output = Result<Option<T>, BoxError>> + Send>>;

/// A zero-argument remote call returning content or an error.
///
/// `Ok(None)` means the call succeeded without usable content.
pub trait Operation<T>: Send + Sync {
    fn invoke(&self) -> OperationFuture<T>;
}

impl<T, F, Fut> Operation<T> for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<T>, BoxError>> + Send + 'static,
{
    fn invoke(&self) -> OperationFuture<T> {
        Box::pin(self())
    }
}

/// Shared handle to an operation.
pub type SharedOperation<T> = Arc<dyn Operation<T>>;

/// Call `operation` with a deadline of `timeout`.
pub async fn invoke_with_timeout<T>(
    operation: &SharedOperation<T>,
    timeout: Duration,
    cancel_on_timeout: bool,
) -> Result<T, BreakerError>
where
    T: Send + 'static,
{
    let mut handle = tokio::spawn(operation.invoke());

    match time::timeout(timeout, &mut handle).await {
        Ok(Ok(Ok(Some(content)))) => Ok(content),
        Ok(Ok(Ok(None))) => Err(BreakerError::EmptyResponse),
        Ok(Ok(Err(e))) => Err(BreakerError::Operation(e)),
        Ok(Err(join_err)) => Err(BreakerError::Operation(
            format!("operation task failed: {}", join_err).into(),
        )),
        Err(_) => {
            if cancel_on_timeout {
                handle.abort();
            } else {
                tracing::debug!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Timed-out operation left running in background"
                );
            }
            Err(BreakerError::Timeout { timeout })
        }
    }
}
