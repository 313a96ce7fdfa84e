//! Operation executor
//!
//! Runs a single business operation on behalf of a controller and guarantees
//! an envelope comes back: the live result, placeholder data, or an error.
//! Errors and panics raised by the operation are logged here, once, and never
//! propagate to the caller.

use std::any::Any;
use std::borrow::Cow;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::envelope::ResultEnvelope;
use crate::error::OperationError;
use crate::fallback::{evaluate, FallbackPolicy, FallbackSwitch, OperationOutcome};

/// Run `operation` and fold its outcome through `policy`.
///
/// The only await point is the operation itself; no timeout or retry is
/// applied here.
pub async fn execute<T, F, Fut>(operation: F, policy: &FallbackPolicy<T>) -> ResultEnvelope<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<ResultEnvelope<T>, OperationError>>,
{
    let invocation = AssertUnwindSafe(async move { operation().await }).catch_unwind();

    let outcome = match invocation.await {
        Ok(Ok(envelope)) => OperationOutcome::returned(envelope),
        Ok(Err(err)) => {
            log_failure(policy.action(), &err);
            OperationOutcome::thrown(err)
        }
        Err(payload) => {
            let err = OperationError::Panicked(panic_message(payload.as_ref()));
            log_failure(policy.action(), &err);
            OperationOutcome::thrown(err)
        }
    };

    evaluate(outcome, policy)
}

fn log_failure(action: &str, err: &OperationError) {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        causes.push(inner.to_string());
        source = inner.source();
    }

    tracing::error!(
        action = %action,
        code = %err.code(),
        error = %err,
        causes = ?causes,
        "Operation failed"
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Handle held in application state; samples the test-data switch for each
/// request.
#[derive(Clone)]
pub struct Executor {
    switch: Arc<dyn FallbackSwitch>,
}

impl Executor {
    pub fn new(switch: Arc<dyn FallbackSwitch>) -> Self {
        Self { switch }
    }

    /// Whether test data substitution is currently switched on
    pub fn test_data_enabled(&self) -> bool {
        self.switch.enabled()
    }

    /// Fresh policy for one request, reading the switch now
    pub fn policy<T>(&self, action: impl Into<Cow<'static, str>>) -> FallbackPolicy<T> {
        FallbackPolicy::new(self.switch.enabled(), action)
    }

    pub async fn run<T, F, Fut>(&self, policy: FallbackPolicy<T>, operation: F) -> ResultEnvelope<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResultEnvelope<T>, OperationError>>,
    {
        execute(operation, &policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{Placeholder, ToggleSwitch};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn calls_panic() -> bool {
        true
    }

    fn policy(enabled: bool) -> FallbackPolicy<Vec<String>> {
        FallbackPolicy::new(enabled, "listing quests")
            .with_placeholder(Placeholder::new("Quests retrieved successfully", Vec::new))
    }

    #[tokio::test]
    async fn test_execute_returns_live_result() {
        for enabled in [false, true] {
            let envelope = execute(
                || async { Ok(ResultEnvelope::success(vec!["q1".to_string()], "1 quest.")) },
                &policy(enabled),
            )
            .await;

            assert!(!envelope.is_error);
            assert_eq!(envelope.result, Some(vec!["q1".to_string()]));
            assert_eq!(envelope.message, "1 quest.");
        }
    }

    #[tokio::test]
    async fn test_execute_error_without_fallback() {
        let envelope = execute(
            || async { Err(OperationError::ConnectionRefused("127.0.0.1:5432".to_string())) },
            &policy(false),
        )
        .await;

        assert!(envelope.is_error);
        assert_eq!(envelope.message, "Error listing quests: Connection refused");
        assert_eq!(
            envelope.error_detail.map(|d| d.code),
            Some("CONNECTION_REFUSED".to_string())
        );
    }

    #[tokio::test]
    async fn test_execute_error_with_fallback() {
        let envelope = execute(
            || async { Err(OperationError::Timeout("30s".to_string())) },
            &policy(true),
        )
        .await;

        assert!(!envelope.is_error);
        assert_eq!(envelope.result, Some(Vec::new()));
        assert!(envelope.message.contains("using test data"));
    }

    #[tokio::test]
    async fn test_execute_captures_panic() {
        let envelope: ResultEnvelope<Vec<String>> = execute(
            || async {
                if calls_panic() {
                    panic!("provider exploded");
                }
                Ok(ResultEnvelope::empty("unreachable"))
            },
            &policy(false),
        )
        .await;

        assert!(envelope.is_error);
        assert!(envelope.message.contains("provider exploded"));
        assert_eq!(
            envelope.error_detail.map(|d| d.code),
            Some("PANICKED".to_string())
        );
    }

    #[tokio::test]
    async fn test_execute_invokes_operation_once() {
        let calls = AtomicUsize::new(0);
        let _ = execute(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OperationError::Unavailable("ipfs".to_string()))
            },
            &policy(true),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_executor_samples_switch_per_policy() {
        let switch = Arc::new(ToggleSwitch::new(false));
        let executor = Executor::new(switch.clone());

        let before: FallbackPolicy<u8> = executor.policy("loading settings");
        switch.set(true);
        let after: FallbackPolicy<u8> = executor.policy("loading settings");

        assert!(!before.enabled());
        assert!(after.enabled());
        assert!(executor.test_data_enabled());
    }
}
