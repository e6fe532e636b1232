use std::time::Duration;

use tokio::time::sleep;

use crate::error_classification::{
    contract_error_backoff_hint, is_retryable_contract_error, is_retryable_rpc_error,
    rpc_backoff_hint,
};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn rpc_default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

pub trait RetryableError: std::fmt::Display {
    fn is_retryable(&self) -> bool;
    fn backoff_hint(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for alloy::transports::RpcError<alloy::transports::TransportErrorKind> {
    fn is_retryable(&self) -> bool {
        is_retryable_rpc_error(self)
    }

    fn backoff_hint(&self) -> Option<Duration> {
        rpc_backoff_hint(self)
    }
}

impl RetryableError for alloy::contract::Error {
    fn is_retryable(&self) -> bool {
        is_retryable_contract_error(self)
    }

    fn backoff_hint(&self) -> Option<Duration> {
        contract_error_backoff_hint(self)
    }
}

pub fn backoff_delay(policy: &RetryPolicy, attempt: usize, hint: Option<Duration>) -> Duration {
    if let Some(hint) = hint {
        return hint.min(policy.max_delay);
    }

    let base_ms = policy.base_delay.as_millis() as u64;
    let exponent = (attempt.saturating_sub(1)).min(6) as u32;
    let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(factor);
    let max_ms = policy.max_delay.as_millis() as u64;

    Duration::from_millis(delay_ms.min(max_ms))
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of attempts.
pub async fn execute_with_retry<T, E, F, O>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: RetryableError,
    F: FnMut() -> O,
    O: std::future::IntoFuture<Output = Result<T, E>>,
{
    let mut attempt = 1;

    loop {
        let result = operation().into_future().await;
        match result {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retryable = err.is_retryable();
                if attempt >= policy.max_attempts || !retryable {
                    return Err(err);
                }

                let delay = backoff_delay(policy, attempt, err.backoff_hint());
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "{} failed; retrying",
                    label
                );
                vrf_observability::record_ledger_retry(label);
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fmt,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[derive(Debug)]
    struct FakeError {
        retryable: bool,
    }

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake error (retryable: {})", self.retryable)
        }
    }

    impl RetryableError for FakeError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::rpc_default();

        assert_eq!(backoff_delay(&policy, 1, None), Duration::from_millis(200));
        assert_eq!(backoff_delay(&policy, 2, None), Duration::from_millis(400));
        assert_eq!(backoff_delay(&policy, 3, None), Duration::from_millis(800));
        assert_eq!(backoff_delay(&policy, 5, None), Duration::from_secs(2));
        assert_eq!(backoff_delay(&policy, 60, None), Duration::from_secs(2));
    }

    #[test]
    fn backoff_hint_wins_but_is_capped() {
        let policy = RetryPolicy::rpc_default();

        assert_eq!(
            backoff_delay(&policy, 1, Some(Duration::from_secs(1))),
            Duration::from_secs(1)
        );
        assert_eq!(
            backoff_delay(&policy, 1, Some(Duration::from_secs(30))),
            Duration::from_secs(2)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let result: Result<u64, FakeError> =
            execute_with_retry(&RetryPolicy::rpc_default(), "test_call", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FakeError { retryable: true })
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.expect("third attempt succeeds"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let result: Result<(), FakeError> =
            execute_with_retry(&RetryPolicy::rpc_default(), "test_call", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError { retryable: true })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let result: Result<(), FakeError> =
            execute_with_retry(&RetryPolicy::rpc_default(), "test_call", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError { retryable: false })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
