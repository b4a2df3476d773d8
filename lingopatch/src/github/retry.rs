//! Retry with capped exponential backoff, for eventually consistent calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Delay after the first failure; doubled after each further one.
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 10 attempts waiting 10ms, 20ms, 40ms, ... between them.
    fn default() -> Self {
        RetryPolicy {
            attempts: 10,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            attempts,
            base_delay,
            ..Self::default()
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay after the failed attempt number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Quota and authentication failures will not go away by waiting.
fn is_retryable(error: &Error) -> bool {
    !matches!(
        error.kind(),
        ErrorKind::QuotaExceeded | ErrorKind::AuthenticationRequired
    )
}

/// Run `op` until it succeeds or `policy.attempts` are used up.
///
/// `op` receives the 0-based attempt number. Exhaustion yields
/// [`Error::Timeout`] naming `operation`; non-retryable errors are returned
/// immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for attempt in 0..policy.attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if !is_retryable(&error) => return Err(error),
            Err(error) => {
                if attempt + 1 == policy.attempts {
                    tracing::warn!(operation, attempt, error = %error, "giving up");
                    break;
                }
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    Err(Error::timeout(operation, policy.attempts))
}
