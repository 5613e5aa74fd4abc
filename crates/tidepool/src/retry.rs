//! Bounded exponential-backoff retries.

use std::future::Future;
use std::time::Duration;

use crate::error::{QueryError, Result};

/// Retry policy for fetches: bounded exponential backoff.
///
/// Attempt 0 runs immediately. A failed attempt `n` (zero-based) sleeps
/// `base_delay * 2^n` before the next one; once `max_attempts` retries are
/// exhausted, the last error is returned. The defaults give delays of
/// 1s, 2s, 4s.
///
/// The policy is status-agnostic: every non-cancellation error counts against
/// the same retry budget, HTTP 4xx included. Cancellation propagates
/// immediately without consuming a retry slot or sleeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Backoff to sleep after the given zero-based attempt fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // Clamp the shift so a large attempt count saturates instead of
        // overflowing the multiplier.
        self.base_delay.saturating_mul(1u32 << attempt.min(20))
    }

    /// Run `op`, retrying failures with exponential backoff.
    pub async fn run<R, F, Fut>(&self, mut op: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                // A cancelled attempt is not a failure to recover from.
                Err(QueryError::Cancelled) => return Err(QueryError::Cancelled),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        tracing::warn!(
                            target: "tidepool::retry",
                            attempts = attempt + 1,
                            error = %err,
                            "retries exhausted"
                        );
                        return Err(err);
                    }

                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        target: "tidepool::retry",
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
