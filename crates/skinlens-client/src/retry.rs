//! Retry policy with exponential backoff

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{ClientError, Result};

/// Bounded retry with exponential backoff
///
/// Before attempt `n` (n >= 2) the policy waits `base_delay * 2^(n-1)`; with
/// the default one-second base that is 2s before the second attempt and 4s
/// before the third. Every failure is retried until `max_attempts` is spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

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
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Wait before the given 1-based attempt
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `operation` until it succeeds or attempts run out
    ///
    /// `operation` receives the 1-based attempt number.
    ///
    /// # Errors
    /// - `ClientError::RetriesExhausted` wrapping the last failure
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    warn!("Attempt {}/{} failed, giving up: {}", attempt, max_attempts, e);
                    return Err(ClientError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_before(attempt + 1);
                    warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                    debug!("Retrying after {}ms", delay.as_millis());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
