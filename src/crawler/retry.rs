//! Retry policy for transient fetch failures
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Success | Return the value |
//! | `Transient` (connect error, dropped connection, timeout) | Sleep `base * 2^attempt`, retry |
//! | `Fatal` (anything else) | Give up immediately |
//! | Attempts exhausted | Give up |
//!
//! Giving up yields `None` rather than an error: the caller records the
//! page with the affected fields absent.

use crate::config::RetryConfig;
use crate::FetchError;
use std::future::Future;
use std::time::Duration;

/// Attempt count and exponential backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.base_delay_ms))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the zero-based `attempt` failed
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Runs `operation` until it succeeds, fails fatally, or runs out of attempts
    ///
    /// Every failure is logged with the URL, the attempt number and the cause.
    pub async fn run<T, F, Fut>(&self, url: &str, mut operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        for attempt in 0..self.max_attempts {
            let error = match operation().await {
                Ok(value) => return Some(value),
                Err(error) => error,
            };

            if !error.is_transient() {
                tracing::warn!(
                    "Attempt {} for {} failed permanently: {}",
                    attempt + 1,
                    url,
                    error.message
                );
                return None;
            }

            tracing::warn!(
                "Attempt {}/{} for {} failed: {}",
                attempt + 1,
                self.max_attempts,
                url,
                error.message
            );

            if attempt + 1 < self.max_attempts {
                tokio::time::sleep(self.backoff(attempt)).await;
            }
        }

        tracing::warn!(
            "Giving up on {} after {} attempts",
            url,
            self.max_attempts
        );
        None
    }
}
