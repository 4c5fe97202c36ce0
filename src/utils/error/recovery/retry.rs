//! Retry mechanism with linear backoff

use super::types::{RetryConfig, RetryFailure};
use std::time::Duration;
use tracing::{debug, error};

/// Retry mechanism with linear backoff
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Delay slept after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.config.retry_delay.saturating_mul(attempt)
    }

    /// Execute a function with retry logic
    ///
    /// The closure is invoked until it succeeds, `cancel_at_failure` is set,
    /// or `max_retries` retries have been spent. Attempts run sequentially.
    pub async fn call<F, Fut, R, E>(&self, mut f: F) -> std::result::Result<R, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.config.cancel_at_failure || attempt > self.config.max_retries {
                        error!("Giving up after {} attempt(s): {}", attempt, err);
                        return Err(RetryFailure {
                            attempts: attempt,
                            last_error: err,
                        });
                    }

                    let delay = self.delay_for(attempt);
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, err, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
