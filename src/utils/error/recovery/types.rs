//! Types and configurations for retry handling

use std::fmt;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `n * retry_delay`
    pub retry_delay: Duration,
    /// Give up on the first failure
    pub cancel_at_failure: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            cancel_at_failure: false,
        }
    }
}

/// Returned when a retried unit of work gives up
#[derive(Debug)]
pub struct RetryFailure<E> {
    /// Number of times the unit of work was invoked
    pub attempts: u32,
    /// Error from the last attempt
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempt(s): {}",
            self.attempts, self.last_error
        )
    }
}
