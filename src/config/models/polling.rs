//! Async execution polling configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults for polling asynchronous process executions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Give up after this many seconds
    #[serde(default = "default_poll_timeout")]
    pub timeout: u64,
    /// Seconds between status checks
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout: default_poll_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

impl PollingConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}
