//! Bulk operation configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults for chunked bulk writes and reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConfig {
    /// Maximum cells per write request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Retries per chunk after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff delay in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Abort a chunk on its first failure
    #[serde(default)]
    pub cancel_at_failure: bool,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            cancel_at_failure: false,
        }
    }
}

impl BulkConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
