//! Configuration data models
//!
//! This module defines all configuration structures used by the client.

#![allow(missing_docs)]

pub mod bulk;
pub mod connection;
pub mod logging;
pub mod polling;

pub use bulk::*;
pub use connection::*;
pub use logging::*;
pub use polling::*;

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    60
}

/// Default connect timeout in seconds
pub fn default_connect_timeout() -> u64 {
    10
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

/// Default number of cells per write request
pub fn default_chunk_size() -> usize {
    1000
}

/// Default base retry delay in milliseconds
pub fn default_retry_delay_ms() -> u64 {
    1000
}

/// Default poll timeout in seconds
pub fn default_poll_timeout() -> u64 {
    300
}

/// Default poll interval in seconds
pub fn default_poll_interval() -> u64 {
    5
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!("tm1-rs/{}", env!("CARGO_PKG_VERSION"))
}

pub fn default_true() -> bool {
    true
}
