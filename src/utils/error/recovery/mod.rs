//! Error recovery utilities
//!
//! Retry with linear backoff, used by the bulk write path.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::{RetryConfig, RetryFailure};
