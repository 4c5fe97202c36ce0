//! Error handling utilities
//!
//! This module provides the crate error type and retry helpers.

pub mod error;
pub mod recovery;

pub use error::*;
pub use recovery::{RetryConfig, RetryFailure, RetryPolicy};
