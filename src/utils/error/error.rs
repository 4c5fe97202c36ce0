//! Error handling for the TM1 client
//!
//! This module defines all error types used throughout the crate.

#![allow(missing_docs)]

use std::time::Duration;
use thiserror::Error;

/// Result type alias for the TM1 client
pub type Result<T> = std::result::Result<T, Tm1Error>;

/// Main error type for the TM1 client
#[derive(Error, Debug)]
pub enum Tm1Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-2xx status
    #[error("Remote call failed with status {status}: {message}")]
    RemoteCall { status: u16, message: String },

    /// Invalid request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A write chunk exhausted its retries or was cancelled on first failure
    #[error("Bulk write to '{target}' failed after {attempts} attempt(s): {source}")]
    BulkWriteFailure {
        target: String,
        attempts: u32,
        #[source]
        source: Box<Tm1Error>,
    },

    /// Batch item kind is not one of write, read, update or delete
    #[error("Unknown operation kind: {0}")]
    UnknownOperationKind(String),

    /// No transaction is registered under this id
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// The transaction is not pending
    #[error("Transaction {id} is {status}, expected pending")]
    TransactionInvalidState { id: String, status: String },

    /// Commit ran every operation but some of them failed
    #[error("Transaction {id} rolled back: {failed} of {total} operation(s) failed")]
    TransactionFailed {
        id: String,
        failed: usize,
        total: usize,
    },

    /// The async start call returned no execution handle
    #[error("Async execution failed to start: {0}")]
    StartFailure(String),

    /// The remote execution reported failure
    #[error("Async execution failed: {0}")]
    ExecutionFailure(String),

    /// Polling did not reach a terminal state in time
    #[error("Async execution did not finish within {0:?}")]
    TimeoutExceeded(Duration),
}

/// Helper functions for creating specific errors
impl Tm1Error {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote<S: Into<String>>(status: u16, message: S) -> Self {
        Self::RemoteCall {
            status,
            message: message.into(),
        }
    }

    /// HTTP-like status code carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Tm1Error::RemoteCall { status, .. } => Some(*status),
            Tm1Error::HttpClient(e) => e.status().map(|s| s.as_u16()),
            Tm1Error::BulkWriteFailure { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Tm1Error::RemoteCall { status, .. } => {
                matches!(status, 408 | 429 | 500..=599)
            }
            Tm1Error::HttpClient(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Whether the error means the addressed object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Tm1Error::RemoteCall { status: 404, .. } | Tm1Error::TransactionNotFound(_)
        )
    }
}
