//! Types for bulk cell operations

use crate::config::BulkConfig;
use crate::core::cells::{CellQuery, CellUpdate, CellValue};
use crate::utils::error::{Result, RetryConfig, Tm1Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Kinds of batch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Write,
    Read,
    Update,
    Delete,
}

impl FromStr for OperationKind {
    type Err = Tm1Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "write" => Ok(OperationKind::Write),
            "read" => Ok(OperationKind::Read),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            _ => Err(Tm1Error::UnknownOperationKind(s.to_string())),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Write => "write",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// One logical cell operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    Write {
        target: String,
        coordinates: Vec<String>,
        value: CellValue,
    },
    Read {
        target: String,
        coordinates: Vec<String>,
    },
    Update {
        target: String,
        coordinates: Vec<String>,
        value: CellValue,
        #[serde(default)]
        increment: bool,
    },
    Delete {
        target: String,
        coordinates: Vec<String>,
    },
}

impl Operation {
    pub fn write<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
        value: impl Into<CellValue>,
    ) -> Self {
        Operation::Write {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
            value: value.into(),
        }
    }

    pub fn read<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
    ) -> Self {
        Operation::Read {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn update<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
        value: impl Into<CellValue>,
        increment: bool,
    ) -> Self {
        Operation::Update {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
            value: value.into(),
            increment,
        }
    }

    pub fn delete<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
    ) -> Self {
        Operation::Delete {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Write { .. } => OperationKind::Write,
            Operation::Read { .. } => OperationKind::Read,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Delete { .. } => OperationKind::Delete,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Operation::Write { target, .. }
            | Operation::Read { target, .. }
            | Operation::Update { target, .. }
            | Operation::Delete { target, .. } => target,
        }
    }

    pub fn coordinates(&self) -> &[String] {
        match self {
            Operation::Write { coordinates, .. }
            | Operation::Read { coordinates, .. }
            | Operation::Update { coordinates, .. }
            | Operation::Delete { coordinates, .. } => coordinates,
        }
    }

    /// Parse a raw JSON item, reporting an unknown `kind` as such
    pub fn from_json(item: &Value) -> Result<Self> {
        let kind = item
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| Tm1Error::UnknownOperationKind("<missing>".to_string()))?;
        let kind: OperationKind = kind.parse()?;

        let mut normalized = item.clone();
        if let Some(obj) = normalized.as_object_mut() {
            obj.insert("kind".to_string(), Value::String(kind.to_string()));
        }
        serde_json::from_value(normalized)
            .map_err(|e| Tm1Error::parsing(format!("Invalid {} operation: {}", kind, e)))
    }
}

/// A cell to write as part of a bulk write or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWrite {
    pub target: String,
    pub coordinates: Vec<String>,
    pub value: CellValue,
    #[serde(default)]
    pub increment: bool,
}

impl CellWrite {
    pub fn new<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
        value: impl Into<CellValue>,
    ) -> Self {
        Self {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
            value: value.into(),
            increment: false,
        }
    }

    pub fn incrementing(mut self, increment: bool) -> Self {
        self.increment = increment;
        self
    }

    /// Zero out the addressed cell
    pub fn clearing(query: CellQuery) -> Self {
        Self {
            target: query.target,
            coordinates: query.coordinates,
            value: CellValue::zero(),
            increment: false,
        }
    }

    pub(crate) fn into_update(self) -> CellUpdate {
        CellUpdate {
            coordinates: self.coordinates,
            value: self.value,
            increment: self.increment,
        }
    }
}

/// Options for bulk writes, updates and deletes
#[derive(Debug, Clone, PartialEq)]
pub struct BulkWriteOptions {
    /// Maximum cells per write request (default: 1000)
    pub chunk_size: usize,
    /// Retries per chunk after the first attempt (default: 3)
    pub max_retries: u32,
    /// Base backoff delay (default: 1s)
    pub retry_delay: Duration,
    /// Abort a chunk on its first failure (default: false)
    pub cancel_at_failure: bool,
}

impl Default for BulkWriteOptions {
    fn default() -> Self {
        Self::from(&BulkConfig::default())
    }
}

impl From<&BulkConfig> for BulkWriteOptions {
    fn from(config: &BulkConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            cancel_at_failure: config.cancel_at_failure,
        }
    }
}

impl BulkWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_cancel_at_failure(mut self, cancel_at_failure: bool) -> Self {
        self.cancel_at_failure = cancel_at_failure;
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            cancel_at_failure: self.cancel_at_failure,
        }
    }
}

/// Options for bulk reads
#[derive(Debug, Clone, PartialEq)]
pub struct BulkReadOptions {
    pub chunk_size: usize,
}

impl Default for BulkReadOptions {
    fn default() -> Self {
        Self::from(&BulkConfig::default())
    }
}

impl From<&BulkConfig> for BulkReadOptions {
    fn from(config: &BulkConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
        }
    }
}

impl BulkReadOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// Outcome of a single read that keeps "no value" and "failed" apart
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Value(CellValue),
    Empty,
    Failed(String),
}

impl ReadOutcome {
    /// Collapse to the lossy form: failures and empty cells both become `None`
    pub fn into_option(self) -> Option<CellValue> {
        match self {
            ReadOutcome::Value(v) => Some(v),
            ReadOutcome::Empty | ReadOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ReadOutcome::Failed(_))
    }
}

/// Result of one item of `execute_batch_operations`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// Position in the submitted batch
    pub index: usize,
    pub success: bool,
    /// `None` only when a raw item could not be parsed
    pub operation: Option<Operation>,
    /// Value returned by a read
    pub result: Option<CellValue>,
    pub error: Option<String>,
}

impl BatchResult {
    pub fn succeeded(index: usize, operation: Operation, result: Option<CellValue>) -> Self {
        Self {
            index,
            success: true,
            operation: Some(operation),
            result,
            error: None,
        }
    }

    pub fn failed(index: usize, operation: Option<Operation>, error: &Tm1Error) -> Self {
        Self {
            index,
            success: false,
            operation,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Summary of batch execution
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration: Duration,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult], total_duration: Duration) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total,
            succeeded,
            failed: total - succeeded,
            total_duration,
        }
    }
}
