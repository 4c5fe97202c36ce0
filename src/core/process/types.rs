//! Async execution types

use crate::config::PollingConfig;
use crate::core::cells::CellValue;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

/// Identifies one started remote execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsyncExecutionHandle {
    pub execution_id: String,
}

impl AsyncExecutionHandle {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
        }
    }
}

impl fmt::Display for AsyncExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.execution_id)
    }
}

/// State reported by a status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed { message: String },
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }
}

/// Polling limits
#[derive(Debug, Clone, PartialEq)]
pub struct PollOptions {
    /// Give up once this much time has passed since start (default: 300s)
    pub timeout: Duration,
    /// Pause between status checks (default: 5s)
    pub poll_interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollOptions {
    fn from(config: &PollingConfig) -> Self {
        Self {
            timeout: config.timeout_duration(),
            poll_interval: config.poll_interval_duration(),
        }
    }
}

impl PollOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Named process parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessParameter {
    pub name: String,
    pub value: CellValue,
}

impl ProcessParameter {
    pub fn new(name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({ "Name": self.name, "Value": self.value.to_json() })
    }
}

/// Outcome of `tm1.ExecuteWithReturn`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessExecuteResult {
    /// e.g. `CompletedSuccessfully`, `HasMinorErrors`, `Aborted`
    pub status_code: String,
    /// Name of the error log written by a failed run
    pub error_log_file: Option<String>,
}

impl ProcessExecuteResult {
    /// Parse an `ExecuteWithReturn` response body
    pub fn from_json(body: &Value) -> Self {
        let status_code = body
            .get("ProcessExecuteStatusCode")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let error_log_file = body
            .get("ErrorLogFile")
            .and_then(|f| f.get("Filename"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            status_code,
            error_log_file,
        }
    }

    /// Whether the process ran to completion
    ///
    /// Minor errors still count as a completed run.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status_code.as_str(),
            "CompletedSuccessfully" | "HasMinorErrors"
        )
    }

    pub(crate) fn failure_message(&self) -> String {
        match &self.error_log_file {
            Some(file) => format!("{} (see {})", self.status_code, file),
            None => self.status_code.clone(),
        }
    }
}
