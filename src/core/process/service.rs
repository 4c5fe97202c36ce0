//! TM1 process execution over the REST transport

use super::poller::{AsyncExecution, poll_execute_with_return};
use super::types::{
    AsyncExecutionHandle, ExecutionStatus, PollOptions, ProcessExecuteResult, ProcessParameter,
};
use crate::core::transport::{RestResponse, Transport};
use crate::utils::error::Result;
use crate::utils::escape_odata_key;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Value, json};
use tracing::debug;

/// Runs TI processes, synchronously or through `Prefer: respond-async`
pub struct ProcessService<T> {
    transport: T,
    poll_options: PollOptions,
    /// Terminal bodies seen by `status`, handed out once by `result`
    finished: DashMap<String, Value>,
}

impl<T: Transport> ProcessService<T> {
    pub fn new(transport: T) -> Self {
        Self::with_poll_options(transport, PollOptions::default())
    }

    pub fn with_poll_options(transport: T, poll_options: PollOptions) -> Self {
        Self {
            transport,
            poll_options,
            finished: DashMap::new(),
        }
    }

    pub fn poll_options(&self) -> &PollOptions {
        &self.poll_options
    }

    /// Run a process and wait for the server to answer
    pub async fn execute_with_return(
        &self,
        name: &str,
        params: &[ProcessParameter],
    ) -> Result<ProcessExecuteResult> {
        debug!(process = name, "Executing process");
        let response = self
            .transport
            .post(&execute_path(name), parameters_body(params))
            .await?;
        Ok(ProcessExecuteResult::from_json(&response.body))
    }

    /// Start a process asynchronously and poll it to completion
    ///
    /// Uses the service's poll options unless `options` is given.
    pub async fn poll_execute_with_return(
        &self,
        name: &str,
        params: &[ProcessParameter],
        options: Option<&PollOptions>,
    ) -> Result<ProcessExecuteResult> {
        let options = options.unwrap_or(&self.poll_options);
        let body = poll_execute_with_return(self, name, params, options).await?;
        Ok(ProcessExecuteResult::from_json(&body))
    }

    async fn fetch(&self, handle: &AsyncExecutionHandle) -> Result<RestResponse> {
        self.transport.get(&async_path(&handle.execution_id)).await
    }
}

#[async_trait]
impl<T: Transport> AsyncExecution for ProcessService<T> {
    async fn start(
        &self,
        target: &str,
        params: &[ProcessParameter],
    ) -> Result<AsyncExecutionHandle> {
        let response = self
            .transport
            .post_with_headers(
                &execute_path(target),
                parameters_body(params),
                &[("Prefer", "respond-async")],
            )
            .await?;

        let execution_id = response
            .header("location")
            .and_then(parse_async_id)
            .or_else(|| {
                response
                    .body
                    .get("ID")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();
        Ok(AsyncExecutionHandle::new(execution_id))
    }

    async fn status(&self, handle: &AsyncExecutionHandle) -> Result<ExecutionStatus> {
        let response = self.fetch(handle).await?;
        if response.status == 202 {
            return Ok(ExecutionStatus::Running);
        }

        let outcome = ProcessExecuteResult::from_json(&response.body);
        if !outcome.status_code.is_empty() && !outcome.is_success() {
            // Failed runs never reach `result`, so their bodies are not kept
            return Ok(ExecutionStatus::Failed {
                message: outcome.failure_message(),
            });
        }
        self.finished
            .insert(handle.execution_id.clone(), response.body);
        Ok(ExecutionStatus::Completed)
    }

    async fn result(&self, handle: &AsyncExecutionHandle) -> Result<Value> {
        if let Some((_, body)) = self.finished.remove(&handle.execution_id) {
            return Ok(body);
        }
        Ok(self.fetch(handle).await?.body)
    }
}

fn execute_path(name: &str) -> String {
    format!(
        "Processes('{}')/tm1.ExecuteWithReturn?$expand=ErrorLogFile",
        escape_odata_key(name)
    )
}

fn async_path(id: &str) -> String {
    format!("_async('{}')", escape_odata_key(id))
}

fn parameters_body(params: &[ProcessParameter]) -> Value {
    json!({ "Parameters": params.iter().map(ProcessParameter::to_json).collect::<Vec<_>>() })
}

/// Extract the id from a `Location: .../_async('id')` header
fn parse_async_id(location: &str) -> Option<String> {
    let start = location.rfind("_async('")? + "_async('".len();
    let end = location[start..].find("')")? + start;
    let id = &location[start..end];
    (!id.is_empty()).then(|| id.to_string())
}
