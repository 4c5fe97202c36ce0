//! Start-then-poll driver for long-running remote executions

use super::types::{AsyncExecutionHandle, ExecutionStatus, PollOptions, ProcessParameter};
use crate::utils::error::{Result, Tm1Error};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Remote side of an asynchronous execution
#[async_trait]
pub trait AsyncExecution: Send + Sync {
    /// Start `target` and return the handle to poll
    async fn start(
        &self,
        target: &str,
        params: &[ProcessParameter],
    ) -> Result<AsyncExecutionHandle>;

    /// Check the state of a started execution
    async fn status(&self, handle: &AsyncExecutionHandle) -> Result<ExecutionStatus>;

    /// Fetch the payload of a completed execution
    async fn result(&self, handle: &AsyncExecutionHandle) -> Result<Value>;
}

/// Start `target` and poll until it completes, fails or times out
///
/// Errors from individual status checks are logged and polling continues;
/// only the timeout ends a run whose status cannot be read.
pub async fn poll_execute_with_return<E>(
    execution: &E,
    target: &str,
    params: &[ProcessParameter],
    options: &PollOptions,
) -> Result<Value>
where
    E: AsyncExecution + ?Sized,
{
    let handle = execution
        .start(target, params)
        .await
        .map_err(|e| Tm1Error::StartFailure(format!("{}: {}", target, e)))?;
    if handle.execution_id.is_empty() {
        return Err(Tm1Error::StartFailure(format!(
            "{}: no execution handle returned",
            target
        )));
    }

    info!(process = target, execution = %handle, "Async execution started");
    let started = Instant::now();
    let mut checks = 0u32;

    loop {
        checks += 1;
        match execution.status(&handle).await {
            Ok(ExecutionStatus::Completed) => {
                info!(process = target, execution = %handle, checks, elapsed = ?started.elapsed(), "Async execution completed");
                return execution.result(&handle).await;
            }
            Ok(ExecutionStatus::Failed { message }) => {
                warn!(process = target, execution = %handle, "Async execution failed: {}", message);
                return Err(Tm1Error::ExecutionFailure(message));
            }
            Ok(ExecutionStatus::Running) => {
                debug!(process = target, execution = %handle, checks, "Still running");
            }
            Err(e) => {
                warn!(process = target, execution = %handle, "Status check failed: {}", e);
            }
        }

        if started.elapsed() >= options.timeout {
            warn!(process = target, execution = %handle, checks, "Async execution timed out");
            return Err(Tm1Error::TimeoutExceeded(options.timeout));
        }
        sleep(options.poll_interval).await;
    }
}
