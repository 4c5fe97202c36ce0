//! Asynchronous process execution
//!
//! Start a long-running remote execution, take its handle and poll it until
//! it completes, fails or the timeout passes.

mod poller;
mod service;
mod types;


pub use poller::{AsyncExecution, poll_execute_with_return};
pub use service::ProcessService;
pub use types::{
    AsyncExecutionHandle, ExecutionStatus, PollOptions, ProcessExecuteResult, ProcessParameter,
};
