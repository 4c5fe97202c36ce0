//! # tm1-rs
//!
//! Async Rust client for the IBM TM1 / Planning Analytics REST API.
//!
//! ## Features
//!
//! - **Bulk cell operations**: writes, reads, updates and deletes grouped by
//!   cube, split into chunks and retried with linear backoff
//! - **Batches**: heterogeneous operation lists executed item by item with
//!   per-item results
//! - **Batch transactions**: stage operations, then commit or roll back
//! - **Async process execution**: start a TI process with
//!   `Prefer: respond-async` and poll it to completion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tm1_rs::{BulkWriteOptions, CellWrite, Config, Tm1Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/tm1.yaml").await?;
//!     let client = Tm1Client::new(config)?;
//!
//!     let writes = vec![
//!         CellWrite::new("Sales", ["2024", "Q1"], 100),
//!         CellWrite::new("Sales", ["2024", "Q2"], 200),
//!     ];
//!     client
//!         .bulk()
//!         .execute_bulk_write(writes, &BulkWriteOptions::new().with_chunk_size(500))
//!         .await?;
//!
//!     let result = client
//!         .processes()
//!         .poll_execute_with_return("Load Actuals", &[], None)
//!         .await?;
//!     println!("Process finished: {}", result.status_code);
//!
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod client;
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use client::Tm1Client;
pub use config::Config;
pub use utils::error::{Result, Tm1Error};

pub use core::bulk::{
    BatchResult, BatchSummary, BulkReadOptions, BulkService, BulkWriteOptions, CellWrite,
    Operation, OperationKind, ReadOutcome, Transaction, TransactionStatus,
};
pub use core::cells::{CellQuery, CellService, CellSet, CellUpdate, CellValue, RestCellService};
pub use core::process::{
    AsyncExecution, AsyncExecutionHandle, ExecutionStatus, PollOptions, ProcessExecuteResult,
    ProcessParameter, ProcessService, poll_execute_with_return,
};
pub use core::transport::{RestTransport, Transport};
pub use utils::logging::init_logging;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
