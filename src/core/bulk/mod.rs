//! Bulk cell operations
//!
//! Chunked, retried writes and best-effort reads against a [`CellService`],
//! a fail-soft heterogeneous batch executor, and in-memory batch transactions
//! layered on top of it.
//!
//! [`CellService`]: crate::core::cells::CellService

mod chunking;
mod dispatcher;
mod transaction;
mod types;


pub use chunking::{chunk, group_by_target};
pub use dispatcher::BulkService;
pub use transaction::{Transaction, TransactionManager, TransactionStatus};
pub use types::{
    BatchResult, BatchSummary, BulkReadOptions, BulkWriteOptions, CellWrite, Operation,
    OperationKind, ReadOutcome,
};
