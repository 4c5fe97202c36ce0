//! Bulk dispatcher
//!
//! Groups cell operations by target cube, chunks each group and drives the
//! chunks through a [`CellService`]. Processing is sequential: groups in
//! first-seen order, chunks in submission order.

use super::chunking::{chunk, group_by_target};
use super::transaction::{Transaction, TransactionManager};
use super::types::{
    BatchResult, BatchSummary, BulkReadOptions, BulkWriteOptions, CellWrite, Operation,
    ReadOutcome,
};
use crate::config::BulkConfig;
use crate::core::cells::{CellQuery, CellService, CellUpdate, CellValue};
use crate::utils::error::{Result, RetryPolicy, Tm1Error};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Bulk cell operations, batches and batch transactions
pub struct BulkService<C> {
    cells: C,
    defaults: BulkConfig,
    transactions: TransactionManager,
}

impl<C: CellService> BulkService<C> {
    /// Create a bulk service with default options
    pub fn new(cells: C) -> Self {
        Self::with_defaults(cells, BulkConfig::default())
    }

    /// Create a bulk service whose option defaults come from `defaults`
    pub fn with_defaults(cells: C, defaults: BulkConfig) -> Self {
        Self {
            cells,
            defaults,
            transactions: TransactionManager::new(),
        }
    }

    pub fn cells(&self) -> &C {
        &self.cells
    }

    /// Write options built from the configured defaults
    pub fn write_options(&self) -> BulkWriteOptions {
        BulkWriteOptions::from(&self.defaults)
    }

    /// Read options built from the configured defaults
    pub fn read_options(&self) -> BulkReadOptions {
        BulkReadOptions::from(&self.defaults)
    }

    /// Write cells, one retried request per chunk
    ///
    /// Fails fast: the first chunk that exhausts its retries aborts the call
    /// with `BulkWriteFailure`. Chunks written before that stay written.
    pub async fn execute_bulk_write(
        &self,
        writes: Vec<CellWrite>,
        options: &BulkWriteOptions,
    ) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        if options.chunk_size == 0 {
            return Err(Tm1Error::invalid_request("Chunk size must be greater than 0"));
        }

        let total = writes.len();
        let policy = RetryPolicy::new(options.retry_config());
        let groups = group_by_target(writes, |w| w.target.as_str());
        info!(
            cells = total,
            targets = groups.len(),
            chunk_size = options.chunk_size,
            "Executing bulk write"
        );

        for (target, group) in groups {
            let chunks = chunk(group, options.chunk_size)?;
            let chunk_count = chunks.len();

            for (index, writes) in chunks.into_iter().enumerate() {
                let cells: Vec<CellUpdate> =
                    writes.into_iter().map(CellWrite::into_update).collect();
                debug!(cube = %target, chunk = index + 1, of = chunk_count, cells = cells.len(), "Writing chunk");

                policy
                    .call(|| self.cells.write_values(&target, &cells))
                    .await
                    .map_err(|failure| Tm1Error::BulkWriteFailure {
                        target: target.clone(),
                        attempts: failure.attempts,
                        source: Box::new(failure.last_error),
                    })?;
            }
        }

        info!(cells = total, "Bulk write completed");
        Ok(())
    }

    /// Write cells, each with its own value and increment flag
    pub async fn execute_bulk_update(
        &self,
        updates: Vec<CellWrite>,
        options: &BulkWriteOptions,
    ) -> Result<()> {
        debug!(cells = updates.len(), "Executing bulk update");
        self.execute_bulk_write(updates, options).await
    }

    /// Zero out cells
    pub async fn execute_bulk_delete(
        &self,
        deletes: Vec<CellQuery>,
        options: &BulkWriteOptions,
    ) -> Result<()> {
        debug!(cells = deletes.len(), "Executing bulk delete");
        let writes = deletes.into_iter().map(CellWrite::clearing).collect();
        self.execute_bulk_write(writes, options).await
    }

    /// Read cells independently, in input order
    ///
    /// Failed reads and empty cells are both `None`; use
    /// [`execute_bulk_read_outcomes`](Self::execute_bulk_read_outcomes) to tell
    /// them apart.
    pub async fn execute_bulk_read(
        &self,
        queries: Vec<CellQuery>,
        options: &BulkReadOptions,
    ) -> Result<Vec<Option<CellValue>>> {
        let outcomes = self.execute_bulk_read_outcomes(queries, options).await?;
        Ok(outcomes.into_iter().map(ReadOutcome::into_option).collect())
    }

    /// Read cells independently, in input order, keeping failures visible
    pub async fn execute_bulk_read_outcomes(
        &self,
        queries: Vec<CellQuery>,
        options: &BulkReadOptions,
    ) -> Result<Vec<ReadOutcome>> {
        if options.chunk_size == 0 {
            return Err(Tm1Error::invalid_request("Chunk size must be greater than 0"));
        }

        let total = queries.len();
        let mut outcomes = vec![ReadOutcome::Empty; total];
        let indexed: Vec<(usize, CellQuery)> = queries.into_iter().enumerate().collect();
        let groups = group_by_target(indexed, |(_, q)| q.target.as_str());

        for (target, group) in groups {
            for reads in chunk(group, options.chunk_size)? {
                debug!(cube = %target, cells = reads.len(), "Reading chunk");
                for (index, query) in reads {
                    let read = self.cells.get_value(&target, &query.coordinates).await;
                    outcomes[index] = match read {
                        Ok(Some(value)) => ReadOutcome::Value(value),
                        Ok(None) => ReadOutcome::Empty,
                        Err(e) => {
                            warn!(cube = %target, coordinates = ?query.coordinates, "Read failed: {}", e);
                            ReadOutcome::Failed(e.to_string())
                        }
                    };
                }
            }
        }

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(cells = total, failed, "Bulk read completed");
        Ok(outcomes)
    }

    /// Run operations one at a time, recording each success or failure
    ///
    /// Never aborts: a failing operation does not stop the ones after it.
    pub async fn execute_batch_operations(&self, batch: Vec<Operation>) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(batch.len());
        for (index, operation) in batch.into_iter().enumerate() {
            results.push(self.run_operation(index, operation).await);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        info!(operations = results.len(), failed, "Batch executed");
        results
    }

    /// Like [`execute_batch_operations`](Self::execute_batch_operations) for raw JSON items
    ///
    /// Items with an unknown `kind` or missing fields become failed results.
    pub async fn execute_batch_json(&self, items: Vec<Value>) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let result = match Operation::from_json(item) {
                Ok(operation) => self.run_operation(index, operation).await,
                Err(e) => {
                    warn!(index, "Rejected batch item: {}", e);
                    BatchResult::failed(index, None, &e)
                }
            };
            results.push(result);
        }
        results
    }

    /// Execute a batch and summarize it
    pub async fn execute_batch_with_summary(
        &self,
        batch: Vec<Operation>,
    ) -> (Vec<BatchResult>, BatchSummary) {
        let start = Instant::now();
        let results = self.execute_batch_operations(batch).await;
        let summary = BatchSummary::from_results(&results, start.elapsed());
        (results, summary)
    }

    async fn run_operation(&self, index: usize, operation: Operation) -> BatchResult {
        match self.apply(&operation).await {
            Ok(result) => BatchResult::succeeded(index, operation, result),
            Err(e) => {
                warn!(index, kind = %operation.kind(), cube = operation.target(), "Batch operation failed: {}", e);
                BatchResult::failed(index, Some(operation), &e)
            }
        }
    }

    async fn apply(&self, operation: &Operation) -> Result<Option<CellValue>> {
        match operation {
            Operation::Write {
                target,
                coordinates,
                value,
            } => {
                let cell = CellUpdate::new(coordinates.clone(), value.clone());
                self.cells.write_values(target, &[cell]).await?;
                Ok(None)
            }
            Operation::Read {
                target,
                coordinates,
            } => self.cells.get_value(target, coordinates).await,
            Operation::Update {
                target,
                coordinates,
                value,
                increment,
            } => {
                let cell = CellUpdate::new(coordinates.clone(), value.clone())
                    .incrementing(*increment);
                self.cells.write_values(target, &[cell]).await?;
                Ok(None)
            }
            Operation::Delete {
                target,
                coordinates,
            } => {
                let cell = CellUpdate::new(coordinates.clone(), CellValue::zero());
                self.cells.write_values(target, &[cell]).await?;
                Ok(None)
            }
        }
    }

    /// Stage operations for a later commit; no remote call is made
    pub fn create_batch_transaction(&self, operations: Vec<Operation>) -> String {
        self.transactions.create(operations)
    }

    /// Run a staged transaction
    ///
    /// If any operation fails the transaction ends rolled back and
    /// `TransactionFailed` is returned; operations that succeeded are not undone.
    pub async fn commit_batch_transaction(&self, id: &str) -> Result<Vec<BatchResult>> {
        self.transactions
            .commit_with(id, |operations| self.execute_batch_operations(operations))
            .await
    }

    /// Discard a staged transaction
    pub async fn rollback_batch_transaction(&self, id: &str) -> Result<()> {
        self.transactions.rollback(id).await
    }

    /// Snapshot of a transaction
    pub async fn transaction(&self, id: &str) -> Option<Transaction> {
        self.transactions.get(id).await
    }

    /// Snapshots of all transactions held by this service
    pub async fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.list().await
    }
}
