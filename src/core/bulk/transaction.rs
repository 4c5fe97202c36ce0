//! In-memory batch transactions
//!
//! A transaction stages operations under an id and runs them all on commit.
//! Nothing is persisted and rollback issues no remote calls: operations that
//! a failed commit already applied stay applied on the server.

use super::types::{BatchResult, Operation};
use crate::utils::error::{Result, Tm1Error};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Transaction lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Committed,
    RolledBack,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Committed => "committed",
            TransactionStatus::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// Staged operations awaiting commit or rollback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub operations: Vec<Operation>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Owns the id → transaction map
///
/// Each transaction sits behind its own async mutex; commit holds it for the
/// whole execution so a concurrent commit or rollback of the same id waits
/// and then sees the terminal state.
#[derive(Debug, Default)]
pub struct TransactionManager {
    transactions: DashMap<String, Arc<Mutex<Transaction>>>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `operations` and return the new transaction id
    pub fn create(&self, operations: Vec<Operation>) -> String {
        let id = Uuid::new_v4().to_string();
        info!(transaction = %id, operations = operations.len(), "Created batch transaction");

        let transaction = Transaction {
            id: id.clone(),
            operations,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
        };
        self.transactions
            .insert(id.clone(), Arc::new(Mutex::new(transaction)));
        id
    }

    fn entry(&self, id: &str) -> Result<Arc<Mutex<Transaction>>> {
        self.transactions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Tm1Error::TransactionNotFound(id.to_string()))
    }

    /// Run a pending transaction's operations through `execute`
    ///
    /// Any failed result marks the transaction rolled back and returns
    /// `TransactionFailed`; otherwise it is marked committed.
    pub async fn commit_with<F, Fut>(&self, id: &str, execute: F) -> Result<Vec<BatchResult>>
    where
        F: FnOnce(Vec<Operation>) -> Fut,
        Fut: Future<Output = Vec<BatchResult>>,
    {
        let entry = self.entry(id)?;
        let mut transaction = entry.lock().await;

        if transaction.status != TransactionStatus::Pending {
            return Err(Tm1Error::TransactionInvalidState {
                id: id.to_string(),
                status: transaction.status.to_string(),
            });
        }

        info!(transaction = %id, operations = transaction.operations.len(), "Committing batch transaction");
        let results = execute(transaction.operations.clone()).await;
        let failed = results.iter().filter(|r| !r.success).count();

        if failed > 0 {
            transaction.status = TransactionStatus::RolledBack;
            warn!(transaction = %id, failed, "Batch transaction rolled back");
            return Err(Tm1Error::TransactionFailed {
                id: id.to_string(),
                failed,
                total: results.len(),
            });
        }

        transaction.status = TransactionStatus::Committed;
        info!(transaction = %id, "Batch transaction committed");
        Ok(results)
    }

    /// Discard a transaction's staged operations
    ///
    /// A committed transaction cannot be rolled back.
    pub async fn rollback(&self, id: &str) -> Result<()> {
        let entry = self.entry(id)?;
        let mut transaction = entry.lock().await;
        // A rollback that held the lock before us has already discarded it
        if !self.transactions.contains_key(id) {
            return Err(Tm1Error::TransactionNotFound(id.to_string()));
        }
        if transaction.status == TransactionStatus::Committed {
            return Err(Tm1Error::TransactionInvalidState {
                id: id.to_string(),
                status: transaction.status.to_string(),
            });
        }
        transaction.status = TransactionStatus::RolledBack;
        self.transactions.remove(id);
        drop(transaction);

        info!(transaction = %id, "Batch transaction rolled back and discarded");
        Ok(())
    }

    /// Snapshot of one transaction
    pub async fn get(&self, id: &str) -> Option<Transaction> {
        let entry = self.entry(id).ok()?;
        let transaction = entry.lock().await;
        Some(transaction.clone())
    }

    /// Snapshots of every known transaction, oldest first
    pub async fn list(&self) -> Vec<Transaction> {
        let entries: Vec<Arc<Mutex<Transaction>>> = self
            .transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut snapshots = Vec::with_capacity(entries.len());
        for entry in entries {
            snapshots.push(entry.lock().await.clone());
        }
        snapshots.sort_by_key(|t| t.created_at);
        snapshots
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
