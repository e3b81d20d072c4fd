//! Persistence boundary for transactions.
//!
//! The store is an optional sink: the pipeline appends every recorded
//! transaction and consults the store once at startup to seed the
//! sequencer, but a failing store never blocks or aborts dispatch. The
//! caller logs [`StoreError`] and moves on; the in-memory counter stays
//! authoritative for the rest of the process lifetime.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::sequencer::Transaction;

/// Reasons a store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached or refused the operation.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Backend-specific failure description.
        reason: String,
    },
    /// A stored value could not be encoded or decoded.
    #[error("codec failure: {reason}")]
    Codec {
        /// Backend-specific failure description.
        reason: String,
    },
}

/// Append-only store of transactions keyed by transaction number.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist one transaction.
    async fn append(&self, txn: &Transaction) -> Result<(), StoreError>;

    /// The greatest transaction number persisted so far, 0 when empty.
    ///
    /// Consulted once at startup to seed the sequencer.
    async fn last_txn_no(&self) -> Result<u64, StoreError>;
}

/// In-memory store.
///
/// Backs unit tests and serves as the degraded-mode fallback when the
/// on-disk store cannot be opened at startup.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: Mutex<Vec<Transaction>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything appended so far, in append order.
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn append(&self, txn: &Transaction) -> Result<(), StoreError> {
        let mut guard = self
            .transactions
            .lock()
            .map_err(|_| StoreError::Unavailable { reason: "lock poisoned".to_string() })?;
        guard.push(txn.clone());
        Ok(())
    }

    async fn last_txn_no(&self) -> Result<u64, StoreError> {
        let guard = self
            .transactions
            .lock()
            .map_err(|_| StoreError::Unavailable { reason: "lock poisoned".to_string() })?;
        Ok(guard.iter().map(|txn| txn.txn_no).max().unwrap_or(0))
    }
}
