//! redb-backed transaction store.
//!
//! Transactions are stored CBOR-encoded under their transaction number
//! in a single table. The store is append-only from the pipeline's point
//! of view; retention and cleanup are external concerns.

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition, TableError};
use vasd_core::{StoreError, Transaction, TransactionStore};

const TRANSACTIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("transactions");

/// Embedded on-disk transaction store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open the store at `path`, creating the file and table if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the database cannot be
    /// opened; the caller degrades to an in-memory store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(unavailable)?;

        // Create the table up front so a fresh database answers
        // `last_txn_no` without a special case.
        let write = db.begin_write().map_err(unavailable)?;
        {
            write.open_table(TRANSACTIONS).map_err(unavailable)?;
        }
        write.commit().map_err(unavailable)?;

        Ok(Self { db })
    }

    /// Fetch one transaction by number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database failure and
    /// [`StoreError::Codec`] when a stored value does not decode.
    pub fn get(&self, txn_no: u64) -> Result<Option<Transaction>, StoreError> {
        let read = self.db.begin_read().map_err(unavailable)?;
        let table = match read.open_table(TRANSACTIONS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(error) => return Err(unavailable(error)),
        };

        match table.get(txn_no).map_err(unavailable)? {
            Some(guard) => {
                let txn = ciborium::de::from_reader(guard.value())
                    .map_err(|error| StoreError::Codec { reason: error.to_string() })?;
                Ok(Some(txn))
            },
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TransactionStore for RedbStore {
    async fn append(&self, txn: &Transaction) -> Result<(), StoreError> {
        let mut value = Vec::new();
        ciborium::ser::into_writer(txn, &mut value)
            .map_err(|error| StoreError::Codec { reason: error.to_string() })?;

        let write = self.db.begin_write().map_err(unavailable)?;
        {
            let mut table = write.open_table(TRANSACTIONS).map_err(unavailable)?;
            table.insert(txn.txn_no, value.as_slice()).map_err(unavailable)?;
        }
        write.commit().map_err(unavailable)?;
        Ok(())
    }

    async fn last_txn_no(&self) -> Result<u64, StoreError> {
        let read = self.db.begin_read().map_err(unavailable)?;
        let table = match read.open_table(TRANSACTIONS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(error) => return Err(unavailable(error)),
        };

        let last = table.last().map_err(unavailable)?;
        Ok(last.map_or(0, |(key, _)| key.value()))
    }
}

fn unavailable(error: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable { reason: error.to_string() }
}
