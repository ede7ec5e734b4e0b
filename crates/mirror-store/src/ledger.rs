//! RocksDB-backed ledger-entry store.
//!
//! Entries are keyed by transaction hash, which carries the unique
//! constraint: `insert_if_absent` checks and writes under a single lock so a
//! replayed hash can never overwrite the stored entry.

use crate::db::{MirrorDb, CF_LEDGER};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::TxHash;
use std::sync::Arc;
use tx_ledger::{InsertOutcome, LedgerEntry, LedgerStore, TxLedgerError};

/// Durable [`LedgerStore`] over the `ledger_entries` column family.
pub struct RocksLedgerStore {
    db: Arc<MirrorDb>,
    // Serializes check-then-insert; this process is the only writer.
    insert_lock: Mutex<()>,
}

impl RocksLedgerStore {
    /// Build the store over an open database.
    pub fn new(db: Arc<MirrorDb>) -> Self {
        Self {
            db,
            insert_lock: Mutex::new(()),
        }
    }

    fn read(&self, hash: TxHash) -> Result<Option<LedgerEntry>, TxLedgerError> {
        let cf = self
            .db
            .cf(CF_LEDGER)
            .map_err(|e| TxLedgerError::Store(e.to_string()))?;
        let row = self
            .db
            .db
            .get_cf(cf, hash.as_bytes())
            .map_err(|e| TxLedgerError::Store(e.to_string()))?;
        row.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(|e| TxLedgerError::Store(e.to_string()))
    }
}

#[async_trait]
impl LedgerStore for RocksLedgerStore {
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<InsertOutcome, TxLedgerError> {
        let _guard = self.insert_lock.lock();
        if let Some(existing) = self.read(entry.transaction_hash)? {
            return Ok(InsertOutcome::Existing(existing));
        }
        let cf = self
            .db
            .cf(CF_LEDGER)
            .map_err(|e| TxLedgerError::Store(e.to_string()))?;
        let bytes = serde_json::to_vec(&entry).map_err(|e| TxLedgerError::Store(e.to_string()))?;
        self.db
            .db
            .put_cf_opt(cf, entry.transaction_hash.as_bytes(), bytes, &self.db.write_opts())
            .map_err(|e| TxLedgerError::Store(e.to_string()))?;
        Ok(InsertOutcome::Inserted(entry))
    }

    async fn get_by_hash(&self, hash: TxHash) -> Result<Option<LedgerEntry>, TxLedgerError> {
        self.read(hash)
    }

    async fn list(&self) -> Result<Vec<LedgerEntry>, TxLedgerError> {
        let cf = self
            .db
            .cf(CF_LEDGER)
            .map_err(|e| TxLedgerError::Store(e.to_string()))?;
        let mut entries = Vec::new();
        for item in self.db.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item.map_err(|e| TxLedgerError::Store(e.to_string()))?;
            entries.push(
                serde_json::from_slice(&value).map_err(|e| TxLedgerError::Store(e.to_string()))?,
            );
        }
        Ok(entries)
    }
}
