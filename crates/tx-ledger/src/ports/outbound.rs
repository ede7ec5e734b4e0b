//! # Outbound Ports
//!
//! The durable, hash-unique entry store.

use crate::domain::{LedgerEntry, TxLedgerError};
use async_trait::async_trait;
use shared_types::TxHash;

/// Result of an insert against the unique-hash constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The entry was written.
    Inserted(LedgerEntry),
    /// An entry with the same hash already existed; it is returned unchanged.
    Existing(LedgerEntry),
}

impl InsertOutcome {
    /// The stored entry, whichever way the insert went.
    pub fn entry(&self) -> &LedgerEntry {
        match self {
            Self::Inserted(e) | Self::Existing(e) => e,
        }
    }

    /// Whether the insert actually wrote.
    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Durable ledger-entry store - outbound port.
///
/// `transaction_hash` is the unique key; `insert_if_absent` must be atomic
/// with respect to concurrent inserts of the same hash.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert unless the hash is already present.
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<InsertOutcome, TxLedgerError>;

    /// Fetch by transaction hash.
    async fn get_by_hash(&self, hash: TxHash) -> Result<Option<LedgerEntry>, TxLedgerError>;

    /// All entries, unordered.
    async fn list(&self) -> Result<Vec<LedgerEntry>, TxLedgerError>;
}

/// In-memory ledger store for testing.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    entries: dashmap::DashMap<TxHash, LedgerEntry>,
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<InsertOutcome, TxLedgerError> {
        match self.entries.entry(entry.transaction_hash) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                Ok(InsertOutcome::Existing(existing.get().clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(InsertOutcome::Inserted(entry))
            }
        }
    }

    async fn get_by_hash(&self, hash: TxHash) -> Result<Option<LedgerEntry>, TxLedgerError> {
        Ok(self.entries.get(&hash).map(|e| e.clone()))
    }

    async fn list(&self) -> Result<Vec<LedgerEntry>, TxLedgerError> {
        Ok(self.entries.iter().map(|e| e.clone()).collect())
    }
}
