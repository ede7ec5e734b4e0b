//! # Transaction Ledger Service
//!
//! Idempotent append plus the query surface.

use crate::domain::{LedgerEntry, TxLedgerError};
use crate::ports::{InsertOutcome, LedgerStore};
use escrow_engine::EscrowEvent;
use shared_types::{Address, PropertyId, TokenId, TxHash};
use std::sync::Arc;
use tracing::debug;

/// The transaction ledger.
pub struct TxLedger {
    store: Arc<dyn LedgerStore>,
}

impl TxLedger {
    /// Build the ledger over an entry store.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Append an entry for a confirmed contract event. Re-recording the same
    /// transaction hash returns the stored entry unchanged.
    pub async fn record_event(
        &self,
        event: &EscrowEvent,
        property_id: Option<PropertyId>,
    ) -> Result<InsertOutcome, TxLedgerError> {
        let outcome = self
            .store
            .insert_if_absent(LedgerEntry::from_event(event, property_id))
            .await?;
        if outcome.was_inserted() {
            debug!(tx_hash = %event.tx_hash, kind = ?event.kind, "Ledger entry recorded");
        } else {
            debug!(tx_hash = %event.tx_hash, "Duplicate transaction hash; returning stored entry");
        }
        Ok(outcome)
    }

    /// Append an entry for an event whose transaction reverted. Deduplicated
    /// on the same transaction-hash key as confirmed entries.
    pub async fn record_failed_event(
        &self,
        event: &EscrowEvent,
        property_id: Option<PropertyId>,
    ) -> Result<InsertOutcome, TxLedgerError> {
        let outcome = self
            .store
            .insert_if_absent(LedgerEntry::from_failed_event(event, property_id))
            .await?;
        if outcome.was_inserted() {
            debug!(tx_hash = %event.tx_hash, kind = ?event.kind, "Failed transaction recorded");
        } else {
            debug!(tx_hash = %event.tx_hash, "Duplicate transaction hash; returning stored entry");
        }
        Ok(outcome)
    }

    /// Fetch by transaction hash.
    pub async fn get_by_hash(&self, hash: TxHash) -> Result<LedgerEntry, TxLedgerError> {
        self.store
            .get_by_hash(hash)
            .await?
            .ok_or(TxLedgerError::NotFound(hash))
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Result<Vec<LedgerEntry>, TxLedgerError> {
        let mut entries = self.store.list().await?;
        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
        Ok(entries)
    }

    /// Entries where the address is payer or payee, newest first.
    pub async fn list_for_address(
        &self,
        address: Address,
    ) -> Result<Vec<LedgerEntry>, TxLedgerError> {
        let mut entries = self.store.list().await?;
        entries.retain(|e| e.involves(address));
        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
        Ok(entries)
    }

    /// Entries for one token, newest first.
    pub async fn list_for_token(&self, token_id: TokenId) -> Result<Vec<LedgerEntry>, TxLedgerError> {
        let mut entries = self.store.list().await?;
        entries.retain(|e| e.token_id == token_id);
        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
        Ok(entries)
    }
}
