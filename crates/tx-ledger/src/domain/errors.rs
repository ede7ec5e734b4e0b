//! # Ledger Errors

use shared_types::TxHash;
use thiserror::Error;

/// Errors from the transaction ledger.
#[derive(Debug, Error)]
pub enum TxLedgerError {
    /// No entry recorded under this hash.
    #[error("No ledger entry for transaction {0}")]
    NotFound(TxHash),

    /// Underlying store failure.
    #[error("Ledger store error: {0}")]
    Store(String),
}
