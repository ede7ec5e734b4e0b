//! Domain model: the immutable ledger entry.

pub mod entities;
pub mod errors;

pub use entities::{EntryStatus, LedgerEntry, LedgerEntryType};
pub use errors::TxLedgerError;
