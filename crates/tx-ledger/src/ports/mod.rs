//! Ports: the deduplicating store behind the ledger.

pub mod outbound;

pub use outbound::{InMemoryLedgerStore, InsertOutcome, LedgerStore};
