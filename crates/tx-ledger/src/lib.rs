//! # Transaction Ledger
//!
//! Append-only log of confirmed escrow transitions, deduplicated on
//! transaction hash: inserting a hash that is already recorded returns the
//! stored entry unchanged instead of failing or double-writing.
//!
//! ## Module Structure
//!
//! ```text
//! tx-ledger/
//! ├── domain/          # LedgerEntry, entry types, errors
//! ├── ports/           # LedgerStore (+ in-memory adapter)
//! └── service/         # TxLedger queries and idempotent append
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{EntryStatus, LedgerEntry, LedgerEntryType, TxLedgerError};
pub use ports::{InMemoryLedgerStore, InsertOutcome, LedgerStore};
pub use service::TxLedger;
