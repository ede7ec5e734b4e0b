//! # Mirror Store
//!
//! RocksDB-backed persistence for the off-chain side of the platform: user
//! records, property records (with their escrow mirrors), and ledger entries.
//! One column family per table; rows are JSON; the ledger table is unique on
//! transaction hash.
//!
//! The store has an explicit lifecycle: opened once at startup, flushed and
//! closed on shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod db;
mod ledger;
mod properties;
mod users;

pub use db::{MirrorDb, MirrorDbConfig, MirrorStoreError};
pub use ledger::RocksLedgerStore;
pub use properties::RocksPropertyStore;
pub use users::RocksUserStore;
