//! # Property Registry
//!
//! Off-chain records for tokenized properties: the listing lifecycle
//! (submit, review, mint), the escrow mirror kept per property for queries,
//! and sale metrics.
//!
//! The mirror is a convenience copy of ledger state. It is written after
//! ledger confirmations and corrected in place whenever a read finds it
//! disagreeing with the ledger; it never overrules the ledger.
//!
//! ## Module Structure
//!
//! ```text
//! property-registry/
//! ├── domain/          # Property, PropertyStatus, EscrowInfo, SaleMetrics
//! ├── ports/           # PropertyStore (+ in-memory adapter)
//! └── service/         # PropertyRegistry orchestration + DealMirror impl
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    EscrowHistoryEntry, EscrowInfo, MirrorApply, Property, PropertyError, PropertyStatus,
    SaleMetrics,
};
pub use ports::{InMemoryPropertyStore, PropertyStore};
pub use service::PropertyRegistry;
