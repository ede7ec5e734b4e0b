//! Domain model: property records, the escrow mirror, sale metrics.

pub mod entities;
pub mod errors;

pub use entities::{EscrowHistoryEntry, EscrowInfo, MirrorApply, Property, PropertyStatus, SaleMetrics};
pub use errors::PropertyError;
