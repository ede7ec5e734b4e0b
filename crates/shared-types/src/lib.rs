//! # Shared Types Crate
//!
//! Domain primitives used by every subsystem: wallet addresses, transaction
//! hashes, token identifiers, and minor-unit monetary amounts.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-subsystem types are defined here, once.
//! - **Canonical Identity**: callers resolve whatever identity shape they
//!   receive into [`OwnerId`] at the boundary; the core never sees aliases.
//! - **Integer Money**: amounts are always integers in minor units (wei).
//!   Human-readable units are derived by presentation code, never stored.

pub mod amount;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod time;

pub use amount::Amount;
pub use errors::ParseError;
pub use identity::{Address, OwnerId, TxHash};
pub use ids::{PropertyId, TokenId};
pub use time::unix_now;
