//! # KYC Gate
//!
//! Answers "is address X allowed to transact" for every other subsystem.
//!
//! The verification registry on the external ledger is ground truth. The
//! gate may cache lookups for UX reads, but any operation that moves funds
//! re-checks the ledger, and an unreachable ledger always denies (fail
//! closed, never fail open).
//!
//! ## Module Structure
//!
//! ```text
//! kyc-gate/
//! ├── domain/          # UserRecord, KycStatus, errors
//! ├── ports/           # KycLedger, UserStore (+ in-memory mocks)
//! └── service/         # KycGate orchestration
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{Document, KycError, KycStatus, UserRecord};
pub use ports::{InMemoryUserStore, KycLedger, MockKycLedger, UserStore};
pub use service::KycGate;
