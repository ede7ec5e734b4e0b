//! # Domain Errors

use super::entities::KycStatus;
use shared_types::Address;
use thiserror::Error;

/// KYC gate error types.
#[derive(Debug, Clone, Error)]
pub enum KycError {
    /// No record for the address.
    #[error("User not found: {0}")]
    UserNotFound(Address),

    /// Address already has a live (pending or verified) registration.
    #[error("User already registered: {0}")]
    AlreadyRegistered(Address),

    /// Admin review attempted an invalid lifecycle transition.
    #[error("Invalid KYC status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// Current status
        from: KycStatus,
        /// Attempted status
        to: KycStatus,
    },

    /// The verification registry could not be reached. Callers must treat
    /// this as "not verified" (fail closed).
    #[error("KYC ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Backing store failure.
    #[error("Store error: {0}")]
    Store(String),
}
