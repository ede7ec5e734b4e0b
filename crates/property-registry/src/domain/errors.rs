//! # Registry Errors

use shared_types::{PropertyId, TokenId};
use thiserror::Error;

use super::PropertyStatus;

/// Errors from the property registry.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// No property record with this id.
    #[error("Property not found: {0}")]
    NotFound(PropertyId),

    /// No minted property carries this token.
    #[error("No property minted for token {0}")]
    NoPropertyForToken(TokenId),

    /// Listing lifecycle violated.
    #[error("Invalid property status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// Status before the attempt.
        from: PropertyStatus,
        /// Requested status.
        to: PropertyStatus,
    },

    /// The token id is already bound to another property.
    #[error("Token {0} is already bound to a property")]
    TokenAlreadyBound(TokenId),

    /// A finalizing event arrived for a token with no open history entry.
    #[error("No open escrow history entry for token {0}")]
    NoOpenEscrow(TokenId),

    /// Underlying store failure.
    #[error("Property store error: {0}")]
    Store(String),
}
