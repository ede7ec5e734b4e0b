//! # Parse Errors
//!
//! Errors produced while decoding externally supplied primitives.

use thiserror::Error;

/// Errors from parsing addresses, hashes, and amounts received at the edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Address is not `0x` followed by exactly 40 hex characters.
    #[error("Invalid address: expected 0x + 40 hex chars, got {0:?}")]
    InvalidAddress(String),

    /// Transaction hash is not `0x` followed by exactly 64 hex characters.
    #[error("Invalid transaction hash: expected 0x + 64 hex chars, got {0:?}")]
    InvalidTxHash(String),

    /// Amount is not a base-10 integer in minor units.
    #[error("Invalid amount: {0:?} is not a decimal integer")]
    InvalidAmount(String),
}
