//! # Domain Errors
//!
//! Every guard failure is a distinguishable variant; nothing is coerced into
//! a generic failure.

use super::value_objects::EscrowStatus;
use shared_types::{Address, Amount, TokenId};
use thiserror::Error;

/// A state-machine guard failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    /// Caller does not own the token offered for sale.
    #[error("Not token owner: {caller} does not own token {token_id}")]
    NotTokenOwner {
        /// Offending caller
        caller: Address,
        /// Token under sale
        token_id: TokenId,
    },

    /// A non-terminal deal already exists for the token.
    #[error("Escrow exists: token {0} already has an active deal")]
    EscrowExists(TokenId),

    /// Buyer and seller must differ.
    #[error("Buyer and seller are the same address: {0}")]
    BuyerIsSeller(Address),

    /// A party failed the KYC check.
    #[error("Not KYC-verified: {address} ({role})")]
    NotVerified {
        /// Unverified address
        address: Address,
        /// "buyer" or "seller"
        role: &'static str,
    },

    /// Price must be strictly positive.
    #[error("Price must be greater than zero")]
    ZeroPrice,

    /// Only the buyer may deposit.
    #[error("Only the buyer may deposit: caller {0} is not the buyer")]
    NotBuyer(Address),

    /// Only the seller may refund.
    #[error("Only the seller may refund: caller {0} is not the seller")]
    NotSeller(Address),

    /// Caller is neither buyer nor seller.
    #[error("Not a party to the deal: {0}")]
    NotParty(Address),

    /// Deposit must equal `price + fee` exactly.
    #[error("Wrong deposit amount: expected {expected}, got {got}")]
    WrongDepositAmount {
        /// `price + fee`
        expected: Amount,
        /// Amount sent
        got: Amount,
    },

    /// Caller cannot cover the required deposit.
    #[error("Insufficient balance: deposit requires {needed}, account holds {available}")]
    InsufficientBalance {
        /// `price + fee`
        needed: Amount,
        /// Caller's balance
        available: Amount,
    },

    /// Cancel is only allowed before funds are deposited.
    #[error("Funds already deposited: cannot cancel token {0}")]
    FundsAlreadyDeposited(TokenId),

    /// The requested transition is not in the state machine.
    #[error("Invalid escrow transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current status
        from: EscrowStatus,
        /// Attempted status
        to: EscrowStatus,
    },
}

/// Escrow engine error types.
#[derive(Debug, Clone, Error)]
pub enum EscrowError {
    /// Malformed input, rejected before any ledger call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A state-machine guard failed.
    #[error(transparent)]
    Guard(#[from] GuardViolation),

    /// No deal exists for the token.
    #[error("Deal not found for token {0}")]
    DealNotFound(TokenId),

    /// Token has never been minted on the ledger.
    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    /// The ledger could not be reached; retry later.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Arithmetic overflow computing fee or total.
    #[error("Amount overflow computing {0}")]
    AmountOverflow(&'static str),

    /// Mirror write failed. Best-effort: never rolls back a ledger commit.
    #[error("Mirror error: {0}")]
    Mirror(String),

    /// Ledger-entry append failed. Best-effort, same policy as `Mirror`.
    #[error("Event sink error: {0}")]
    EventSink(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_exists_message() {
        let err = GuardViolation::EscrowExists(TokenId(7));
        assert!(err.to_string().contains("Escrow exists"));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_wrong_deposit_amount_names_both_values() {
        let err = GuardViolation::WrongDepositAmount {
            expected: Amount::from(1025u64),
            got: Amount::from(1000u64),
        };
        assert!(err.to_string().contains("1025"));
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn test_guard_converts_into_escrow_error() {
        let err: EscrowError = GuardViolation::ZeroPrice.into();
        assert!(matches!(err, EscrowError::Guard(GuardViolation::ZeroPrice)));
    }
}
