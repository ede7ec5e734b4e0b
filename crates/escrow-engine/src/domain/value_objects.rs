//! # Domain Value Objects
//!
//! The escrow deal state machine.

use serde::{Deserialize, Serialize};

/// Escrow deal state machine.
///
/// `Pending` and `Funded` are the only non-terminal states; at most one deal
/// per token may sit in either of them at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EscrowStatus {
    /// Deal created; awaiting the buyer's deposit.
    #[default]
    Pending,
    /// Exact `price + fee` custodied by the contract.
    Funded,
    /// Ownership transferred, seller and fee recipient paid.
    Completed,
    /// Closed before funding; no funds ever moved.
    Cancelled,
    /// Buyer made whole with `price + fee`; no ownership transfer.
    Refunded,
}

impl EscrowStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: EscrowStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Funded) => true,
            (Self::Pending, Self::Cancelled) => true,
            (Self::Funded, Self::Completed) => true,
            (Self::Funded, Self::Refunded) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }

    /// Whether funds were custodied at some point on the way to this state.
    pub fn reached_funding(&self) -> bool {
        matches!(self, Self::Funded | Self::Completed | Self::Refunded)
    }
}
