//! # Contract Events
//!
//! Transition-confirming events emitted by the escrow contract. The mirror
//! and the transaction ledger are driven by these, whether delivered by the
//! background subscription or posted back by a client after confirmation.

use super::value_objects::EscrowStatus;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, TokenId, TxHash};

/// The transition a contract event confirms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowEventKind {
    /// `EscrowCreated`
    Created,
    /// `FundsDeposited`
    FundsDeposited,
    /// `EscrowCompleted`
    Completed,
    /// `EscrowCancelled`
    Cancelled,
    /// `FundsRefunded`
    Refunded,
}

impl EscrowEventKind {
    /// The status a deal holds after this event.
    pub fn resulting_status(&self) -> EscrowStatus {
        match self {
            Self::Created => EscrowStatus::Pending,
            Self::FundsDeposited => EscrowStatus::Funded,
            Self::Completed => EscrowStatus::Completed,
            Self::Cancelled => EscrowStatus::Cancelled,
            Self::Refunded => EscrowStatus::Refunded,
        }
    }
}

/// A confirmed contract event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEvent {
    /// Which transition was confirmed.
    pub kind: EscrowEventKind,
    /// Token the deal is for.
    pub token_id: TokenId,
    /// Deal buyer.
    pub buyer: Address,
    /// Deal seller.
    pub seller: Address,
    /// Sale price in minor units.
    pub price: Amount,
    /// Frozen fee in minor units.
    pub fee: Amount,
    /// Hash of the confirming transaction; deduplication key.
    pub tx_hash: TxHash,
    /// Ledger timestamp of the confirmation (Unix seconds).
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resulting_status_covers_machine() {
        assert_eq!(
            EscrowEventKind::Created.resulting_status(),
            EscrowStatus::Pending
        );
        assert_eq!(
            EscrowEventKind::FundsDeposited.resulting_status(),
            EscrowStatus::Funded
        );
        assert!(EscrowEventKind::Completed.resulting_status().is_terminal());
        assert!(EscrowEventKind::Cancelled.resulting_status().is_terminal());
        assert!(EscrowEventKind::Refunded.resulting_status().is_terminal());
    }

    #[test]
    fn test_kind_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&EscrowEventKind::FundsDeposited).unwrap(),
            "\"funds_deposited\""
        );
    }
}
