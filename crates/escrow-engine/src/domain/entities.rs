//! # Domain Entities
//!
//! The escrow deal as the ledger records it.

use super::errors::{EscrowError, GuardViolation};
use super::value_objects::EscrowStatus;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, TokenId};

/// An escrow deal. The ledger's copy is authoritative; the off-chain mirror
/// converges to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowDeal {
    /// Token under sale; unique per active deal.
    pub token_id: TokenId,
    /// Current owner of the token until completion.
    pub seller: Address,
    /// Counterparty; must differ from the seller.
    pub buyer: Address,
    /// Sale price in minor units.
    pub price: Amount,
    /// Escrow fee, frozen at creation.
    pub fee: Amount,
    /// Current state.
    pub status: EscrowStatus,
    /// True once `price + fee` has been custodied.
    pub funds_deposited: bool,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
}

/// Parameters for creating a deal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealParams {
    /// Token under sale.
    pub token_id: TokenId,
    /// Seller address.
    pub seller: Address,
    /// Buyer address.
    pub buyer: Address,
    /// Sale price.
    pub price: Amount,
    /// Fee computed at creation.
    pub fee: Amount,
    /// Creation timestamp.
    pub created_at: u64,
}

impl EscrowDeal {
    /// Create a new pending deal.
    pub fn new(params: DealParams) -> Self {
        Self {
            token_id: params.token_id,
            seller: params.seller,
            buyer: params.buyer,
            price: params.price,
            fee: params.fee,
            status: EscrowStatus::Pending,
            funds_deposited: false,
            created_at: params.created_at,
        }
    }

    /// The exact amount the buyer must deposit.
    pub fn total(&self) -> Result<Amount, EscrowError> {
        self.price
            .checked_add(self.fee)
            .ok_or(EscrowError::AmountOverflow("total"))
    }

    /// Whether the deal still blocks new deals on the same token.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether the address is buyer or seller.
    pub fn is_party(&self, address: Address) -> bool {
        address == self.buyer || address == self.seller
    }

    /// Transition to a new state, enforcing the state machine.
    pub fn transition_to(&mut self, next: EscrowStatus) -> Result<(), GuardViolation> {
        if !self.status.can_transition_to(next) {
            return Err(GuardViolation::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        if next == EscrowStatus::Funded {
            self.funds_deposited = true;
        }
        self.status = next;
        Ok(())
    }
}
