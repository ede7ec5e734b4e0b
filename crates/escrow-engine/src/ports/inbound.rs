//! # Inbound Ports
//!
//! API trait defining what the escrow engine can do.

use crate::domain::{CostBreakdown, EscrowDeal, EscrowError, EscrowEvent};
use async_trait::async_trait;
use shared_types::{Address, Amount, TokenId};

/// Escrow API - inbound port. The gateway talks to the engine through this.
#[async_trait]
pub trait EscrowApi: Send + Sync {
    /// Create a deal: caller sells `token_id` to `buyer` at `price`.
    async fn create_escrow(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<EscrowDeal, EscrowError>;

    /// Deposit exactly `price + fee` as the buyer.
    async fn deposit_funds(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: Amount,
    ) -> Result<EscrowDeal, EscrowError>;

    /// Complete a funded deal; either party may trigger it.
    async fn complete_deal(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError>;

    /// Cancel an unfunded deal; either party may trigger it.
    async fn cancel_escrow(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError>;

    /// Refund the buyer of a funded deal; seller only.
    async fn refund_buyer(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError>;

    /// Pre-flight check: run the `create_escrow` guards without submitting.
    /// Returns the full list of violations instead of stopping at the first.
    async fn validate_create(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<Vec<String>, EscrowError>;

    /// Quote price, fee, and total at the current fee rate.
    async fn calculate_cost(&self, price: Amount) -> Result<CostBreakdown, EscrowError>;

    /// Authoritative deal for a token, with the mirror reconciled as a side
    /// effect of the read.
    async fn get_deal(&self, token_id: TokenId) -> Result<Option<EscrowDeal>, EscrowError>;

    /// All deals an address participates in (mirror view).
    async fn deals_for(&self, address: Address) -> Result<Vec<EscrowDeal>, EscrowError>;

    /// Record a client-posted confirmed event into the mirror and ledger
    /// table. Idempotent on transaction hash.
    async fn record_confirmed_event(&self, event: EscrowEvent) -> Result<(), EscrowError>;
}
