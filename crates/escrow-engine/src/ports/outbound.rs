//! # Outbound Ports
//!
//! Traits for the external escrow contract, the off-chain mirror, and the
//! transaction ledger.

use crate::domain::{EscrowDeal, EscrowError, EscrowEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, TokenId, TxHash};

/// Handle for a submitted but unconfirmed ledger transaction.
///
/// Submission and confirmation are separate steps so a slow network never
/// stalls the gateway: callers hold the handle and await confirmation.
/// Once submitted, a transaction cannot be cancelled client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTx {
    /// Hash assigned at submission.
    pub tx_hash: TxHash,
    /// Submission timestamp (Unix seconds).
    pub submitted_at: u64,
}

/// Receipt for a confirmed ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Confirmation timestamp (Unix seconds).
    pub confirmed_at: u64,
}

/// Escrow contract client - outbound port.
///
/// The contract is consumed, never reimplemented: it serializes concurrent
/// transitions per token and re-checks every guard at commit time. All
/// mutating calls return a [`PendingTx`]; [`EscrowLedger::confirm`] awaits
/// commitment.
#[async_trait]
pub trait EscrowLedger: Send + Sync {
    /// Submit `createEscrow(tokenId, buyer, price)`.
    async fn submit_create(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<PendingTx, EscrowError>;

    /// Submit `depositFunds(tokenId)` carrying `amount`.
    async fn submit_deposit(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: Amount,
    ) -> Result<PendingTx, EscrowError>;

    /// Submit `completeDeal(tokenId)`.
    async fn submit_complete(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError>;

    /// Submit `cancelEscrow(tokenId)`.
    async fn submit_cancel(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError>;

    /// Submit `refundBuyer(tokenId)`.
    async fn submit_refund(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError>;

    /// Await commitment of a submitted transaction.
    async fn confirm(&self, pending: &PendingTx) -> Result<TxReceipt, EscrowError>;

    /// `getDeal(tokenId)`: the authoritative deal, if any ever existed.
    async fn get_deal(&self, token_id: TokenId) -> Result<Option<EscrowDeal>, EscrowError>;

    /// Current owner of a token.
    async fn owner_of(&self, token_id: TokenId) -> Result<Address, EscrowError>;

    /// Current fee rate in basis points. Applied only to new deals.
    async fn fee_bps(&self) -> Result<u32, EscrowError>;

    /// Current fee recipient.
    async fn fee_recipient(&self) -> Result<Address, EscrowError>;

    /// `updateFeePercent`: set the rate for future deals.
    async fn update_fee_bps(&self, fee_bps: u32) -> Result<(), EscrowError>;

    /// `updateFeeRecipient`: set the recipient for future completions.
    async fn update_fee_recipient(&self, recipient: Address) -> Result<(), EscrowError>;
}

/// Off-chain mirror - outbound port.
///
/// Mirror writes are best-effort relative to the ledger commit: a failure
/// here is logged, never rolled back into the primary state change.
#[async_trait]
pub trait DealMirror: Send + Sync {
    /// Apply a confirmed transition: append (or finalize) a history entry
    /// and update the summary fields atomically with it.
    async fn apply_event(&self, event: &EscrowEvent) -> Result<(), EscrowError>;

    /// Correct the mirror from the authoritative deal after a read found a
    /// mismatch. `deal` is `None` when the ledger knows no deal at all.
    async fn reconcile(
        &self,
        token_id: TokenId,
        deal: Option<&EscrowDeal>,
    ) -> Result<(), EscrowError>;

    /// Mirror view of the deals an address participates in.
    async fn deals_for(&self, address: Address) -> Result<Vec<EscrowDeal>, EscrowError>;
}

/// Transaction-ledger append - outbound port.
///
/// Implementations deduplicate on transaction hash: recording the same hash
/// twice is a no-op returning `Ok`.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append one entry for a confirmed event.
    async fn record(&self, event: &EscrowEvent) -> Result<(), EscrowError>;
}

/// Contract event subscription - outbound port.
///
/// At-least-once delivery; consumers must be idempotent.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Next event, or `None` when the stream is closed.
    async fn next_event(&self) -> Option<EscrowEvent>;
}
