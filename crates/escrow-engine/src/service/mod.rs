//! # Escrow Service
//!
//! Orchestrates one sale across the contract, the KYC gate, the mirror, and
//! the transaction ledger. Every invariant lives here or in `domain`; the
//! HTTP layer above owns none.

mod listener;

pub use listener::spawn_event_listener;

use crate::domain::{
    guard_cancel, guard_complete, guard_create, guard_deposit, guard_no_active_deal,
    guard_refund, guard_token_owner, CostBreakdown, EscrowDeal, EscrowError, EscrowEvent,
    EscrowEventKind, GuardViolation,
};
use crate::ports::inbound::EscrowApi;
use crate::ports::outbound::{DealMirror, EscrowLedger, EventSink, TxReceipt};
use async_trait::async_trait;
use kyc_gate::KycGate;
use shared_types::{Address, Amount, TokenId};
use std::sync::Arc;
use tracing::{info, warn};

/// The escrow engine service.
pub struct EscrowService {
    ledger: Arc<dyn EscrowLedger>,
    kyc: Arc<KycGate>,
    mirror: Arc<dyn DealMirror>,
    sink: Arc<dyn EventSink>,
}

impl EscrowService {
    /// Wire the service over its collaborators.
    pub fn new(
        ledger: Arc<dyn EscrowLedger>,
        kyc: Arc<KycGate>,
        mirror: Arc<dyn DealMirror>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            ledger,
            kyc,
            mirror,
            sink,
        }
    }

    /// Authoritative KYC check; a gate error denies (fail closed).
    async fn require_verified(&self, address: Address, role: &'static str) -> Result<(), EscrowError> {
        let verified = self
            .kyc
            .is_verified(address)
            .await
            .map_err(|e| EscrowError::LedgerUnavailable(e.to_string()))?;
        if !verified {
            return Err(GuardViolation::NotVerified { address, role }.into());
        }
        Ok(())
    }

    async fn required_deal(&self, token_id: TokenId) -> Result<EscrowDeal, EscrowError> {
        self.ledger
            .get_deal(token_id)
            .await?
            .ok_or(EscrowError::DealNotFound(token_id))
    }

    /// Apply a confirmed transition to the mirror and ledger table.
    ///
    /// Both writes are best-effort relative to the already-committed ledger
    /// transition: failures are logged, never propagated, never rolled back.
    async fn fan_out(&self, deal: &EscrowDeal, kind: EscrowEventKind, receipt: &TxReceipt) {
        let event = EscrowEvent {
            kind,
            token_id: deal.token_id,
            buyer: deal.buyer,
            seller: deal.seller,
            price: deal.price,
            fee: deal.fee,
            tx_hash: receipt.tx_hash,
            timestamp: receipt.confirmed_at,
        };
        if let Err(e) = self.mirror.apply_event(&event).await {
            warn!(token_id = %deal.token_id, tx_hash = %event.tx_hash, error = %e,
                "Mirror write failed after ledger commit; will reconcile on next read");
        }
        if let Err(e) = self.sink.record(&event).await {
            warn!(token_id = %deal.token_id, tx_hash = %event.tx_hash, error = %e,
                "Ledger-entry append failed; entry lost until event replay");
        }
    }

    /// Submit, confirm, re-read the deal, fan out.
    async fn commit(
        &self,
        token_id: TokenId,
        kind: EscrowEventKind,
        pending: crate::ports::outbound::PendingTx,
    ) -> Result<EscrowDeal, EscrowError> {
        let receipt = self.ledger.confirm(&pending).await?;
        let deal = self.required_deal(token_id).await?;
        info!(token_id = %token_id, status = ?deal.status, tx_hash = %receipt.tx_hash,
            "Escrow transition confirmed");
        self.fan_out(&deal, kind, &receipt).await;
        Ok(deal)
    }
}

#[async_trait]
impl EscrowApi for EscrowService {
    async fn create_escrow(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<EscrowDeal, EscrowError> {
        guard_create(caller, buyer, price)?;
        let owner = self.ledger.owner_of(token_id).await?;
        guard_token_owner(owner, caller, token_id)?;
        let existing = self.ledger.get_deal(token_id).await?;
        guard_no_active_deal(existing.as_ref(), token_id)?;
        self.require_verified(caller, "seller").await?;
        self.require_verified(buyer, "buyer").await?;

        let pending = self
            .ledger
            .submit_create(caller, token_id, buyer, price)
            .await?;
        self.commit(token_id, EscrowEventKind::Created, pending).await
    }

    async fn deposit_funds(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: Amount,
    ) -> Result<EscrowDeal, EscrowError> {
        let deal = self.required_deal(token_id).await?;
        let total = deal.total()?;
        guard_deposit(&deal, caller, amount, total)?;

        let pending = self.ledger.submit_deposit(caller, token_id, amount).await?;
        self.commit(token_id, EscrowEventKind::FundsDeposited, pending)
            .await
    }

    async fn complete_deal(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError> {
        // Always re-read from the ledger: if the mirror disagrees on
        // funds_deposited, the ledger wins.
        let deal = self.required_deal(token_id).await?;
        guard_complete(&deal, caller)?;
        // Both parties must still pass KYC at completion time, even if they
        // were verified at creation.
        self.require_verified(deal.buyer, "buyer").await?;
        self.require_verified(deal.seller, "seller").await?;

        let pending = self.ledger.submit_complete(caller, token_id).await?;
        self.commit(token_id, EscrowEventKind::Completed, pending).await
    }

    async fn cancel_escrow(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError> {
        let deal = self.required_deal(token_id).await?;
        guard_cancel(&deal, caller)?;

        let pending = self.ledger.submit_cancel(caller, token_id).await?;
        self.commit(token_id, EscrowEventKind::Cancelled, pending).await
    }

    async fn refund_buyer(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<EscrowDeal, EscrowError> {
        let deal = self.required_deal(token_id).await?;
        guard_refund(&deal, caller)?;

        let pending = self.ledger.submit_refund(caller, token_id).await?;
        self.commit(token_id, EscrowEventKind::Refunded, pending).await
    }

    async fn validate_create(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<Vec<String>, EscrowError> {
        let mut errors = Vec::new();

        if let Err(e) = guard_create(caller, buyer, price) {
            errors.push(e.to_string());
        }
        match self.ledger.owner_of(token_id).await {
            Ok(owner) => {
                if let Err(e) = guard_token_owner(owner, caller, token_id) {
                    errors.push(e.to_string());
                }
            }
            Err(EscrowError::TokenNotFound(_)) => {
                errors.push(format!("Token not found: {}", token_id));
            }
            Err(e) => return Err(e),
        }
        let existing = self.ledger.get_deal(token_id).await?;
        if let Err(e) = guard_no_active_deal(existing.as_ref(), token_id) {
            errors.push(e.to_string());
        }
        for (address, role) in [(caller, "seller"), (buyer, "buyer")] {
            match self.require_verified(address, role).await {
                Ok(()) => {}
                Err(EscrowError::Guard(e)) => errors.push(e.to_string()),
                Err(e) => return Err(e),
            }
        }

        Ok(errors)
    }

    async fn calculate_cost(&self, price: Amount) -> Result<CostBreakdown, EscrowError> {
        if price.is_zero() {
            return Err(GuardViolation::ZeroPrice.into());
        }
        let fee_bps = self.ledger.fee_bps().await?;
        CostBreakdown::quote(price, fee_bps)
    }

    async fn get_deal(&self, token_id: TokenId) -> Result<Option<EscrowDeal>, EscrowError> {
        let deal = self.ledger.get_deal(token_id).await?;
        // Reads converge the mirror; failures here never fail the read.
        if let Err(e) = self.mirror.reconcile(token_id, deal.as_ref()).await {
            warn!(token_id = %token_id, error = %e, "Mirror reconciliation failed");
        }
        Ok(deal)
    }

    async fn deals_for(&self, address: Address) -> Result<Vec<EscrowDeal>, EscrowError> {
        self.mirror.deals_for(address).await
    }

    async fn record_confirmed_event(&self, event: EscrowEvent) -> Result<(), EscrowError> {
        // The mirror is the primary write here; the ledger-table append is
        // best-effort and must not roll it back.
        self.mirror.apply_event(&event).await?;
        if let Err(e) = self.sink.record(&event).await {
            warn!(token_id = %event.token_id, tx_hash = %event.tx_hash, error = %e,
                "Ledger-entry append failed for posted event");
        }
        Ok(())
    }
}
