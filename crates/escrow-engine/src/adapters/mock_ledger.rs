//! # Mock Escrow Ledger
//!
//! An in-memory contract for tests and local development. It mimics the real
//! contract's behavior: guards re-checked at commit time, per-token
//! serialization, account balances, and escrow custody, with the
//! submit/confirm split the production client exposes.

use crate::domain::{
    DealParams, EscrowDeal, EscrowError, EscrowEvent, EscrowEventKind, EscrowStatus,
    GuardViolation,
};
use crate::ports::outbound::{EscrowLedger, EventSource, PendingTx, TxReceipt};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{unix_now, Address, Amount, TokenId, TxHash};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Default fee rate: 250 bps (2.5%).
pub const DEFAULT_FEE_BPS: u32 = 250;

#[derive(Clone, Debug)]
enum StagedOp {
    Create {
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    },
    Deposit {
        caller: Address,
        token_id: TokenId,
        amount: Amount,
    },
    Complete {
        caller: Address,
        token_id: TokenId,
    },
    Cancel {
        caller: Address,
        token_id: TokenId,
    },
    Refund {
        caller: Address,
        token_id: TokenId,
    },
}

struct Inner {
    deals: HashMap<TokenId, EscrowDeal>,
    owners: HashMap<TokenId, Address>,
    balances: HashMap<Address, Amount>,
    /// Funds custodied by the contract, per token.
    custody: HashMap<TokenId, Amount>,
    staged: HashMap<TxHash, StagedOp>,
    fee_bps: u32,
    fee_recipient: Address,
    next_nonce: u64,
    unreachable: bool,
}

/// In-memory escrow contract.
pub struct MockEscrowLedger {
    inner: Mutex<Inner>,
    events: mpsc::UnboundedSender<EscrowEvent>,
    /// Kept so the mock works without any subscriber attached.
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<EscrowEvent>>>,
}

impl Default for MockEscrowLedger {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_BPS, Address::ZERO)
    }
}

impl MockEscrowLedger {
    /// Create a contract with the given fee configuration.
    pub fn new(fee_bps: u32, fee_recipient: Address) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Mutex::new(Inner {
                deals: HashMap::new(),
                owners: HashMap::new(),
                balances: HashMap::new(),
                custody: HashMap::new(),
                staged: HashMap::new(),
                fee_bps,
                fee_recipient,
                next_nonce: 0,
                unreachable: false,
            }),
            events: tx,
            events_rx: Mutex::new(Some(rx)),
        }
    }

    /// Take the event stream. Yields each confirmed transition once.
    pub fn take_event_source(&self) -> Option<ChannelEventSource> {
        self.events_rx.lock().take().map(|rx| ChannelEventSource {
            rx: tokio::sync::Mutex::new(rx),
        })
    }

    /// Mint a token to an owner (test setup).
    pub fn mint(&self, token_id: TokenId, owner: Address) {
        self.inner.lock().owners.insert(token_id, owner);
    }

    /// Credit an account balance (test setup).
    pub fn credit(&self, address: Address, amount: Amount) {
        let mut inner = self.inner.lock();
        let balance = inner.balances.entry(address).or_insert_with(Amount::zero);
        *balance = balance.saturating_add(amount);
    }

    /// Current balance of an account.
    pub fn balance_of(&self, address: Address) -> Amount {
        self.inner
            .lock()
            .balances
            .get(&address)
            .copied()
            .unwrap_or_else(Amount::zero)
    }

    /// Simulate a network outage: every call fails until cleared.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unreachable = unreachable;
    }

    fn check_reachable(inner: &Inner) -> Result<(), EscrowError> {
        if inner.unreachable {
            return Err(EscrowError::LedgerUnavailable(
                "mock ledger offline".to_string(),
            ));
        }
        Ok(())
    }

    fn stage(&self, op: StagedOp) -> Result<PendingTx, EscrowError> {
        let mut inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        inner.next_nonce += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&inner.next_nonce.to_be_bytes());
        let tx_hash = TxHash::new(bytes);
        inner.staged.insert(tx_hash, op);
        Ok(PendingTx {
            tx_hash,
            submitted_at: unix_now(),
        })
    }

    /// Commit a staged operation. Guards are enforced here, at commit time,
    /// under the single lock that serializes all transitions.
    fn commit(&self, tx_hash: TxHash) -> Result<(TxReceipt, EscrowEvent), EscrowError> {
        let mut inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        let op = inner
            .staged
            .remove(&tx_hash)
            .ok_or_else(|| EscrowError::LedgerUnavailable("unknown pending tx".to_string()))?;

        let now = unix_now();
        let event = match op {
            StagedOp::Create {
                caller,
                token_id,
                buyer,
                price,
            } => {
                let owner = *inner
                    .owners
                    .get(&token_id)
                    .ok_or(EscrowError::TokenNotFound(token_id))?;
                if owner != caller {
                    return Err(GuardViolation::NotTokenOwner { caller, token_id }.into());
                }
                if inner.deals.get(&token_id).map(|d| d.is_active()).unwrap_or(false) {
                    return Err(GuardViolation::EscrowExists(token_id).into());
                }
                if buyer == caller {
                    return Err(GuardViolation::BuyerIsSeller(buyer).into());
                }
                if price.is_zero() {
                    return Err(GuardViolation::ZeroPrice.into());
                }
                let fee = crate::domain::compute_fee(price, inner.fee_bps)?;
                let deal = EscrowDeal::new(DealParams {
                    token_id,
                    seller: caller,
                    buyer,
                    price,
                    fee,
                    created_at: now,
                });
                inner.deals.insert(token_id, deal.clone());
                Self::event_for(&deal, EscrowEventKind::Created, tx_hash, now)
            }
            StagedOp::Deposit {
                caller,
                token_id,
                amount,
            } => {
                let deal = inner
                    .deals
                    .get(&token_id)
                    .cloned()
                    .ok_or(EscrowError::DealNotFound(token_id))?;
                let total = deal.total()?;
                crate::domain::guard_deposit(&deal, caller, amount, total)?;
                let balance = inner
                    .balances
                    .get(&caller)
                    .copied()
                    .unwrap_or_else(Amount::zero);
                if balance < amount {
                    return Err(GuardViolation::InsufficientBalance {
                        needed: amount,
                        available: balance,
                    }
                    .into());
                }
                inner.balances.insert(caller, balance - amount);
                inner.custody.insert(token_id, amount);
                let deal = inner.deals.get_mut(&token_id).expect("checked above");
                deal.transition_to(EscrowStatus::Funded)?;
                let deal = deal.clone();
                Self::event_for(&deal, EscrowEventKind::FundsDeposited, tx_hash, now)
            }
            StagedOp::Complete { caller, token_id } => {
                let deal = inner
                    .deals
                    .get(&token_id)
                    .cloned()
                    .ok_or(EscrowError::DealNotFound(token_id))?;
                crate::domain::guard_complete(&deal, caller)?;
                let custodied = inner
                    .custody
                    .remove(&token_id)
                    .unwrap_or_else(Amount::zero);
                // Price to the seller, fee to the fee recipient.
                let seller_balance = inner
                    .balances
                    .entry(deal.seller)
                    .or_insert_with(Amount::zero);
                *seller_balance = seller_balance.saturating_add(deal.price);
                let recipient = inner.fee_recipient;
                let fee_balance = inner.balances.entry(recipient).or_insert_with(Amount::zero);
                *fee_balance = fee_balance.saturating_add(custodied.saturating_sub(deal.price));
                inner.owners.insert(token_id, deal.buyer);
                let deal = inner.deals.get_mut(&token_id).expect("checked above");
                deal.transition_to(EscrowStatus::Completed)?;
                let deal = deal.clone();
                Self::event_for(&deal, EscrowEventKind::Completed, tx_hash, now)
            }
            StagedOp::Cancel { caller, token_id } => {
                let deal = inner
                    .deals
                    .get(&token_id)
                    .cloned()
                    .ok_or(EscrowError::DealNotFound(token_id))?;
                crate::domain::guard_cancel(&deal, caller)?;
                let deal = inner.deals.get_mut(&token_id).expect("checked above");
                deal.transition_to(EscrowStatus::Cancelled)?;
                let deal = deal.clone();
                Self::event_for(&deal, EscrowEventKind::Cancelled, tx_hash, now)
            }
            StagedOp::Refund { caller, token_id } => {
                let deal = inner
                    .deals
                    .get(&token_id)
                    .cloned()
                    .ok_or(EscrowError::DealNotFound(token_id))?;
                crate::domain::guard_refund(&deal, caller)?;
                let custodied = inner
                    .custody
                    .remove(&token_id)
                    .unwrap_or_else(Amount::zero);
                let buyer_balance = inner
                    .balances
                    .entry(deal.buyer)
                    .or_insert_with(Amount::zero);
                *buyer_balance = buyer_balance.saturating_add(custodied);
                let deal = inner.deals.get_mut(&token_id).expect("checked above");
                deal.transition_to(EscrowStatus::Refunded)?;
                let deal = deal.clone();
                Self::event_for(&deal, EscrowEventKind::Refunded, tx_hash, now)
            }
        };

        // Subscribers may be gone; events are fire-and-forget.
        let _ = self.events.send(event.clone());

        Ok((
            TxReceipt {
                tx_hash,
                confirmed_at: now,
            },
            event,
        ))
    }

    fn event_for(
        deal: &EscrowDeal,
        kind: EscrowEventKind,
        tx_hash: TxHash,
        timestamp: u64,
    ) -> EscrowEvent {
        EscrowEvent {
            kind,
            token_id: deal.token_id,
            buyer: deal.buyer,
            seller: deal.seller,
            price: deal.price,
            fee: deal.fee,
            tx_hash,
            timestamp,
        }
    }
}

#[async_trait]
impl EscrowLedger for MockEscrowLedger {
    async fn submit_create(
        &self,
        caller: Address,
        token_id: TokenId,
        buyer: Address,
        price: Amount,
    ) -> Result<PendingTx, EscrowError> {
        self.stage(StagedOp::Create {
            caller,
            token_id,
            buyer,
            price,
        })
    }

    async fn submit_deposit(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: Amount,
    ) -> Result<PendingTx, EscrowError> {
        self.stage(StagedOp::Deposit {
            caller,
            token_id,
            amount,
        })
    }

    async fn submit_complete(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError> {
        self.stage(StagedOp::Complete { caller, token_id })
    }

    async fn submit_cancel(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError> {
        self.stage(StagedOp::Cancel { caller, token_id })
    }

    async fn submit_refund(
        &self,
        caller: Address,
        token_id: TokenId,
    ) -> Result<PendingTx, EscrowError> {
        self.stage(StagedOp::Refund { caller, token_id })
    }

    async fn confirm(&self, pending: &PendingTx) -> Result<TxReceipt, EscrowError> {
        self.commit(pending.tx_hash).map(|(receipt, _)| receipt)
    }

    async fn get_deal(&self, token_id: TokenId) -> Result<Option<EscrowDeal>, EscrowError> {
        let inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        Ok(inner.deals.get(&token_id).cloned())
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<Address, EscrowError> {
        let inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        inner
            .owners
            .get(&token_id)
            .copied()
            .ok_or(EscrowError::TokenNotFound(token_id))
    }

    async fn fee_bps(&self) -> Result<u32, EscrowError> {
        let inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        Ok(inner.fee_bps)
    }

    async fn fee_recipient(&self) -> Result<Address, EscrowError> {
        let inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        Ok(inner.fee_recipient)
    }

    async fn update_fee_bps(&self, fee_bps: u32) -> Result<(), EscrowError> {
        let mut inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        inner.fee_bps = fee_bps;
        Ok(())
    }

    async fn update_fee_recipient(&self, recipient: Address) -> Result<(), EscrowError> {
        let mut inner = self.inner.lock();
        Self::check_reachable(&inner)?;
        inner.fee_recipient = recipient;
        Ok(())
    }
}

/// Event source backed by the mock contract's channel.
pub struct ChannelEventSource {
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<EscrowEvent>>,
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&self) -> Option<EscrowEvent> {
        // Receiver is only polled by the single listener task.
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}
