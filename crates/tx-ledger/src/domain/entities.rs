//! # Domain Entities
//!
//! One immutable ledger entry per confirmed transaction.

use escrow_engine::{EscrowEvent, EscrowEventKind};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, PropertyId, TokenId, TxHash};
use uuid::Uuid;

/// What kind of transition an entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    /// A deal was created.
    EscrowCreated,
    /// The buyer deposited `price + fee`.
    FundsDeposited,
    /// Ownership transferred, seller paid.
    EscrowCompleted,
    /// Deal closed before funding.
    EscrowCancelled,
    /// Custodied funds returned to the buyer.
    FundsRefunded,
}

impl From<EscrowEventKind> for LedgerEntryType {
    fn from(kind: EscrowEventKind) -> Self {
        match kind {
            EscrowEventKind::Created => Self::EscrowCreated,
            EscrowEventKind::FundsDeposited => Self::FundsDeposited,
            EscrowEventKind::Completed => Self::EscrowCompleted,
            EscrowEventKind::Cancelled => Self::EscrowCancelled,
            EscrowEventKind::Refunded => Self::FundsRefunded,
        }
    }
}

/// Outcome the entry records. Entries are only written after ledger
/// confirmation, so `Confirmed` is the common case; `Failed` exists for
/// posted events that the contract later reported as reverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The transaction committed.
    Confirmed,
    /// The transaction reverted.
    Failed,
}

/// One ledger entry. Immutable once written; unique on `transaction_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Internal entry id.
    pub id: Uuid,
    /// Transition kind.
    pub entry_type: LedgerEntryType,
    /// Paying side of the movement.
    #[serde(rename = "from")]
    pub from_address: Address,
    /// Receiving side of the movement.
    #[serde(rename = "to")]
    pub to_address: Address,
    /// Token the deal is for.
    pub token_id: TokenId,
    /// Property bound to the token, when resolvable at write time.
    pub property_id: Option<PropertyId>,
    /// Value moved (or committed to), in minor units.
    pub value: Amount,
    /// Transaction outcome.
    pub status: EntryStatus,
    /// Deduplication key.
    pub transaction_hash: TxHash,
    /// Ledger timestamp (Unix seconds).
    pub timestamp: u64,
}

impl LedgerEntry {
    /// Build an entry for a confirmed contract event.
    ///
    /// Direction and value follow the money: deposits and refunds carry
    /// `price + fee`, creation and completion carry the price, cancellation
    /// moves nothing.
    pub fn from_event(event: &EscrowEvent, property_id: Option<PropertyId>) -> Self {
        let total = event.price.saturating_add(event.fee);
        let (from_address, to_address, value) = match event.kind {
            EscrowEventKind::Created => (event.seller, event.buyer, event.price),
            EscrowEventKind::FundsDeposited => (event.buyer, event.seller, total),
            EscrowEventKind::Completed => (event.buyer, event.seller, event.price),
            EscrowEventKind::Cancelled => (event.seller, event.buyer, Amount::zero()),
            EscrowEventKind::Refunded => (event.seller, event.buyer, total),
        };
        Self {
            id: Uuid::new_v4(),
            entry_type: event.kind.into(),
            from_address,
            to_address,
            token_id: event.token_id,
            property_id,
            value,
            status: EntryStatus::Confirmed,
            transaction_hash: event.tx_hash,
            timestamp: event.timestamp,
        }
    }

    /// Build an entry for an event whose transaction the contract reported
    /// as reverted. Same shape and dedup key as [`Self::from_event`], but the
    /// recorded value is zero: nothing moved.
    pub fn from_failed_event(event: &EscrowEvent, property_id: Option<PropertyId>) -> Self {
        Self {
            status: EntryStatus::Failed,
            value: Amount::zero(),
            ..Self::from_event(event, property_id)
        }
    }

    /// Whether the address appears on either side of the entry.
    pub fn involves(&self, address: Address) -> bool {
        self.from_address == address || self.to_address == address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn buyer() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    fn event(kind: EscrowEventKind) -> EscrowEvent {
        EscrowEvent {
            kind,
            token_id: TokenId(7),
            buyer: buyer(),
            seller: seller(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            tx_hash: TxHash::new([9u8; 32]),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_deposit_entry_carries_price_plus_fee() {
        let entry = LedgerEntry::from_event(&event(EscrowEventKind::FundsDeposited), None);
        assert_eq!(entry.entry_type, LedgerEntryType::FundsDeposited);
        assert_eq!(entry.from_address, buyer());
        assert_eq!(entry.to_address, seller());
        assert_eq!(entry.value, Amount::from(1_025_000u64));
        assert_eq!(entry.status, EntryStatus::Confirmed);
    }

    #[test]
    fn test_refund_entry_returns_total_to_buyer() {
        let entry = LedgerEntry::from_event(&event(EscrowEventKind::Refunded), None);
        assert_eq!(entry.from_address, seller());
        assert_eq!(entry.to_address, buyer());
        assert_eq!(entry.value, Amount::from(1_025_000u64));
    }

    #[test]
    fn test_cancellation_moves_nothing() {
        let entry = LedgerEntry::from_event(&event(EscrowEventKind::Cancelled), None);
        assert_eq!(entry.value, Amount::zero());
    }

    #[test]
    fn test_failed_entry_records_no_movement() {
        let entry = LedgerEntry::from_failed_event(&event(EscrowEventKind::FundsDeposited), None);
        assert_eq!(entry.status, EntryStatus::Failed);
        assert_eq!(entry.value, Amount::zero());
        assert_eq!(entry.entry_type, LedgerEntryType::FundsDeposited);
        assert_eq!(entry.transaction_hash, TxHash::new([9u8; 32]));
    }

    #[test]
    fn test_involves_either_side() {
        let entry = LedgerEntry::from_event(&event(EscrowEventKind::Completed), None);
        assert!(entry.involves(buyer()));
        assert!(entry.involves(seller()));
        assert!(!entry.involves(Address::ZERO));
    }

    #[test]
    fn test_serde_field_names() {
        let entry = LedgerEntry::from_event(&event(EscrowEventKind::Completed), None);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("from").is_some());
        assert!(json.get("to").is_some());
        assert_eq!(json["entry_type"], "escrow_completed");
    }
}
