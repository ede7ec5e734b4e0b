//! # Domain Entities
//!
//! The property record with its embedded escrow mirror and sale metrics.

use super::errors::PropertyError;
use escrow_engine::{EscrowEvent, EscrowEventKind, EscrowStatus};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, OwnerId, PropertyId, TokenId, TxHash};

/// Listing lifecycle of a property record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyStatus {
    /// Submitted, awaiting admin review.
    Pending,
    /// Approved for minting.
    Approved,
    /// Rejected by review.
    Rejected,
    /// Minted on chain; carries a token id. One-way.
    Minted,
}

impl PropertyStatus {
    /// Whether the listing may move to `next`.
    pub fn can_transition_to(&self, next: PropertyStatus) -> bool {
        matches!(
            (self, next),
            (PropertyStatus::Pending, PropertyStatus::Approved)
                | (PropertyStatus::Pending, PropertyStatus::Rejected)
                | (PropertyStatus::Approved, PropertyStatus::Minted)
        )
    }
}

/// One escrow deal as the mirror remembers it.
///
/// Entries are append-only; only the latest entry for a property may have its
/// `status`, `completed_at`, and `latest_tx` updated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowHistoryEntry {
    /// Last status this entry was finalized to.
    pub status: EscrowStatus,
    /// Deal buyer.
    pub buyer: Address,
    /// Deal seller.
    pub seller: Address,
    /// Sale price in minor units.
    pub price: Amount,
    /// Frozen fee in minor units.
    pub fee: Amount,
    /// Ledger timestamp of the creation.
    pub created_at: u64,
    /// Ledger timestamp of the terminal transition, if reached.
    pub completed_at: Option<u64>,
    /// Hash of the creating transaction.
    pub creation_tx: TxHash,
    /// Hash of the most recent transaction applied to this entry.
    pub latest_tx: TxHash,
}

/// Whether applying an event changed the mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorApply {
    /// The mirror was updated.
    Applied,
    /// The event had already been applied (same transaction hash).
    Duplicate,
}

/// The escrow mirror kept on a property: summary fields plus history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowInfo {
    /// Whether a non-terminal deal exists for the property's token.
    pub has_active_escrow: bool,
    /// Status of the current (or most recent) deal.
    pub current_status: Option<EscrowStatus>,
    /// Buyer of the current deal.
    pub buyer: Option<Address>,
    /// Seller of the current deal.
    pub seller: Option<Address>,
    /// Price of the current deal.
    pub price: Option<Amount>,
    /// Fee of the current deal.
    pub fee: Option<Amount>,
    /// Append-only deal history.
    pub history: Vec<EscrowHistoryEntry>,
}

impl EscrowInfo {
    /// Apply a confirmed contract event: append a new entry for `Created`,
    /// finalize the latest entry otherwise. Idempotent on transaction hash.
    pub fn apply_event(&mut self, event: &EscrowEvent) -> Result<MirrorApply, PropertyError> {
        if event.kind == EscrowEventKind::Created {
            if self
                .history
                .last()
                .map(|e| e.creation_tx == event.tx_hash)
                .unwrap_or(false)
            {
                return Ok(MirrorApply::Duplicate);
            }
            self.history.push(EscrowHistoryEntry {
                status: EscrowStatus::Pending,
                buyer: event.buyer,
                seller: event.seller,
                price: event.price,
                fee: event.fee,
                created_at: event.timestamp,
                completed_at: None,
                creation_tx: event.tx_hash,
                latest_tx: event.tx_hash,
            });
            self.refresh_summary();
            return Ok(MirrorApply::Applied);
        }

        let next = event.kind.resulting_status();
        let entry = self
            .history
            .last_mut()
            .ok_or(PropertyError::NoOpenEscrow(event.token_id))?;
        if entry.latest_tx == event.tx_hash && entry.status == next {
            return Ok(MirrorApply::Duplicate);
        }
        if !entry.status.can_transition_to(next) {
            // Replays of an already-finalized transition are tolerated; a
            // genuinely conflicting one is not.
            if entry.status == next {
                return Ok(MirrorApply::Duplicate);
            }
            return Err(PropertyError::NoOpenEscrow(event.token_id));
        }
        entry.status = next;
        entry.latest_tx = event.tx_hash;
        if next.is_terminal() {
            entry.completed_at = Some(event.timestamp);
        }
        self.refresh_summary();
        Ok(MirrorApply::Applied)
    }

    /// Rewrite the summary fields from the latest history entry.
    pub fn refresh_summary(&mut self) {
        match self.history.last() {
            Some(entry) => {
                self.has_active_escrow = !entry.status.is_terminal();
                self.current_status = Some(entry.status);
                self.buyer = Some(entry.buyer);
                self.seller = Some(entry.seller);
                self.price = Some(entry.price);
                self.fee = Some(entry.fee);
            }
            None => *self = EscrowInfo::default(),
        }
    }
}

/// Lifetime sale metrics of a property, bumped exactly once per completion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleMetrics {
    /// Number of completed sales.
    pub total_sales: u64,
    /// Sum of completed sale prices (fees excluded), in minor units.
    pub total_volume: Amount,
}

impl SaleMetrics {
    /// Record one completed sale at `price`.
    pub fn record_sale(&mut self, price: Amount) {
        self.total_sales += 1;
        self.total_volume = self.total_volume.saturating_add(price);
    }

    /// Average completed sale price, truncating. Zero before the first sale.
    pub fn average_sale_price(&self) -> Amount {
        if self.total_sales == 0 {
            return Amount::zero();
        }
        self.total_volume / Amount::from(self.total_sales)
    }
}

/// A property record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Registry identifier, assigned at submission.
    pub property_id: PropertyId,
    /// Canonical owner identity.
    pub owner: OwnerId,
    /// Listing title.
    pub name: String,
    /// Image URIs.
    pub images: Vec<String>,
    /// Listing lifecycle status.
    pub status: PropertyStatus,
    /// On-chain token, present once minted.
    pub token_id: Option<TokenId>,
    /// Escrow mirror for the minted token.
    pub escrow: EscrowInfo,
    /// Lifetime sale metrics.
    pub metrics: SaleMetrics,
    /// Submission timestamp (Unix seconds).
    pub submitted_at: u64,
}

impl Property {
    /// Create a pending listing.
    pub fn new(
        property_id: PropertyId,
        owner: OwnerId,
        name: String,
        images: Vec<String>,
        submitted_at: u64,
    ) -> Self {
        Self {
            property_id,
            owner,
            name,
            images,
            status: PropertyStatus::Pending,
            token_id: None,
            escrow: EscrowInfo::default(),
            metrics: SaleMetrics::default(),
            submitted_at,
        }
    }

    /// Apply an admin review decision (`Approved` or `Rejected`).
    pub fn review(&mut self, decision: PropertyStatus) -> Result<(), PropertyError> {
        if !self.status.can_transition_to(decision) {
            return Err(PropertyError::InvalidStatusTransition {
                from: self.status,
                to: decision,
            });
        }
        self.status = decision;
        Ok(())
    }

    /// Mint the property: one-way, binds the token id.
    pub fn mint(&mut self, token_id: TokenId) -> Result<(), PropertyError> {
        if !self.status.can_transition_to(PropertyStatus::Minted) {
            return Err(PropertyError::InvalidStatusTransition {
                from: self.status,
                to: PropertyStatus::Minted,
            });
        }
        self.status = PropertyStatus::Minted;
        self.token_id = Some(token_id);
        Ok(())
    }
}
