//! # Response Views
//!
//! Outbound DTOs. Monetary amounts leave the gateway as base-10 strings;
//! the hexadecimal serde encoding of `U256` never crosses the REST boundary.

use escrow_engine::{CostBreakdown, EscrowDeal, EscrowStatus};
use kyc_gate::UserRecord;
use property_registry::{EscrowHistoryEntry, EscrowInfo, Property, PropertyStatus, SaleMetrics};
use serde::Serialize;
use shared_types::{Address, OwnerId, TxHash};
use tx_ledger::{EntryStatus, LedgerEntry, LedgerEntryType};

/// One escrow deal.
#[derive(Debug, Serialize)]
pub struct DealView {
    /// Token under sale.
    pub token_id: u64,
    /// Selling party.
    pub seller: Address,
    /// Buying party.
    pub buyer: Address,
    /// Sale price, decimal minor units.
    pub price: String,
    /// Frozen fee, decimal minor units.
    pub fee: String,
    /// `price + fee`, decimal minor units.
    pub total: String,
    /// Current status.
    pub status: EscrowStatus,
    /// Whether the deposit has been custodied.
    pub funds_deposited: bool,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
}

impl From<&EscrowDeal> for DealView {
    fn from(deal: &EscrowDeal) -> Self {
        Self {
            token_id: deal.token_id.0,
            seller: deal.seller,
            buyer: deal.buyer,
            price: deal.price.to_string(),
            fee: deal.fee.to_string(),
            total: deal.price.saturating_add(deal.fee).to_string(),
            status: deal.status,
            funds_deposited: deal.funds_deposited,
            created_at: deal.created_at,
        }
    }
}

/// Cost quote at the current fee rate.
#[derive(Debug, Serialize)]
pub struct CostView {
    /// Sale price, decimal minor units.
    pub price: String,
    /// Fee at the current rate, decimal minor units.
    pub fee: String,
    /// Exact amount the buyer must deposit.
    pub total: String,
}

impl From<&CostBreakdown> for CostView {
    fn from(quote: &CostBreakdown) -> Self {
        Self {
            price: quote.price.to_string(),
            fee: quote.fee.to_string(),
            total: quote.total.to_string(),
        }
    }
}

/// Pre-flight validation outcome.
#[derive(Debug, Serialize)]
pub struct ValidationView {
    /// Whether every create guard passed.
    pub is_valid: bool,
    /// Violation messages, empty when valid.
    pub errors: Vec<String>,
}

/// Sale metrics with the derived average.
#[derive(Debug, Serialize)]
pub struct MetricsView {
    /// Completed sales.
    pub total_sales: u64,
    /// Lifetime volume, decimal minor units.
    pub total_volume: String,
    /// Truncating average sale price, decimal minor units.
    pub average_sale_price: String,
}

impl From<&SaleMetrics> for MetricsView {
    fn from(metrics: &SaleMetrics) -> Self {
        Self {
            total_sales: metrics.total_sales,
            total_volume: metrics.total_volume.to_string(),
            average_sale_price: metrics.average_sale_price().to_string(),
        }
    }
}

/// One mirror history entry.
#[derive(Debug, Serialize)]
pub struct HistoryEntryView {
    /// Final (or current) status of the deal.
    pub status: EscrowStatus,
    /// Buying party.
    pub buyer: Address,
    /// Selling party.
    pub seller: Address,
    /// Sale price, decimal minor units.
    pub price: String,
    /// Frozen fee, decimal minor units.
    pub fee: String,
    /// Creation timestamp.
    pub created_at: u64,
    /// Terminal-transition timestamp, if reached.
    pub completed_at: Option<u64>,
    /// Creating transaction.
    pub creation_tx: TxHash,
    /// Most recent transaction applied.
    pub latest_tx: TxHash,
}

impl From<&EscrowHistoryEntry> for HistoryEntryView {
    fn from(entry: &EscrowHistoryEntry) -> Self {
        Self {
            status: entry.status,
            buyer: entry.buyer,
            seller: entry.seller,
            price: entry.price.to_string(),
            fee: entry.fee.to_string(),
            created_at: entry.created_at,
            completed_at: entry.completed_at,
            creation_tx: entry.creation_tx,
            latest_tx: entry.latest_tx,
        }
    }
}

/// The escrow mirror on a property.
#[derive(Debug, Serialize)]
pub struct EscrowInfoView {
    /// Whether a non-terminal deal exists.
    pub has_active_escrow: bool,
    /// Status of the current or latest deal.
    pub current_status: Option<EscrowStatus>,
    /// Buyer of the current deal.
    pub buyer: Option<Address>,
    /// Seller of the current deal.
    pub seller: Option<Address>,
    /// Price, decimal minor units.
    pub price: Option<String>,
    /// Fee, decimal minor units.
    pub fee: Option<String>,
    /// Full history, oldest first.
    pub history: Vec<HistoryEntryView>,
}

impl From<&EscrowInfo> for EscrowInfoView {
    fn from(info: &EscrowInfo) -> Self {
        Self {
            has_active_escrow: info.has_active_escrow,
            current_status: info.current_status,
            buyer: info.buyer,
            seller: info.seller,
            price: info.price.map(|p| p.to_string()),
            fee: info.fee.map(|f| f.to_string()),
            history: info.history.iter().map(HistoryEntryView::from).collect(),
        }
    }
}

/// A property record.
#[derive(Debug, Serialize)]
pub struct PropertyView {
    /// Registry identifier.
    pub property_id: String,
    /// Canonical owner identity.
    pub owner: OwnerId,
    /// Listing title.
    pub name: String,
    /// Image URIs.
    pub images: Vec<String>,
    /// Listing status.
    pub status: PropertyStatus,
    /// Bound token, once minted.
    pub token_id: Option<u64>,
    /// Escrow mirror.
    pub escrow: EscrowInfoView,
    /// Sale metrics.
    pub metrics: MetricsView,
    /// Submission timestamp.
    pub submitted_at: u64,
}

impl From<&Property> for PropertyView {
    fn from(property: &Property) -> Self {
        Self {
            property_id: property.property_id.to_string(),
            owner: property.owner,
            name: property.name.clone(),
            images: property.images.clone(),
            status: property.status,
            token_id: property.token_id.map(|t| t.0),
            escrow: EscrowInfoView::from(&property.escrow),
            metrics: MetricsView::from(&property.metrics),
            submitted_at: property.submitted_at,
        }
    }
}

/// A user record plus the verification flag as the chain registry sees it.
/// The flag may come from the short-lived cache; it is for display only.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// The off-chain record.
    #[serde(flatten)]
    pub record: UserRecord,
    /// On-chain verification flag.
    pub verified: bool,
}

/// One transaction-ledger entry.
#[derive(Debug, Serialize)]
pub struct LedgerEntryView {
    /// Internal entry id.
    pub id: String,
    /// Transition kind.
    pub entry_type: LedgerEntryType,
    /// Paying side.
    pub from: Address,
    /// Receiving side.
    pub to: Address,
    /// Token the deal is for.
    pub token_id: u64,
    /// Bound property, when known.
    pub property_id: Option<String>,
    /// Value moved, decimal minor units.
    pub value: String,
    /// Transaction outcome.
    pub status: EntryStatus,
    /// Deduplication key.
    pub transaction_hash: TxHash,
    /// Ledger timestamp.
    pub timestamp: u64,
}

impl From<&LedgerEntry> for LedgerEntryView {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            entry_type: entry.entry_type,
            from: entry.from_address,
            to: entry.to_address,
            token_id: entry.token_id.0,
            property_id: entry.property_id.as_ref().map(|p| p.to_string()),
            value: entry.value.to_string(),
            status: entry.status,
            transaction_hash: entry.transaction_hash,
            timestamp: entry.timestamp,
        }
    }
}
