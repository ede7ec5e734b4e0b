//! # Property Registry Service
//!
//! Listing lifecycle plus the escrow mirror. The registry is the concrete
//! mirror the escrow engine writes through: it implements
//! [`escrow_engine::DealMirror`] over the property store.

use crate::domain::{
    MirrorApply, Property, PropertyError, PropertyStatus,
};
use async_trait::async_trait;
use escrow_engine::{DealMirror, EscrowDeal, EscrowError, EscrowEvent, EscrowEventKind};
use shared_types::{unix_now, Address, OwnerId, PropertyId, TokenId};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ports::PropertyStore;

/// The property registry.
pub struct PropertyRegistry {
    store: Arc<dyn PropertyStore>,
}

impl PropertyRegistry {
    /// Build the registry over a property store.
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self { store }
    }

    /// Submit a new listing. Starts Pending with a fresh registry id.
    pub async fn submit(
        &self,
        owner: OwnerId,
        name: String,
        images: Vec<String>,
    ) -> Result<Property, PropertyError> {
        let property = Property::new(
            PropertyId::new(Uuid::new_v4().to_string()),
            owner,
            name,
            images,
            unix_now(),
        );
        self.store.put(property.clone()).await?;
        debug!(property_id = %property.property_id, %owner, "Property submitted");
        Ok(property)
    }

    /// Fetch a listing.
    pub async fn get(&self, id: &PropertyId) -> Result<Property, PropertyError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PropertyError::NotFound(id.clone()))
    }

    /// All listings.
    pub async fn list(&self) -> Result<Vec<Property>, PropertyError> {
        self.store.list().await
    }

    /// Listings owned by an identity.
    pub async fn list_by_owner(&self, owner: OwnerId) -> Result<Vec<Property>, PropertyError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|p| p.owner == owner)
            .collect())
    }

    /// Apply an admin review decision.
    pub async fn review(
        &self,
        id: &PropertyId,
        decision: PropertyStatus,
    ) -> Result<Property, PropertyError> {
        let mut property = self.get(id).await?;
        property.review(decision)?;
        self.store.put(property.clone()).await?;
        info!(property_id = %id, ?decision, "Property reviewed");
        Ok(property)
    }

    /// Mint an approved listing, binding it to a token. One-way.
    pub async fn mint(
        &self,
        id: &PropertyId,
        token_id: TokenId,
    ) -> Result<Property, PropertyError> {
        if self.store.find_by_token(token_id).await?.is_some() {
            return Err(PropertyError::TokenAlreadyBound(token_id));
        }
        let mut property = self.get(id).await?;
        property.mint(token_id)?;
        self.store.put(property.clone()).await?;
        info!(property_id = %id, %token_id, "Property minted");
        Ok(property)
    }

    /// The minted property carrying a token, if any.
    pub async fn property_for_token(
        &self,
        token_id: TokenId,
    ) -> Result<Option<Property>, PropertyError> {
        self.store.find_by_token(token_id).await
    }

    /// Apply a confirmed contract event to the mirror, bumping sale metrics
    /// exactly once when a deal completes.
    pub async fn record_escrow_event(
        &self,
        event: &EscrowEvent,
    ) -> Result<MirrorApply, PropertyError> {
        let mut property = self
            .store
            .find_by_token(event.token_id)
            .await?
            .ok_or(PropertyError::NoPropertyForToken(event.token_id))?;
        let applied = property.escrow.apply_event(event)?;
        if applied == MirrorApply::Applied && event.kind == EscrowEventKind::Completed {
            property.metrics.record_sale(event.price);
        }
        if applied == MirrorApply::Applied {
            self.store.put(property).await?;
            debug!(token_id = %event.token_id, kind = ?event.kind, "Mirror updated");
        }
        Ok(applied)
    }

    /// Correct the mirror from the authoritative deal.
    pub async fn reconcile_escrow(
        &self,
        token_id: TokenId,
        deal: Option<&EscrowDeal>,
    ) -> Result<(), PropertyError> {
        let Some(mut property) = self.store.find_by_token(token_id).await? else {
            // Nothing mirrored for this token.
            return Ok(());
        };

        match deal {
            None => {
                if property.escrow.has_active_escrow {
                    warn!(%token_id, "Mirror claims an active deal the ledger does not know; clearing");
                    // No authoritative status to finalize to; the phantom
                    // entry is dropped entirely.
                    property.escrow.history.pop();
                    property.escrow.refresh_summary();
                    self.store.put(property).await?;
                }
            }
            Some(deal) => {
                let stale = property.escrow.current_status != Some(deal.status)
                    || property.escrow.buyer != Some(deal.buyer)
                    || property.escrow.price != Some(deal.price);
                if stale {
                    warn!(%token_id, ledger_status = ?deal.status, mirror_status = ?property.escrow.current_status,
                        "Mirror disagrees with ledger; correcting in place");
                    if let Some(entry) = property.escrow.history.last_mut() {
                        entry.status = deal.status;
                        entry.buyer = deal.buyer;
                        entry.seller = deal.seller;
                        entry.price = deal.price;
                        entry.fee = deal.fee;
                    } else {
                        property.escrow.history.push(crate::domain::EscrowHistoryEntry {
                            status: deal.status,
                            buyer: deal.buyer,
                            seller: deal.seller,
                            price: deal.price,
                            fee: deal.fee,
                            created_at: deal.created_at,
                            completed_at: None,
                            creation_tx: shared_types::TxHash::new([0u8; 32]),
                            latest_tx: shared_types::TxHash::new([0u8; 32]),
                        });
                    }
                    property.escrow.refresh_summary();
                    self.store.put(property).await?;
                }
            }
        }
        Ok(())
    }

    /// Mirror view of every deal an address participates in.
    pub async fn escrow_deals_for(
        &self,
        address: Address,
    ) -> Result<Vec<EscrowDeal>, PropertyError> {
        let mut deals = Vec::new();
        for property in self.store.list().await? {
            let Some(token_id) = property.token_id else {
                continue;
            };
            for entry in &property.escrow.history {
                if entry.buyer != address && entry.seller != address {
                    continue;
                }
                deals.push(EscrowDeal {
                    token_id,
                    seller: entry.seller,
                    buyer: entry.buyer,
                    price: entry.price,
                    fee: entry.fee,
                    status: entry.status,
                    funds_deposited: entry.status.reached_funding(),
                    created_at: entry.created_at,
                });
            }
        }
        deals.sort_by_key(|d| std::cmp::Reverse(d.created_at));
        Ok(deals)
    }
}

#[async_trait]
impl DealMirror for PropertyRegistry {
    async fn apply_event(&self, event: &EscrowEvent) -> Result<(), EscrowError> {
        self.record_escrow_event(event)
            .await
            .map(|_| ())
            .map_err(|e| EscrowError::Mirror(e.to_string()))
    }

    async fn reconcile(
        &self,
        token_id: TokenId,
        deal: Option<&EscrowDeal>,
    ) -> Result<(), EscrowError> {
        self.reconcile_escrow(token_id, deal)
            .await
            .map_err(|e| EscrowError::Mirror(e.to_string()))
    }

    async fn deals_for(&self, address: Address) -> Result<Vec<EscrowDeal>, EscrowError> {
        self.escrow_deals_for(address)
            .await
            .map_err(|e| EscrowError::Mirror(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::InMemoryPropertyStore;
    use escrow_engine::EscrowStatus;
    use shared_types::{Amount, TxHash};

    fn seller() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn buyer() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    fn tx(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    fn event(kind: EscrowEventKind, tx_hash: TxHash) -> EscrowEvent {
        EscrowEvent {
            kind,
            token_id: TokenId(7),
            buyer: buyer(),
            seller: seller(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            tx_hash,
            timestamp: 1_700_000_000,
        }
    }

    fn registry() -> PropertyRegistry {
        PropertyRegistry::new(Arc::new(InMemoryPropertyStore::default()))
    }

    async fn minted_property(registry: &PropertyRegistry) -> Property {
        let property = registry
            .submit(OwnerId::Wallet(seller()), "Flat 4".to_string(), vec![])
            .await
            .unwrap();
        registry
            .review(&property.property_id, PropertyStatus::Approved)
            .await
            .unwrap();
        registry.mint(&property.property_id, TokenId(7)).await.unwrap()
    }

    #[tokio::test]
    async fn test_submit_review_mint() {
        let registry = registry();
        let property = minted_property(&registry).await;
        assert_eq!(property.status, PropertyStatus::Minted);
        assert_eq!(property.token_id, Some(TokenId(7)));
    }

    #[tokio::test]
    async fn test_token_bound_once() {
        let registry = registry();
        minted_property(&registry).await;
        let other = registry
            .submit(OwnerId::Wallet(seller()), "Flat 5".to_string(), vec![])
            .await
            .unwrap();
        registry
            .review(&other.property_id, PropertyStatus::Approved)
            .await
            .unwrap();
        assert!(matches!(
            registry.mint(&other.property_id, TokenId(7)).await,
            Err(PropertyError::TokenAlreadyBound(TokenId(7)))
        ));
    }

    #[tokio::test]
    async fn test_completion_bumps_metrics_exactly_once() {
        let registry = registry();
        let property = minted_property(&registry).await;

        registry.record_escrow_event(&event(EscrowEventKind::Created, tx(1))).await.unwrap();
        registry
            .record_escrow_event(&event(EscrowEventKind::FundsDeposited, tx(2)))
            .await
            .unwrap();
        registry.record_escrow_event(&event(EscrowEventKind::Completed, tx(3))).await.unwrap();
        // At-least-once delivery replays the completion.
        let applied = registry
            .record_escrow_event(&event(EscrowEventKind::Completed, tx(3)))
            .await
            .unwrap();
        assert_eq!(applied, MirrorApply::Duplicate);

        let property = registry.get(&property.property_id).await.unwrap();
        assert_eq!(property.metrics.total_sales, 1);
        assert_eq!(property.metrics.total_volume, Amount::from(1_000_000u64));
        assert!(!property.escrow.has_active_escrow);
    }

    #[tokio::test]
    async fn test_event_for_unminted_token_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.record_escrow_event(&event(EscrowEventKind::Created, tx(1))).await,
            Err(PropertyError::NoPropertyForToken(TokenId(7)))
        ));
    }

    #[tokio::test]
    async fn test_reconcile_corrects_stale_status() {
        let registry = registry();
        let property = minted_property(&registry).await;
        registry.record_escrow_event(&event(EscrowEventKind::Created, tx(1))).await.unwrap();

        // The ledger moved on to FUNDED; the mirror missed the event.
        let mut deal = EscrowDeal {
            token_id: TokenId(7),
            seller: seller(),
            buyer: buyer(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            status: EscrowStatus::Pending,
            funds_deposited: false,
            created_at: 1_700_000_000,
        };
        deal.transition_to(EscrowStatus::Funded).unwrap();
        registry.reconcile_escrow(TokenId(7), Some(&deal)).await.unwrap();

        let property = registry.get(&property.property_id).await.unwrap();
        assert_eq!(property.escrow.current_status, Some(EscrowStatus::Funded));
        assert!(property.escrow.has_active_escrow);
    }

    #[tokio::test]
    async fn test_reconcile_drops_phantom_deal() {
        let registry = registry();
        let property = minted_property(&registry).await;
        registry.record_escrow_event(&event(EscrowEventKind::Created, tx(1))).await.unwrap();

        registry.reconcile_escrow(TokenId(7), None).await.unwrap();
        let property = registry.get(&property.property_id).await.unwrap();
        assert!(!property.escrow.has_active_escrow);
        assert!(property.escrow.history.is_empty());
    }

    #[tokio::test]
    async fn test_deals_for_address() {
        let registry = registry();
        minted_property(&registry).await;
        registry.record_escrow_event(&event(EscrowEventKind::Created, tx(1))).await.unwrap();
        registry
            .record_escrow_event(&event(EscrowEventKind::FundsDeposited, tx(2)))
            .await
            .unwrap();

        let deals = registry.escrow_deals_for(buyer()).await.unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].status, EscrowStatus::Funded);
        assert!(deals[0].funds_deposited);

        let stranger: Address = "0x3333333333333333333333333333333333333333".parse().unwrap();
        assert!(registry.escrow_deals_for(stranger).await.unwrap().is_empty());
    }
}
