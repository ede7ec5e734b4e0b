//! Property-resolving ledger sink.
//!
//! The engine emits bare contract events; the ledger table additionally
//! carries the property binding. This adapter looks the property up by token
//! before appending. Appends are idempotent on transaction hash, so
//! at-least-once delivery from the event listener is safe.

use async_trait::async_trait;
use escrow_engine::{EscrowError, EscrowEvent, EventSink};
use property_registry::PropertyRegistry;
use std::sync::Arc;
use tracing::warn;
use tx_ledger::TxLedger;

/// [`EventSink`] writing ledger entries enriched with the property id.
pub struct PropertyResolvingSink {
    ledger: Arc<TxLedger>,
    registry: Arc<PropertyRegistry>,
}

impl PropertyResolvingSink {
    /// Build the sink over the ledger and the registry.
    pub fn new(ledger: Arc<TxLedger>, registry: Arc<PropertyRegistry>) -> Self {
        Self { ledger, registry }
    }
}

#[async_trait]
impl EventSink for PropertyResolvingSink {
    async fn record(&self, event: &EscrowEvent) -> Result<(), EscrowError> {
        // Resolution is best-effort: an entry without a property binding
        // beats no entry at all.
        let property_id = match self.registry.property_for_token(event.token_id).await {
            Ok(property) => property.map(|p| p.property_id),
            Err(e) => {
                warn!(token_id = %event.token_id, error = %e, "Property lookup failed; recording unbound entry");
                None
            }
        };
        self.ledger
            .record_event(event, property_id)
            .await
            .map_err(|e| EscrowError::EventSink(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_engine::EscrowEventKind;
    use property_registry::{InMemoryPropertyStore, PropertyStatus};
    use shared_types::{Address, Amount, OwnerId, TokenId, TxHash};
    use tx_ledger::InMemoryLedgerStore;

    fn seller() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn event(token_id: TokenId) -> EscrowEvent {
        EscrowEvent {
            kind: EscrowEventKind::Created,
            token_id,
            buyer: "0x2222222222222222222222222222222222222222".parse().unwrap(),
            seller: seller(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            tx_hash: TxHash::new([9u8; 32]),
            timestamp: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_sink_binds_property_when_token_is_minted() {
        let ledger = Arc::new(TxLedger::new(Arc::new(InMemoryLedgerStore::default())));
        let registry = Arc::new(PropertyRegistry::new(Arc::new(
            InMemoryPropertyStore::default(),
        )));

        let property = registry
            .submit(OwnerId::Wallet(seller()), "Loft".into(), vec![])
            .await
            .unwrap();
        registry
            .review(&property.property_id, PropertyStatus::Approved)
            .await
            .unwrap();
        registry.mint(&property.property_id, TokenId(7)).await.unwrap();

        let sink = PropertyResolvingSink::new(ledger.clone(), registry);
        sink.record(&event(TokenId(7))).await.unwrap();

        let entry = ledger.get_by_hash(TxHash::new([9u8; 32])).await.unwrap();
        assert_eq!(entry.property_id, Some(property.property_id));
    }

    #[tokio::test]
    async fn test_sink_records_unbound_entry_for_unknown_token() {
        let ledger = Arc::new(TxLedger::new(Arc::new(InMemoryLedgerStore::default())));
        let registry = Arc::new(PropertyRegistry::new(Arc::new(
            InMemoryPropertyStore::default(),
        )));

        let sink = PropertyResolvingSink::new(ledger.clone(), registry);
        sink.record(&event(TokenId(99))).await.unwrap();

        let entry = ledger.get_by_hash(TxHash::new([9u8; 32])).await.unwrap();
        assert!(entry.property_id.is_none());
    }
}
