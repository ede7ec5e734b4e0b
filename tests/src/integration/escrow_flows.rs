//! # Escrow Flow Tests
//!
//! Full deal lifecycles wired the way the gateway runtime wires them: the
//! in-memory escrow contract, the KYC gate, the property registry as the
//! mirror, and the property-resolving sink feeding the transaction ledger.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use escrow_engine::{
        EscrowApi, EscrowError, EscrowEvent, EscrowEventKind, EscrowService, EscrowStatus,
        GuardViolation, MockEscrowLedger,
    };
    use gateway_runtime::PropertyResolvingSink;
    use kyc_gate::{InMemoryUserStore, KycGate, MockKycLedger};
    use property_registry::{InMemoryPropertyStore, PropertyRegistry, PropertyStatus};
    use shared_types::{Address, Amount, OwnerId, PropertyId, TokenId, TxHash};
    use tx_ledger::{InMemoryLedgerStore, TxLedger};

    const PRICE: u64 = 1_000_000;
    const FEE: u64 = 25_000; // 250 bps of PRICE
    const TOTAL: u64 = PRICE + FEE;
    const TOKEN: TokenId = TokenId(7);

    fn seller() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn buyer() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    struct World {
        service: Arc<EscrowService>,
        contract: Arc<MockEscrowLedger>,
        kyc_ledger: Arc<MockKycLedger>,
        registry: Arc<PropertyRegistry>,
        ledger: Arc<TxLedger>,
        property_id: PropertyId,
    }

    /// A registry with one minted property, a funded buyer, and both parties
    /// verified.
    async fn world() -> World {
        let contract = Arc::new(MockEscrowLedger::default());
        let kyc_ledger = Arc::new(MockKycLedger::default());
        let kyc = Arc::new(KycGate::new(
            kyc_ledger.clone(),
            Arc::new(InMemoryUserStore::default()),
        ));
        let registry = Arc::new(PropertyRegistry::new(Arc::new(
            InMemoryPropertyStore::default(),
        )));
        let ledger = Arc::new(TxLedger::new(Arc::new(InMemoryLedgerStore::default())));
        let sink = Arc::new(PropertyResolvingSink::new(ledger.clone(), registry.clone()));

        let property = registry
            .submit(OwnerId::Wallet(seller()), "Harbor View Flat".into(), vec![])
            .await
            .unwrap();
        registry
            .review(&property.property_id, PropertyStatus::Approved)
            .await
            .unwrap();
        registry.mint(&property.property_id, TOKEN).await.unwrap();

        contract.mint(TOKEN, seller());
        contract.credit(buyer(), Amount::from(TOTAL));
        kyc_ledger.set_verified(seller(), true);
        kyc_ledger.set_verified(buyer(), true);

        let service = Arc::new(EscrowService::new(
            contract.clone(),
            kyc,
            registry.clone(),
            sink,
        ));

        World {
            service,
            contract,
            kyc_ledger,
            registry,
            ledger,
            property_id: property.property_id,
        }
    }

    #[tokio::test]
    async fn test_full_sale_flow() {
        let w = world().await;

        let deal = w
            .service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        assert_eq!(deal.fee, Amount::from(FEE));
        assert_eq!(deal.status, EscrowStatus::Pending);

        let deal = w
            .service
            .deposit_funds(buyer(), TOKEN, Amount::from(TOTAL))
            .await
            .unwrap();
        assert_eq!(deal.status, EscrowStatus::Funded);

        let deal = w.service.complete_deal(seller(), TOKEN).await.unwrap();
        assert_eq!(deal.status, EscrowStatus::Completed);
        assert_eq!(w.contract.balance_of(seller()), Amount::from(PRICE));

        // The mirror finalized the history entry and bumped metrics once.
        let property = w.registry.get(&w.property_id).await.unwrap();
        assert!(!property.escrow.has_active_escrow);
        assert_eq!(property.escrow.history.len(), 1);
        assert_eq!(property.escrow.history[0].status, EscrowStatus::Completed);
        assert_eq!(property.metrics.total_sales, 1);
        assert_eq!(property.metrics.total_volume, Amount::from(PRICE));

        // One ledger entry per transition, each bound to the property.
        let entries = w.ledger.list().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .all(|e| e.property_id.as_ref() == Some(&w.property_id)));
        assert_eq!(w.ledger.list_for_address(buyer()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let w = world().await;

        w.service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        let err = w
            .service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Guard(GuardViolation::EscrowExists(TOKEN))
        ));
    }

    #[tokio::test]
    async fn test_refund_restores_buyer_in_full() {
        let w = world().await;

        w.service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        w.service
            .deposit_funds(buyer(), TOKEN, Amount::from(TOTAL))
            .await
            .unwrap();

        let deal = w.service.refund_buyer(seller(), TOKEN).await.unwrap();
        assert_eq!(deal.status, EscrowStatus::Refunded);
        assert_eq!(w.contract.balance_of(buyer()), Amount::from(TOTAL));
        assert_eq!(w.contract.balance_of(seller()), Amount::from(0u64));

        // A refund is not a sale.
        let property = w.registry.get(&w.property_id).await.unwrap();
        assert_eq!(property.metrics.total_sales, 0);
    }

    #[tokio::test]
    async fn test_completion_rechecks_kyc() {
        let w = world().await;

        w.service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        w.service
            .deposit_funds(buyer(), TOKEN, Amount::from(TOTAL))
            .await
            .unwrap();

        // Revocation between funding and completion blocks the transfer.
        w.kyc_ledger.set_verified(buyer(), false);
        let err = w.service.complete_deal(seller(), TOKEN).await.unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Guard(GuardViolation::NotVerified { .. })
        ));

        w.kyc_ledger.set_verified(buyer(), true);
        let deal = w.service.complete_deal(seller(), TOKEN).await.unwrap();
        assert_eq!(deal.status, EscrowStatus::Completed);
    }

    #[tokio::test]
    async fn test_phantom_mirror_entry_dropped_on_read() {
        let w = world().await;

        // A mirror entry with no deal behind it, as a crashed writer or a
        // replayed event could leave.
        w.registry
            .record_escrow_event(&EscrowEvent {
                kind: EscrowEventKind::Created,
                token_id: TOKEN,
                buyer: buyer(),
                seller: seller(),
                price: Amount::from(PRICE),
                fee: Amount::from(FEE),
                tx_hash: TxHash::new([5u8; 32]),
                timestamp: 1_700_000_000,
            })
            .await
            .unwrap();
        assert!(w
            .registry
            .get(&w.property_id)
            .await
            .unwrap()
            .escrow
            .has_active_escrow);

        // The authoritative read finds no deal and corrects the mirror.
        assert!(w.service.get_deal(TOKEN).await.unwrap().is_none());
        let property = w.registry.get(&w.property_id).await.unwrap();
        assert!(!property.escrow.has_active_escrow);
        assert!(property.escrow.history.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_before_funding() {
        let w = world().await;

        w.service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        let deal = w.service.cancel_escrow(buyer(), TOKEN).await.unwrap();
        assert_eq!(deal.status, EscrowStatus::Cancelled);

        // The token is free for a new deal afterwards.
        let deal = w
            .service
            .create_escrow(seller(), TOKEN, buyer(), Amount::from(PRICE))
            .await
            .unwrap();
        assert_eq!(deal.status, EscrowStatus::Pending);

        let property = w.registry.get(&w.property_id).await.unwrap();
        assert_eq!(property.escrow.history.len(), 2);
    }
}
