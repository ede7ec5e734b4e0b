//! # Persistence Tests
//!
//! The RocksDB stores across a close/reopen cycle: rows survive, the token
//! index stays consistent, and the unique-hash constraint holds.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use escrow_engine::{EscrowEvent, EscrowEventKind};
    use kyc_gate::{KycStatus, UserRecord, UserStore};
    use mirror_store::{
        MirrorDb, MirrorDbConfig, RocksLedgerStore, RocksPropertyStore, RocksUserStore,
    };
    use property_registry::{Property, PropertyStore};
    use shared_types::{Address, Amount, OwnerId, PropertyId, TokenId, TxHash};
    use tempfile::TempDir;
    use tx_ledger::{LedgerEntry, LedgerStore};

    fn addr() -> Address {
        "0xab5801a7d398351b8be11c439e05c5b3259aec9b".parse().unwrap()
    }

    fn open(path: &str) -> Arc<MirrorDb> {
        MirrorDb::open(&MirrorDbConfig::for_testing(path)).unwrap()
    }

    #[tokio::test]
    async fn test_user_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        {
            let db = open(&path);
            let store = RocksUserStore::new(db.clone());
            let mut record = UserRecord::new(addr(), vec![]);
            record.review(KycStatus::Verified).unwrap();
            store.put(record).await.unwrap();
            db.close().unwrap();
        }

        let db = open(&path);
        let store = RocksUserStore::new(db);
        let record = store.get(addr()).await.unwrap().unwrap();
        assert_eq!(record.status, KycStatus::Verified);
    }

    #[tokio::test]
    async fn test_token_index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let id = PropertyId::new("prop-1");

        {
            let db = open(&path);
            let store = RocksPropertyStore::new(db.clone());
            let mut property = Property::new(
                id.clone(),
                OwnerId::Wallet(addr()),
                "Loft".into(),
                vec![],
                1_700_000_000,
            );
            property
                .review(property_registry::PropertyStatus::Approved)
                .unwrap();
            property.mint(TokenId(7)).unwrap();
            store.put(property).await.unwrap();
            db.close().unwrap();
        }

        let db = open(&path);
        let store = RocksPropertyStore::new(db);
        let found = store.find_by_token(TokenId(7)).await.unwrap().unwrap();
        assert_eq!(found.property_id, id);
        assert!(store.find_by_token(TokenId(8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ledger_unique_hash_holds_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let event = EscrowEvent {
            kind: EscrowEventKind::Created,
            token_id: TokenId(7),
            buyer: "0x2222222222222222222222222222222222222222".parse().unwrap(),
            seller: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            tx_hash: TxHash::new([1u8; 32]),
            timestamp: 1_700_000_000,
        };

        let original_id;
        {
            let db = open(&path);
            let store = RocksLedgerStore::new(db.clone());
            let outcome = store
                .insert_if_absent(LedgerEntry::from_event(&event, None))
                .await
                .unwrap();
            assert!(outcome.was_inserted());
            original_id = outcome.entry().id;
            db.close().unwrap();
        }

        // Replaying the same event into a fresh process must not duplicate.
        let db = open(&path);
        let store = RocksLedgerStore::new(db);
        let replay = store
            .insert_if_absent(LedgerEntry::from_event(&event, None))
            .await
            .unwrap();
        assert!(!replay.was_inserted());
        assert_eq!(replay.entry().id, original_id);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
