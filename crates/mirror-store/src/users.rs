//! RocksDB-backed user store.

use crate::db::{MirrorDb, CF_USERS};
use async_trait::async_trait;
use kyc_gate::{KycError, UserRecord, UserStore};
use shared_types::Address;
use std::sync::Arc;

/// Durable [`UserStore`] over the `users` column family.
pub struct RocksUserStore {
    db: Arc<MirrorDb>,
}

impl RocksUserStore {
    /// Build the store over an open database.
    pub fn new(db: Arc<MirrorDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for RocksUserStore {
    async fn get(&self, address: Address) -> Result<Option<UserRecord>, KycError> {
        let cf = self.db.cf(CF_USERS).map_err(|e| KycError::Store(e.to_string()))?;
        let row = self
            .db
            .db
            .get_cf(cf, address.as_bytes())
            .map_err(|e| KycError::Store(e.to_string()))?;
        row.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(|e| KycError::Store(e.to_string()))
    }

    async fn put(&self, record: UserRecord) -> Result<(), KycError> {
        let cf = self.db.cf(CF_USERS).map_err(|e| KycError::Store(e.to_string()))?;
        let bytes = serde_json::to_vec(&record).map_err(|e| KycError::Store(e.to_string()))?;
        self.db
            .db
            .put_cf_opt(cf, record.wallet_address.as_bytes(), bytes, &self.db.write_opts())
            .map_err(|e| KycError::Store(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, KycError> {
        let cf = self.db.cf(CF_USERS).map_err(|e| KycError::Store(e.to_string()))?;
        let mut records = Vec::new();
        for item in self.db.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item.map_err(|e| KycError::Store(e.to_string()))?;
            records.push(
                serde_json::from_slice(&value).map_err(|e| KycError::Store(e.to_string()))?,
            );
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MirrorDbConfig;
    use kyc_gate::KycStatus;
    use tempfile::TempDir;

    fn addr() -> Address {
        "0xab5801a7d398351b8be11c439e05c5b3259aec9b".parse().unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip_and_list() {
        let dir = TempDir::new().unwrap();
        let db = MirrorDb::open(&MirrorDbConfig::for_testing(
            dir.path().to_string_lossy().to_string(),
        ))
        .unwrap();
        let store = RocksUserStore::new(db);

        assert!(store.get(addr()).await.unwrap().is_none());
        let mut record = UserRecord::new(addr(), vec![]);
        record.review(KycStatus::Verified).unwrap();
        store.put(record).await.unwrap();

        let back = store.get(addr()).await.unwrap().unwrap();
        assert_eq!(back.status, KycStatus::Verified);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
