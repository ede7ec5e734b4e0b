//! RocksDB-backed property store.
//!
//! Property rows live in the `properties` column family; a `token_index`
//! family maps minted token ids back to property ids so escrow events can be
//! routed without scanning. Both are written in one atomic batch.

use crate::db::{MirrorDb, CF_PROPERTIES, CF_TOKEN_INDEX};
use async_trait::async_trait;
use property_registry::{Property, PropertyError, PropertyStore};
use rocksdb::WriteBatch;
use shared_types::{PropertyId, TokenId};
use std::sync::Arc;

/// Durable [`PropertyStore`] over the `properties` column family.
pub struct RocksPropertyStore {
    db: Arc<MirrorDb>,
}

impl RocksPropertyStore {
    /// Build the store over an open database.
    pub fn new(db: Arc<MirrorDb>) -> Self {
        Self { db }
    }

    fn read(&self, id: &PropertyId) -> Result<Option<Property>, PropertyError> {
        let cf = self
            .db
            .cf(CF_PROPERTIES)
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        let row = self
            .db
            .db
            .get_cf(cf, id.0.as_bytes())
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        row.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(|e| PropertyError::Store(e.to_string()))
    }
}

#[async_trait]
impl PropertyStore for RocksPropertyStore {
    async fn get(&self, id: &PropertyId) -> Result<Option<Property>, PropertyError> {
        self.read(id)
    }

    async fn put(&self, property: Property) -> Result<(), PropertyError> {
        let cf = self
            .db
            .cf(CF_PROPERTIES)
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        let index_cf = self
            .db
            .cf(CF_TOKEN_INDEX)
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        let bytes =
            serde_json::to_vec(&property).map_err(|e| PropertyError::Store(e.to_string()))?;

        let mut batch = WriteBatch::default();
        batch.put_cf(cf, property.property_id.0.as_bytes(), bytes);
        if let Some(token_id) = property.token_id {
            batch.put_cf(
                index_cf,
                token_id.0.to_be_bytes(),
                property.property_id.0.as_bytes(),
            );
        }
        self.db
            .db
            .write_opt(batch, &self.db.write_opts())
            .map_err(|e| PropertyError::Store(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<Property>, PropertyError> {
        let cf = self
            .db
            .cf(CF_PROPERTIES)
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        let mut records = Vec::new();
        for item in self.db.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item.map_err(|e| PropertyError::Store(e.to_string()))?;
            records.push(
                serde_json::from_slice(&value).map_err(|e| PropertyError::Store(e.to_string()))?,
            );
        }
        Ok(records)
    }

    async fn find_by_token(&self, token_id: TokenId) -> Result<Option<Property>, PropertyError> {
        let index_cf = self
            .db
            .cf(CF_TOKEN_INDEX)
            .map_err(|e| PropertyError::Store(e.to_string()))?;
        let Some(id_bytes) = self
            .db
            .db
            .get_cf(index_cf, token_id.0.to_be_bytes())
            .map_err(|e| PropertyError::Store(e.to_string()))?
        else {
            return Ok(None);
        };
        let id = PropertyId::new(
            String::from_utf8(id_bytes).map_err(|e| PropertyError::Store(e.to_string()))?,
        );
        self.read(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MirrorDbConfig;
    use property_registry::PropertyStatus;
    use shared_types::{Address, OwnerId};
    use tempfile::TempDir;

    fn owner() -> OwnerId {
        OwnerId::Wallet(
            "0x1111111111111111111111111111111111111111"
                .parse::<Address>()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_token_index_follows_mint() {
        let dir = TempDir::new().unwrap();
        let db = MirrorDb::open(&MirrorDbConfig::for_testing(
            dir.path().to_string_lossy().to_string(),
        ))
        .unwrap();
        let store = RocksPropertyStore::new(db);

        let mut property = Property::new(
            PropertyId::from("prop-1"),
            owner(),
            "Flat 4".to_string(),
            vec!["ipfs://img".to_string()],
            0,
        );
        store.put(property.clone()).await.unwrap();
        assert!(store.find_by_token(TokenId(7)).await.unwrap().is_none());

        property.review(PropertyStatus::Approved).unwrap();
        property.mint(TokenId(7)).unwrap();
        store.put(property).await.unwrap();

        let found = store.find_by_token(TokenId(7)).await.unwrap().unwrap();
        assert_eq!(found.property_id, PropertyId::from("prop-1"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
