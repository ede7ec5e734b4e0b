//! # Outbound Ports
//!
//! The durable property store behind the registry.

use crate::domain::{Property, PropertyError};
use async_trait::async_trait;
use shared_types::{PropertyId, TokenId};

/// Durable property record store - outbound port.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Fetch a record by id.
    async fn get(&self, id: &PropertyId) -> Result<Option<Property>, PropertyError>;

    /// Insert or replace a record.
    async fn put(&self, property: Property) -> Result<(), PropertyError>;

    /// All records.
    async fn list(&self) -> Result<Vec<Property>, PropertyError>;

    /// The minted record carrying this token, if any.
    async fn find_by_token(&self, token_id: TokenId) -> Result<Option<Property>, PropertyError>;
}

/// In-memory property store for testing.
#[derive(Default)]
pub struct InMemoryPropertyStore {
    records: dashmap::DashMap<PropertyId, Property>,
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn get(&self, id: &PropertyId) -> Result<Option<Property>, PropertyError> {
        Ok(self.records.get(id).map(|r| r.clone()))
    }

    async fn put(&self, property: Property) -> Result<(), PropertyError> {
        self.records.insert(property.property_id.clone(), property);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Property>, PropertyError> {
        Ok(self.records.iter().map(|r| r.clone()).collect())
    }

    async fn find_by_token(&self, token_id: TokenId) -> Result<Option<Property>, PropertyError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.token_id == Some(token_id))
            .map(|r| r.clone()))
    }
}
