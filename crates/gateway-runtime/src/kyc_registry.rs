//! Store-backed verification registry.
//!
//! Stands in for the on-chain verification registry until a chain client is
//! wired: an address counts as verified once an admin review has moved its
//! record to `Verified`. Read-only, like the real registry.

use async_trait::async_trait;
use kyc_gate::{KycError, KycLedger, KycStatus, UserStore};
use shared_types::Address;
use std::sync::Arc;

/// [`KycLedger`] answering from the user store.
pub struct StoreBackedKycRegistry {
    store: Arc<dyn UserStore>,
}

impl StoreBackedKycRegistry {
    /// Build the registry over the user store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl KycLedger for StoreBackedKycRegistry {
    async fn is_verified(&self, address: Address) -> Result<bool, KycError> {
        let record = self.store.get(address).await?;
        Ok(record.is_some_and(|r| r.status == KycStatus::Verified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_gate::{InMemoryUserStore, UserRecord};

    fn addr() -> Address {
        "0xab5801a7d398351b8be11c439e05c5b3259aec9b".parse().unwrap()
    }

    #[tokio::test]
    async fn test_unknown_address_is_unverified() {
        let registry = StoreBackedKycRegistry::new(Arc::new(InMemoryUserStore::default()));
        assert!(!registry.is_verified(addr()).await.unwrap());
    }

    #[tokio::test]
    async fn test_verified_record_answers_true() {
        let store = Arc::new(InMemoryUserStore::default());
        let mut record = UserRecord::new(addr(), vec![]);
        record.review(KycStatus::Verified).unwrap();
        store.put(record).await.unwrap();

        let registry = StoreBackedKycRegistry::new(store);
        assert!(registry.is_verified(addr()).await.unwrap());
    }
}
