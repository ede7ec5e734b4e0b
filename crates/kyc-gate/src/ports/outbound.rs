//! # Outbound Ports
//!
//! Traits for the external verification registry and the user store.

use crate::domain::{KycError, UserRecord};
use async_trait::async_trait;
use shared_types::Address;

/// On-ledger verification registry - outbound port.
///
/// Read-only. Errors mean "unknown", never "allowed".
#[async_trait]
pub trait KycLedger: Send + Sync {
    /// Whether the address is verified on the ledger.
    async fn is_verified(&self, address: Address) -> Result<bool, KycError>;
}

/// Durable user record store - outbound port.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a record by wallet address.
    async fn get(&self, address: Address) -> Result<Option<UserRecord>, KycError>;

    /// Insert or replace a record.
    async fn put(&self, record: UserRecord) -> Result<(), KycError>;

    /// All records, for admin listings.
    async fn list(&self) -> Result<Vec<UserRecord>, KycError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock verification registry for testing.
#[derive(Default)]
pub struct MockKycLedger {
    /// Verified addresses.
    pub verified: dashmap::DashSet<Address>,
    /// Simulate an unreachable ledger?
    pub unreachable: std::sync::atomic::AtomicBool,
}

impl MockKycLedger {
    /// Mark an address verified.
    pub fn set_verified(&self, address: Address, verified: bool) {
        if verified {
            self.verified.insert(address);
        } else {
            self.verified.remove(&address);
        }
    }

    /// Toggle the simulated outage.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable
            .store(unreachable, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl KycLedger for MockKycLedger {
    async fn is_verified(&self, address: Address) -> Result<bool, KycError> {
        if self.unreachable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(KycError::LedgerUnavailable("mock outage".to_string()));
        }
        Ok(self.verified.contains(&address))
    }
}

/// In-memory user store for testing.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: dashmap::DashMap<Address, UserRecord>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, address: Address) -> Result<Option<UserRecord>, KycError> {
        Ok(self.records.get(&address).map(|r| r.clone()))
    }

    async fn put(&self, record: UserRecord) -> Result<(), KycError> {
        self.records.insert(record.wallet_address, record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, KycError> {
        Ok(self.records.iter().map(|r| r.clone()).collect())
    }
}
