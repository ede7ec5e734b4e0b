//! # KYC Gate Service
//!
//! Orchestrates the verification predicate and the user record lifecycle
//! over the outbound ports.

use crate::domain::{Document, KycError, KycStatus, UserRecord};
use crate::ports::{KycLedger, UserStore};
use dashmap::DashMap;
use shared_types::Address;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long a cached verification flag may serve non-financial reads.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// The KYC gate.
///
/// `is_verified` always hits the ledger and fails closed; `is_verified_cached`
/// may serve a recent flag and is only suitable for UX reads that do not
/// move funds.
pub struct KycGate {
    ledger: Arc<dyn KycLedger>,
    store: Arc<dyn UserStore>,
    cache: DashMap<Address, (bool, Instant)>,
}

impl KycGate {
    /// Build the gate over a ledger client and a user store.
    pub fn new(ledger: Arc<dyn KycLedger>, store: Arc<dyn UserStore>) -> Self {
        Self {
            ledger,
            store,
            cache: DashMap::new(),
        }
    }

    /// Authoritative verification check. Fails closed: a ledger error is
    /// returned as `LedgerUnavailable`, never coerced into `Ok(true)`.
    pub async fn is_verified(&self, address: Address) -> Result<bool, KycError> {
        match self.ledger.is_verified(address).await {
            Ok(verified) => {
                self.cache.insert(address, (verified, Instant::now()));
                Ok(verified)
            }
            Err(e) => {
                warn!(%address, error = %e, "KYC ledger lookup failed; denying");
                Err(KycError::LedgerUnavailable(e.to_string()))
            }
        }
    }

    /// Cached verification check for display purposes.
    ///
    /// Falls back to the ledger on a cold or stale cache. Never used for
    /// guard decisions on fund-moving operations.
    pub async fn is_verified_cached(&self, address: Address) -> Result<bool, KycError> {
        if let Some(entry) = self.cache.get(&address) {
            let (verified, at) = *entry;
            if at.elapsed() < CACHE_TTL {
                debug!(%address, verified, "KYC cache hit");
                return Ok(verified);
            }
        }
        self.is_verified(address).await
    }

    /// Register a new user (or re-register a rejected one).
    pub async fn register(
        &self,
        address: Address,
        documents: Vec<Document>,
    ) -> Result<UserRecord, KycError> {
        let record = match self.store.get(address).await? {
            Some(mut existing) => {
                existing.re_register(documents)?;
                existing
            }
            None => UserRecord::new(address, documents),
        };
        self.store.put(record.clone()).await?;
        debug!(%address, "User registered");
        Ok(record)
    }

    /// Fetch a user record.
    pub async fn get_user(&self, address: Address) -> Result<UserRecord, KycError> {
        self.store
            .get(address)
            .await?
            .ok_or(KycError::UserNotFound(address))
    }

    /// List all user records (admin).
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, KycError> {
        self.store.list().await
    }

    /// Apply an admin review decision and drop any cached flag.
    pub async fn review(
        &self,
        address: Address,
        decision: KycStatus,
    ) -> Result<UserRecord, KycError> {
        let mut record = self.get_user(address).await?;
        record.review(decision)?;
        self.store.put(record.clone()).await?;
        self.cache.remove(&address);
        debug!(%address, ?decision, "User reviewed");
        Ok(record)
    }
}
