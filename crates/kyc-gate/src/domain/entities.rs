//! # Domain Entities
//!
//! User records and their verification lifecycle.

use super::errors::KycError;
use serde::{Deserialize, Serialize};
use shared_types::{unix_now, Address};

/// Verification status of a user record.
///
/// Created `Pending` on registration. Only an admin action moves a record to
/// `Verified` or `Rejected`; a rejected user may re-register, which resets
/// the record to `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    /// Awaiting admin review.
    #[default]
    Pending,
    /// Approved to transact.
    Verified,
    /// Denied; may re-register.
    Rejected,
}

impl KycStatus {
    /// Check if an admin review transition is valid.
    pub fn can_transition_to(&self, next: KycStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Verified) => true,
            (Self::Pending, Self::Rejected) => true,
            // Re-registration, not an admin review.
            (Self::Rejected, Self::Pending) => true,
            _ => false,
        }
    }
}

/// An identity document attached to a registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document kind (passport, utility bill, ...).
    pub doc_type: String,
    /// Where the uploaded file lives; storage itself is an external concern.
    pub uri: String,
}

/// Off-chain user record mirroring the verification registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    /// Wallet address, unique per record.
    pub wallet_address: Address,
    /// Current verification status.
    pub status: KycStatus,
    /// Submitted identity documents.
    pub documents: Vec<Document>,
    /// Registration timestamp (Unix seconds).
    pub registered_at: u64,
    /// Timestamp of the latest admin review, if any.
    pub reviewed_at: Option<u64>,
}

impl UserRecord {
    /// Create a fresh pending record.
    pub fn new(wallet_address: Address, documents: Vec<Document>) -> Self {
        Self {
            wallet_address,
            status: KycStatus::Pending,
            documents,
            registered_at: unix_now(),
            reviewed_at: None,
        }
    }

    /// Apply an admin review decision.
    pub fn review(&mut self, decision: KycStatus) -> Result<(), KycError> {
        if !self.status.can_transition_to(decision) {
            return Err(KycError::InvalidStatusTransition {
                from: self.status,
                to: decision,
            });
        }
        self.status = decision;
        self.reviewed_at = Some(unix_now());
        Ok(())
    }

    /// Re-register after rejection: documents replaced, status reset.
    pub fn re_register(&mut self, documents: Vec<Document>) -> Result<(), KycError> {
        if self.status != KycStatus::Rejected {
            return Err(KycError::AlreadyRegistered(self.wallet_address));
        }
        self.status = KycStatus::Pending;
        self.documents = documents;
        self.registered_at = unix_now();
        self.reviewed_at = None;
        Ok(())
    }
}
