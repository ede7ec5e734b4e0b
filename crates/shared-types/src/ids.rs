//! # Identifier Types
//!
//! Token and property identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain token identifier of a minted property NFT.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Off-chain property record identifier, assigned at submission time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}
