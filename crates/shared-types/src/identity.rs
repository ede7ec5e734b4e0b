//! # Identity Types
//!
//! Wallet addresses, transaction hashes, and the canonical owner identity.

use crate::errors::ParseError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A 20-byte account address, formatted as `0x` + 40 lowercase hex chars.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The all-zero address, used by contracts as "no address".
    pub const ZERO: Address = Address([0u8; 20]);
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ParseError::InvalidAddress(s.to_string()))?;
        if hex_part.len() != 40 {
            return Err(ParseError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|_| ParseError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A 32-byte transaction hash, formatted as `0x` + 64 lowercase hex chars.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash([u8; 32]);

impl TxHash {
    /// Wrap raw hash bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ParseError::InvalidTxHash(s.to_string()))?;
        if hex_part.len() != 64 {
            return Err(ParseError::InvalidTxHash(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|_| ParseError::InvalidTxHash(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Canonical owner identity.
///
/// Upstream records historically mixed wallet addresses and internal user ids
/// in a single string field. The boundary resolves both shapes into this
/// union; the core only ever sees `OwnerId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OwnerId {
    /// An on-chain wallet address.
    Wallet(Address),
    /// An internal user record id.
    Internal(Uuid),
}

impl OwnerId {
    /// The wallet address, if this identity is one.
    pub fn wallet(&self) -> Option<Address> {
        match self {
            OwnerId::Wallet(addr) => Some(*addr),
            OwnerId::Internal(_) => None,
        }
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerId::Wallet(addr) => write!(f, "{}", addr),
            OwnerId::Internal(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let s = "0xab5801a7d398351b8be11c439e05c5b3259aec9b";
        let addr: Address = s.parse().unwrap();
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn test_address_uppercase_hex_accepted() {
        let addr: Address = "0xAB5801A7D398351B8BE11C439E05C5B3259AEC9B".parse().unwrap();
        assert_eq!(addr.to_string(), "0xab5801a7d398351b8be11c439e05c5b3259aec9b");
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!("ab5801a7d398351b8be11c439e05c5b3259aec9b".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz5801a7d398351b8be11c439e05c5b3259aec9b".parse::<Address>().is_err());
    }

    #[test]
    fn test_tx_hash_roundtrip() {
        let s = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
        let hash: TxHash = s.parse().unwrap();
        assert_eq!(hash.to_string(), s);
    }

    #[test]
    fn test_tx_hash_rejects_wrong_length() {
        assert!("0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a71394"
            .parse::<TxHash>()
            .is_err());
    }

    #[test]
    fn test_address_serde_as_string() {
        let addr: Address = "0xab5801a7d398351b8be11c439e05c5b3259aec9b".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xab5801a7d398351b8be11c439e05c5b3259aec9b\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_owner_id_wallet_accessor() {
        let addr: Address = "0xab5801a7d398351b8be11c439e05c5b3259aec9b".parse().unwrap();
        assert_eq!(OwnerId::Wallet(addr).wallet(), Some(addr));
        assert_eq!(OwnerId::Internal(Uuid::nil()).wallet(), None);
    }
}
