//! Identity types for accounts and contracts
//!
//! Every participant (externally owned account, deployed contract, price feed)
//! is addressed by a 20-byte `Address`, rendered as `0x`-prefixed hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnitsError;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// 20-byte account or contract identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a deterministic address whose low 8 bytes hold `n`.
    ///
    /// Development nodes hand out accounts this way, so `from_low_u64(1)`
    /// is a stable stand-in for "the second signer".
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Build from the trailing 20 bytes of a longer digest
    pub fn from_digest_tail(digest: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        let start = digest.len().saturating_sub(ADDRESS_LEN);
        let tail = &digest[start..];
        bytes[ADDRESS_LEN - tail.len()..].copy_from_slice(tail);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnitsError::InvalidAddress {
            input: s.to_string(),
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }
        let decoded = hex::decode(digits).map_err(|_| invalid())?;
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
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
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_is_lowercase_hex() {
        let addr: Address = "0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e".parse().unwrap();
        assert_eq!(addr.to_string(), "0xd4a33860578de61dbabdc8bfdb98fd742fa7028e");
    }

    #[test]
    fn test_address_parse_without_prefix() {
        let with: Address = "0xf9680d99d6c9589e2a93a78a04a279e509205945".parse().unwrap();
        let without: Address = "f9680d99d6c9589e2a93a78a04a279e509205945".parse().unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_address_parse_rejects_bad_length() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(UnitsError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_address_parse_rejects_non_hex() {
        let bad = format!("0x{}", "zz".repeat(ADDRESS_LEN));
        assert!(bad.parse::<Address>().is_err());
    }

    #[test]
    fn test_from_low_u64_distinct() {
        assert_ne!(Address::from_low_u64(1), Address::from_low_u64(2));
        assert!(Address::from_low_u64(0).is_zero());
        assert_eq!(
            Address::from_low_u64(1).to_string(),
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_from_digest_tail_takes_last_bytes() {
        let digest: Vec<u8> = (0u8..32).collect();
        let addr = Address::from_digest_tail(&digest);
        assert_eq!(addr.as_bytes()[0], 12);
        assert_eq!(addr.as_bytes()[19], 31);
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::from_low_u64(42);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x000000000000000000000000000000000000002a\"");

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }
}
