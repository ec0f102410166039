//! Network configuration
//!
//! Per-network deployment settings: chain id, the ETH/USD feed address for
//! live networks, and confirmation depth. Development networks get a mock
//! feed instead, built from the `mock` section.

use serde::{Deserialize, Serialize};
use std::path::Path;
use types::ids::Address;

use crate::errors::ConfigError;

/// Decimals of the development mock feed
pub const DECIMALS: u8 = 8;

/// Opening answer of the development mock feed (2000 USD/ETH at 8 decimals)
pub const INITIAL_ANSWER: i128 = 200_000_000_000;

fn default_confirmations() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub name: String,
    pub chain_id: u64,
    #[serde(default)]
    pub eth_usd_price_feed: Option<Address>,
    #[serde(default = "default_confirmations")]
    pub block_confirmations: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockFeedConfig {
    pub decimals: u8,
    pub initial_answer: i128,
}

impl Default for MockFeedConfig {
    fn default() -> Self {
        Self {
            decimals: DECIMALS,
            initial_answer: INITIAL_ANSWER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub networks: Vec<NetworkEntry>,
    pub development_chains: Vec<String>,
    #[serde(default)]
    pub mock: MockFeedConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let entry = |name: &str, chain_id, feed: Option<&str>, block_confirmations| NetworkEntry {
            name: name.to_string(),
            chain_id,
            eth_usd_price_feed: feed.and_then(|f| f.parse().ok()),
            block_confirmations,
        };
        Self {
            networks: vec![
                entry("hardhat", 31337, None, 1),
                entry("localhost", 31337, None, 1),
                entry(
                    "sepolia",
                    11155111,
                    Some("0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e"),
                    6,
                ),
                entry(
                    "polygon",
                    137,
                    Some("0xF9680D99D6C9589e2a93a78A04A279e509205945"),
                    1,
                ),
            ],
            development_chains: vec!["hardhat".to_string(), "localhost".to_string()],
            mock: MockFeedConfig::default(),
        }
    }
}

impl NetworkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkEntry, ConfigError> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_string(),
            })
    }

    pub fn is_development(&self, name: &str) -> bool {
        self.development_chains.iter().any(|n| n == name)
    }

    /// Configured feed address of a live network.
    pub fn price_feed_for(&self, name: &str) -> Result<Address, ConfigError> {
        self.network(name)?
            .eth_usd_price_feed
            .ok_or_else(|| ConfigError::MissingPriceFeed {
                network: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feeds_parse() {
        let config = NetworkConfig::default();
        assert_eq!(
            config.price_feed_for("sepolia").unwrap().to_string(),
            "0xd4a33860578de61dbabdc8bfdb98fd742fa7028e"
        );
        assert_eq!(
            config.price_feed_for("polygon").unwrap().to_string(),
            "0xf9680d99d6c9589e2a93a78a04a279e509205945"
        );
    }

    #[test]
    fn test_development_chains() {
        let config = NetworkConfig::default();
        assert!(config.is_development("hardhat"));
        assert!(config.is_development("localhost"));
        assert!(!config.is_development("sepolia"));
    }

    #[test]
    fn test_development_network_has_no_feed() {
        let config = NetworkConfig::default();
        assert_eq!(
            config.price_feed_for("hardhat"),
            Err(ConfigError::MissingPriceFeed {
                network: "hardhat".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_network() {
        let config = NetworkConfig::default();
        assert!(matches!(
            config.network("mainnet"),
            Err(ConfigError::UnknownNetwork { .. })
        ));
    }

    #[test]
    fn test_sepolia_confirmations() {
        let config = NetworkConfig::default();
        assert_eq!(config.network("sepolia").unwrap().block_confirmations, 6);
        assert_eq!(config.network("sepolia").unwrap().chain_id, 11155111);
    }

    #[test]
    fn test_json_round_trip_preserves_defaults() {
        let config = NetworkConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(NetworkConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_defaults_for_optional_fields() {
        let json = r#"{
            "networks": [{ "name": "devnet", "chain_id": 1337 }],
            "development_chains": ["devnet"]
        }"#;
        let config = NetworkConfig::from_json_str(json).unwrap();
        let devnet = config.network("devnet").unwrap();
        assert_eq!(devnet.block_confirmations, 1);
        assert_eq!(devnet.eth_usd_price_feed, None);
        assert_eq!(config.mock, MockFeedConfig::default());
    }

    #[test]
    fn test_json_parse_error() {
        assert!(matches!(
            NetworkConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = NetworkConfig::load("/nonexistent/fundme-networks.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
