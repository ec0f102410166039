//! Deployment — mocks first, then FundMe
//!
//! On a development network a `MockV3Aggregator` is deployed and FundMe
//! reads from it. On any other network FundMe reads from the feed address in
//! the network config. The feed is resolved once, here; the contract keeps
//! the address for its lifetime.

use tracing::info;
use types::ids::Address;

use crate::chain::Chain;
use crate::errors::DeployError;
use crate::fund_me::FundMe;
use crate::network::{NetworkConfig, NetworkEntry};
use crate::oracle::MockV3Aggregator;

/// Result of a full deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub network: String,
    pub fund_me: FundMe,
    pub price_feed: Address,
    /// Set on development networks
    pub mock: Option<Address>,
    pub block_confirmations: u64,
}

fn resolve_network<'a>(
    chain: &Chain,
    config: &'a NetworkConfig,
    network: &str,
) -> Result<&'a NetworkEntry, DeployError> {
    let entry = config.network(network)?;
    if entry.chain_id != chain.chain_id() {
        return Err(DeployError::ChainIdMismatch {
            network: network.to_string(),
            expected: entry.chain_id,
            actual: chain.chain_id(),
        });
    }
    Ok(entry)
}

/// Deploy the mock feed on development networks; no-op elsewhere.
pub fn deploy_mocks(
    chain: &mut Chain,
    config: &NetworkConfig,
    network: &str,
    deployer: &Address,
) -> Result<Option<Address>, DeployError> {
    resolve_network(chain, config, network)?;
    if !config.is_development(network) {
        return Ok(None);
    }

    info!(network, "Local network detected, deploying mocks");
    let mock = MockV3Aggregator::new(
        config.mock.decimals,
        config.mock.initial_answer,
        chain.timestamp(),
    );
    let address = chain.deploy_oracle(deployer, Box::new(mock));
    info!(address = %address, "Mocks deployed");
    Ok(Some(address))
}

/// Deploy FundMe owned by `deployer`.
///
/// `mock` is the address returned by [`deploy_mocks`]; it is required on
/// development networks and ignored elsewhere.
pub fn deploy_fund_me(
    chain: &mut Chain,
    config: &NetworkConfig,
    network: &str,
    deployer: &Address,
    mock: Option<Address>,
) -> Result<Deployment, DeployError> {
    let entry = resolve_network(chain, config, network)?;
    let block_confirmations = entry.block_confirmations;

    let price_feed = if config.is_development(network) {
        mock.ok_or_else(|| DeployError::MockNotDeployed {
            network: network.to_string(),
        })?
    } else {
        config.price_feed_for(network)?
    };

    let address = chain.create_address(deployer);
    let fund_me = FundMe::new(address, *deployer, price_feed);
    info!(
        network,
        address = %address,
        owner = %deployer,
        price_feed = %price_feed,
        block_confirmations,
        "FundMe deployed"
    );

    Ok(Deployment {
        network: network.to_string(),
        fund_me,
        price_feed,
        mock: mock.filter(|_| config.is_development(network)),
        block_confirmations,
    })
}

/// Run every deploy step for `network`.
pub fn deploy_all(
    chain: &mut Chain,
    config: &NetworkConfig,
    network: &str,
    deployer: &Address,
) -> Result<Deployment, DeployError> {
    let mock = deploy_mocks(chain, config, network, deployer)?;
    deploy_fund_me(chain, config, network, deployer, mock)
}
