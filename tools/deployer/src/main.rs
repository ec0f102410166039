//! FundMe deployment CLI
//!
//! Deploys FundMe onto a simulated network, resolving the price feed the
//! same way for every target: a mock on development networks, the configured
//! feed address elsewhere. Live networks are simulated as a fork, with the
//! configured feed pinned at the answer and decimals given on the command
//! line.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use contracts::chain::{Chain, Receipt, Transaction};
use contracts::deploy::{deploy_all, Deployment};
use contracts::network::NetworkConfig;
use contracts::oracle::{PinnedAggregator, RoundData};
use types::ids::Address;
use types::units::Wei;

#[derive(Parser)]
#[command(name = "fundme-deploy")]
#[command(about = "Deploy FundMe and run funding sessions against a simulated network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network name from the config
    #[arg(short, long, global = true, default_value = "hardhat")]
    network: String,

    /// JSON network config; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective network config as JSON
    Config,

    /// Deploy mocks (development networks) and FundMe, print the addresses
    Deploy {
        #[command(flatten)]
        pin: PinnedFeed,
    },

    /// Deploy, fund from several accounts, then withdraw as the owner
    Session {
        /// Number of funding accounts
        #[arg(short = 'f', long, default_value = "5")]
        funders: u64,

        /// Ether sent by each funder
        #[arg(short, long, default_value = "1")]
        amount: String,

        /// Gas price in wei
        #[arg(long, default_value = "1000000000")]
        gas_price: u128,

        #[command(flatten)]
        pin: PinnedFeed,
    },
}

/// Round served by the configured feed when a live network is simulated
#[derive(Args, Debug, Clone, Copy)]
struct PinnedFeed {
    /// Feed answer to pin on live networks, in units of `--pinned-decimals`
    #[arg(long, default_value_t = 200_000_000_000)]
    pinned_answer: i128,

    /// Decimals of the pinned answer
    #[arg(long, default_value_t = 8)]
    pinned_decimals: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => NetworkConfig::load(path)
            .with_context(|| format!("loading network config {}", path.display()))?,
        None => NetworkConfig::default(),
    };

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Deploy { pin } => {
            let mut chain = Chain::new(config.network(&cli.network)?.chain_id);
            let accounts = chain.dev_accounts(1, Wei::from_ether_units(10_000));
            let deployment = deploy(&mut chain, &config, &cli.network, accounts[0], pin)?;
            println!(
                "{}",
                serde_json::json!({
                    "network": deployment.network,
                    "fund_me": deployment.fund_me.address(),
                    "owner": deployment.fund_me.owner(),
                    "price_feed": deployment.price_feed,
                    "mock": deployment.mock,
                    "block_confirmations": deployment.block_confirmations,
                })
            );
        }
        Commands::Session {
            funders,
            amount,
            gas_price,
            pin,
        } => {
            if funders == 0 {
                bail!("a session needs at least one funder");
            }
            let amount: Wei = amount.parse().context("parsing --amount")?;
            let mut chain = Chain::new(config.network(&cli.network)?.chain_id)
                .with_gas_price(Wei::new(gas_price));
            let accounts = chain.dev_accounts(funders + 1, Wei::from_ether_units(10_000));
            let owner = accounts[0];
            let mut deployment = deploy(&mut chain, &config, &cli.network, owner, pin)?;
            let fund_me = &mut deployment.fund_me;

            for funder in &accounts[1..] {
                match chain.transact(fund_me, Transaction::fund(*funder, amount)) {
                    Ok(receipt) => tracing::info!(
                        funder = %funder,
                        tx = %receipt.tx_id,
                        block = receipt.block_number,
                        "Funded"
                    ),
                    Err(err) => tracing::warn!(funder = %funder, error = %err, "Funding rejected"),
                }
            }

            let held = chain.balance_of(&fund_me.address());
            tracing::info!(held = %held, funders = fund_me.funders_len(), "Funding round closed");

            let receipt = chain
                .transact(fund_me, Transaction::withdraw(owner))
                .context("owner withdrawal")?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            println!("{}", serde_json::to_string_pretty(&session_summary(&chain, owner, &receipt)?)?);
            tracing::info!(
                owner = %owner,
                owner_balance = %chain.balance_of(&owner),
                gas_cost = %receipt.gas_cost(),
                "Session complete"
            );
        }
    }

    Ok(())
}

/// Deploy onto `chain`, pinning the configured feed first when the network is live.
fn deploy(
    chain: &mut Chain,
    config: &NetworkConfig,
    network: &str,
    deployer: Address,
    pin: PinnedFeed,
) -> Result<Deployment> {
    if !config.is_development(network) {
        let feed = config.price_feed_for(network)?;
        let round = RoundData {
            round_id: 1,
            answer: pin.pinned_answer,
            started_at: chain.timestamp(),
            updated_at: chain.timestamp(),
            answered_in_round: 1,
        };
        chain.install_oracle(
            feed,
            Box::new(PinnedAggregator::new("ETH / USD", pin.pinned_decimals, round)),
        );
        tracing::info!(
            network,
            feed = %feed,
            answer = pin.pinned_answer,
            decimals = pin.pinned_decimals,
            "Pinned live price feed"
        );
    }
    Ok(deploy_all(chain, config, network, &deployer)?)
}

/// Owner balance and withdrawal cost in ether.
fn session_summary(chain: &Chain, owner: Address, receipt: &Receipt) -> Result<serde_json::Value> {
    Ok(serde_json::json!({
        "owner": owner,
        "owner_balance_eth": chain.balance_of(&owner).to_ether()?,
        "withdraw_gas_cost_eth": receipt.gas_cost().to_ether()?,
        "block_number": chain.block_number(),
    }))
}
