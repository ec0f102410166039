//! Contract-specific error types
//!
//! Error taxonomy for the price feed, the FundMe contract, value transfers,
//! the host chain, and deployment configuration.

use thiserror::Error;
use types::ids::Address;
use types::units::{Usd, Wei};

/// Price feed errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("No price feed deployed at {address}")]
    NotDeployed { address: Address },

    #[error("Price feed returned a non-positive answer: {answer}")]
    InvalidAnswer { answer: i128 },

    #[error("Round not found: {round_id}")]
    RoundNotFound { round_id: u64 },
}

/// Native value transfer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Wei,
        available: Wei,
    },

    #[error("Recipient {recipient} rejected transfer: {reason}")]
    Rejected { recipient: Address, reason: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// FundMe contract errors (the revert reasons of the contract surface)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FundMeError {
    #[error("Must send greater than 50 dollars!")]
    InsufficientContribution { sent: Wei, value: Usd },

    #[error("FundMe__NotOwner")]
    NotOwner,

    #[error("Call failed: {0}")]
    TransferFailed(TransferError),

    #[error("Price feed error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Function is not payable")]
    NonPayable,

    #[error("Funder index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Host chain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Wei,
        available: Wei,
    },

    #[error("Transaction reverted: {0}")]
    Reverted(#[from] FundMeError),

    #[error("Arithmetic overflow in gas calculation")]
    Overflow,
}

/// Network configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown network: {name}")]
    UnknownNetwork { name: String },

    #[error("No price feed configured for network {network}")]
    MissingPriceFeed { network: String },

    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {message}")]
    Parse { message: String },
}

/// Deployment errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeployError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mock price feed not deployed on development network {network}")]
    MockNotDeployed { network: String },

    #[error("Chain id mismatch: network {network} expects {expected}, node reports {actual}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
}
