//! FundMe Contract Logic
//!
//! A contribution ledger with threshold-gated deposits and single-owner
//! withdrawal, together with the in-process host it runs on and the
//! deployment glue that wires it to a price feed.
//!
//! # Modules
//! - `errors`: Contract, chain, and deployment error types
//! - `events`: Events emitted by successful calls
//! - `security`: Single-owner access control
//! - `oracle`: Price feed interface, mock and pinned providers, conversion
//! - `ledger`: Per-funder balances and the funders log
//! - `contribution`: Deposit validation against the USD minimum
//! - `withdrawal`: Owner withdrawal, effects before interactions
//! - `fund_me`: The contract surface and call routing
//! - `chain`: Atomic, gas-metered host with receive hooks
//! - `network`: Per-network deployment configuration
//! - `deploy`: Mock and contract deployment
//!
//! # Version
//! v0.1.0

pub mod chain;
pub mod contribution;
pub mod deploy;
pub mod errors;
pub mod events;
pub mod fund_me;
pub mod ledger;
pub mod network;
pub mod oracle;
pub mod security;
pub mod withdrawal;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
