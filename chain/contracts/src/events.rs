//! Contract events
//!
//! Events are immutable records emitted by successful contract calls.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::units::{Usd, Wei};

/// A deposit cleared the minimum and was recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funded {
    pub funder: Address,
    pub amount: Wei,
    pub usd_value: Usd,
    /// Position of this deposit in the funders log
    pub funder_index: usize,
}

/// The owner drained the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub owner: Address,
    pub amount: Wei,
    /// Funders log entries removed by this withdrawal
    pub funders_cleared: usize,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Funded(Funded),
    Withdrawn(Withdrawn),
}
