//! Price feed interface and providers
//!
//! The contract only ever asks a feed for its latest round. Two providers
//! implement the same `PriceOracle` trait:
//! - `MockV3Aggregator`: locally deployed feed for development networks,
//!   answer can be updated between calls
//! - `PinnedAggregator`: read-only replica of a remote feed, serving the round
//!   it was pinned at
//!
//! Conversion from native units to reference currency is integer fixed-point.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use types::units::{Usd, Wei, DECIMALS};

use crate::errors::OracleError;

/// Fractional decimals of the native unit (wei per ether)
pub const NATIVE_DECIMALS: u32 = DECIMALS;

/// Fractional decimals of the reference currency value
pub const USD_DECIMALS: u32 = DECIMALS;

/// One aggregator round, as returned by `latest_round_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: i64,
    pub updated_at: i64,
    pub answered_in_round: u64,
}

/// Validated exchange rate: `price` reference units per native unit, scaled by `10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub price: u128,
    pub decimals: u8,
}

/// Read surface of a price feed.
pub trait PriceOracle: Any {
    /// Decimals of `answer`.
    fn decimals(&self) -> u8;

    fn description(&self) -> &str;

    fn latest_round_data(&self) -> Result<RoundData, OracleError>;

    /// Latest answer as a usable rate. Non-positive answers are rejected.
    fn current_rate(&self) -> Result<Rate, OracleError> {
        let round = self.latest_round_data()?;
        if round.answer <= 0 {
            return Err(OracleError::InvalidAnswer {
                answer: round.answer,
            });
        }
        Ok(Rate {
            price: round.answer.unsigned_abs(),
            decimals: self.decimals(),
        })
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Convert a native amount into reference-currency value.
///
/// `value = amount * price / 10^(NATIVE_DECIMALS + rate.decimals - USD_DECIMALS)`
///
/// The product is taken in 256 bits. A value wider than `Usd` saturates at
/// `u128::MAX`, which is above any threshold.
pub fn get_conversion_rate(amount: Wei, rate: Rate) -> Result<Usd, OracleError> {
    let product = U256::from(amount.as_u128()) * U256::from(rate.price);

    let exponent = NATIVE_DECIMALS as i64 + rate.decimals as i64 - USD_DECIMALS as i64;
    let scale = U256::from(10u8).checked_pow(U256::from(exponent.unsigned_abs()));
    let value = match (exponent >= 0, scale) {
        (true, Some(divisor)) => product / divisor,
        // A divisor wider than 256 bits truncates any product to zero.
        (true, None) => U256::zero(),
        (false, Some(factor)) => product.checked_mul(factor).unwrap_or(U256::MAX),
        (false, None) if product.is_zero() => U256::zero(),
        (false, None) => U256::MAX,
    };

    if value > U256::from(u128::MAX) {
        return Ok(Usd::new(u128::MAX));
    }
    Ok(Usd::new(value.low_u128()))
}

// ───────────────────────── Mock Aggregator ─────────────────────────

/// Development-network price feed with a settable answer.
///
/// Every update opens a new round; earlier rounds stay queryable.
#[derive(Debug, Clone)]
pub struct MockV3Aggregator {
    decimals: u8,
    latest_answer: i128,
    latest_timestamp: i64,
    latest_round: u64,
    rounds: BTreeMap<u64, RoundData>,
}

impl MockV3Aggregator {
    pub const DESCRIPTION: &'static str = "v0.8/tests/MockV3Aggregator.sol";

    /// Create a mock with `decimals` and an opening answer at `timestamp`.
    pub fn new(decimals: u8, initial_answer: i128, timestamp: i64) -> Self {
        let mut mock = Self {
            decimals,
            latest_answer: 0,
            latest_timestamp: 0,
            latest_round: 0,
            rounds: BTreeMap::new(),
        };
        mock.update_answer(initial_answer, timestamp);
        mock
    }

    /// Publish a new answer as the next round.
    pub fn update_answer(&mut self, answer: i128, timestamp: i64) {
        self.latest_answer = answer;
        self.latest_timestamp = timestamp;
        self.latest_round += 1;
        self.rounds.insert(
            self.latest_round,
            RoundData {
                round_id: self.latest_round,
                answer,
                started_at: timestamp,
                updated_at: timestamp,
                answered_in_round: self.latest_round,
            },
        );
    }

    /// Overwrite a specific round and make it the latest.
    pub fn update_round_data(&mut self, round_id: u64, answer: i128, timestamp: i64, started_at: i64) {
        self.latest_round = round_id;
        self.latest_answer = answer;
        self.latest_timestamp = timestamp;
        self.rounds.insert(
            round_id,
            RoundData {
                round_id,
                answer,
                started_at,
                updated_at: timestamp,
                answered_in_round: round_id,
            },
        );
    }

    pub fn get_round_data(&self, round_id: u64) -> Result<RoundData, OracleError> {
        self.rounds
            .get(&round_id)
            .copied()
            .ok_or(OracleError::RoundNotFound { round_id })
    }

    pub fn latest_answer(&self) -> i128 {
        self.latest_answer
    }

    pub fn latest_round(&self) -> u64 {
        self.latest_round
    }
}

impl PriceOracle for MockV3Aggregator {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn latest_round_data(&self) -> Result<RoundData, OracleError> {
        self.get_round_data(self.latest_round)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ───────────────────────── Pinned Aggregator ─────────────────────────

/// Read-only replica of a remote feed, frozen at one round.
#[derive(Debug, Clone)]
pub struct PinnedAggregator {
    description: String,
    decimals: u8,
    round: RoundData,
}

impl PinnedAggregator {
    pub fn new(description: impl Into<String>, decimals: u8, round: RoundData) -> Self {
        Self {
            description: description.into(),
            decimals,
            round,
        }
    }
}

impl PriceOracle for PinnedAggregator {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn latest_round_data(&self) -> Result<RoundData, OracleError> {
        Ok(self.round)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
