//! Fixed-point amount types
//!
//! Both the native currency and the reference currency carry 18 fractional
//! decimals and are backed by `u128`. Arithmetic is checked; callers decide
//! how an overflow is surfaced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnitsError;

/// Fractional decimals of both `Wei` and `Usd`
pub const DECIMALS: u32 = 18;

/// One whole unit (1 ether, 1 dollar) in base units
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Parse a human decimal string ("0.01", "2000") into 18-decimal base units.
fn parse_fixed18(input: &str) -> Result<u128, UnitsError> {
    let invalid = || UnitsError::InvalidAmount {
        input: input.to_string(),
    };
    let value = Decimal::from_str(input.trim()).map_err(|_| invalid())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid());
    }
    let value = value.normalize();
    if value.scale() > DECIMALS {
        return Err(UnitsError::TooPrecise {
            input: input.to_string(),
        });
    }
    value
        .mantissa()
        .unsigned_abs()
        .checked_mul(10u128.pow(DECIMALS - value.scale()))
        .ok_or(UnitsError::Overflow)
}

fn fmt_fixed18(value: u128, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let whole = value / ONE;
    let frac = value % ONE;
    if frac == 0 {
        return write!(f, "{}", whole);
    }
    let digits = format!("{:018}", frac);
    write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
}

/// Amount of native currency in its smallest unit (1 ether = 10^18 wei)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wei(u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    /// Whole ether amount
    pub const fn from_ether_units(ether: u64) -> Self {
        Self(ether as u128 * ONE)
    }

    /// Parse an ether string such as `"0.01"` exactly.
    pub fn from_ether(input: &str) -> Result<Self, UnitsError> {
        parse_fixed18(input).map(Self)
    }

    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Wei) -> Option<Wei> {
        self.0.checked_add(other.0).map(Wei)
    }

    pub fn checked_sub(self, other: Wei) -> Option<Wei> {
        self.0.checked_sub(other.0).map(Wei)
    }

    pub fn checked_mul(self, factor: u128) -> Option<Wei> {
        self.0.checked_mul(factor).map(Wei)
    }

    /// Ether value as a decimal, for reporting.
    pub fn to_ether(&self) -> Result<Decimal, UnitsError> {
        let mantissa = i128::try_from(self.0).map_err(|_| UnitsError::Overflow)?;
        Decimal::try_from_i128_with_scale(mantissa, DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| UnitsError::Overflow)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fixed18(self.0, f)?;
        write!(f, " ETH")
    }
}

impl FromStr for Wei {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ether(s)
    }
}

/// Reference-currency value with 18 fractional decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(u128);

impl Usd {
    pub const ZERO: Usd = Usd(0);

    /// Raw 18-decimal value
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars as u128 * ONE)
    }

    pub const fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fixed18(self.0, f)?;
        write!(f, " USD")
    }
}
