//! Ledger — per-funder balances and the funders log
//!
//! Balances accumulate per address. The log gets one entry per accepted
//! deposit, so a repeat funder appears once per deposit. Both are only
//! changed together: `record` appends and credits, `clear` zeroes and empties.

use std::collections::HashMap;
use types::ids::Address;
use types::units::Wei;

use crate::errors::FundMeError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// Cumulative amount funded per address
    balances: HashMap<Address, Wei>,
    /// One entry per accepted deposit, in call order
    funders: Vec<Address>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `funder` and append them to the log.
    ///
    /// Returns the log index of the new entry. On overflow nothing is written.
    pub fn record(&mut self, funder: Address, amount: Wei) -> Result<usize, FundMeError> {
        let new_balance = self
            .balance_of(&funder)
            .checked_add(amount)
            .ok_or(FundMeError::Overflow)?;

        self.balances.insert(funder, new_balance);
        self.funders.push(funder);
        Ok(self.funders.len() - 1)
    }

    /// Zero every balance and empty the log.
    ///
    /// Returns the number of log entries removed.
    pub fn clear(&mut self) -> usize {
        for balance in self.balances.values_mut() {
            *balance = Wei::ZERO;
        }
        let cleared = self.funders.len();
        self.funders.clear();
        cleared
    }

    /// Amount funded by an address; zero if it never funded.
    pub fn balance_of(&self, funder: &Address) -> Wei {
        self.balances.get(funder).copied().unwrap_or(Wei::ZERO)
    }

    /// Log entry at `index`.
    pub fn funder(&self, index: usize) -> Option<Address> {
        self.funders.get(index).copied()
    }

    pub fn funders(&self) -> &[Address] {
        &self.funders
    }

    pub fn len(&self) -> usize {
        self.funders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funders.is_empty()
    }

    /// Every address that has ever funded, with its current balance.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Wei)> {
        self.balances.iter()
    }

    /// Sum of all balances.
    pub fn total(&self) -> Result<Wei, FundMeError> {
        self.balances
            .values()
            .try_fold(Wei::ZERO, |acc, b| acc.checked_add(*b))
            .ok_or(FundMeError::Overflow)
    }
}
