//! Contribution — deposit validation and recording
//!
//! A deposit is priced through the feed on every call and accepted only if
//! it is worth at least `MINIMUM_USD`. Rejection happens before the ledger
//! is touched.

use tracing::debug;
use types::ids::Address;
use types::units::{Usd, Wei};

use crate::errors::FundMeError;
use crate::events::Funded;
use crate::ledger::Ledger;
use crate::oracle::{get_conversion_rate, PriceOracle};

/// Smallest deposit the contract accepts, in reference currency
pub const MINIMUM_USD: Usd = Usd::from_dollars(50);

/// Validate a deposit of `amount` from `funder` and record it in `ledger`.
///
/// The value itself is already held by the contract when this runs; the
/// enclosing call reverts the escrow if this returns an error.
pub fn deposit(
    ledger: &mut Ledger,
    oracle: &dyn PriceOracle,
    funder: Address,
    amount: Wei,
) -> Result<Funded, FundMeError> {
    if amount.is_zero() {
        return Err(FundMeError::InsufficientContribution {
            sent: amount,
            value: Usd::ZERO,
        });
    }

    let rate = oracle.current_rate()?;
    let usd_value = get_conversion_rate(amount, rate)?;
    if usd_value < MINIMUM_USD {
        return Err(FundMeError::InsufficientContribution {
            sent: amount,
            value: usd_value,
        });
    }

    let funder_index = ledger.record(funder, amount)?;
    debug!(
        funder = %funder,
        amount = %amount,
        usd_value = %usd_value,
        funder_index,
        "Deposit accepted"
    );

    Ok(Funded {
        funder,
        amount,
        usd_value,
        funder_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OracleError;
    use crate::oracle::MockV3Aggregator;

    fn feed() -> MockV3Aggregator {
        MockV3Aggregator::new(8, 200_000_000_000, 0)
    }

    #[test]
    fn test_deposit_below_minimum_rejected() {
        let mut ledger = Ledger::new();
        let alice = Address::from_low_u64(1);

        let result = deposit(&mut ledger, &feed(), alice, Wei::from_ether("0.01").unwrap());
        assert_eq!(
            result,
            Err(FundMeError::InsufficientContribution {
                sent: Wei::from_ether("0.01").unwrap(),
                value: Usd::from_dollars(20),
            })
        );
        assert_eq!(ledger, Ledger::new());
    }

    #[test]
    fn test_deposit_zero_rejected() {
        let mut ledger = Ledger::new();
        let result = deposit(&mut ledger, &feed(), Address::from_low_u64(1), Wei::ZERO);
        assert!(matches!(
            result,
            Err(FundMeError::InsufficientContribution { .. })
        ));
    }

    #[test]
    fn test_deposit_exactly_minimum_accepted() {
        let mut ledger = Ledger::new();
        let alice = Address::from_low_u64(1);
        // 50 USD at 2000 USD/ETH
        let amount = Wei::from_ether("0.025").unwrap();

        let funded = deposit(&mut ledger, &feed(), alice, amount).unwrap();
        assert_eq!(funded.usd_value, MINIMUM_USD);
        assert_eq!(ledger.balance_of(&alice), amount);
    }

    #[test]
    fn test_deposit_one_wei_under_minimum_rejected() {
        let mut ledger = Ledger::new();
        let amount = Wei::new(Wei::from_ether("0.025").unwrap().as_u128() - 1);
        let result = deposit(&mut ledger, &feed(), Address::from_low_u64(1), amount);
        assert!(result.is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_deposit_records_event_fields() {
        let mut ledger = Ledger::new();
        let alice = Address::from_low_u64(1);

        deposit(&mut ledger, &feed(), alice, Wei::from_ether_units(1)).unwrap();
        let funded = deposit(&mut ledger, &feed(), alice, Wei::from_ether_units(1)).unwrap();

        assert_eq!(funded.funder_index, 1);
        assert_eq!(funded.usd_value, Usd::from_dollars(2000));
        assert_eq!(ledger.balance_of(&alice), Wei::from_ether_units(2));
    }

    #[test]
    fn test_deposit_fails_on_bad_feed_answer() {
        let mut ledger = Ledger::new();
        let broken = MockV3Aggregator::new(8, -1, 0);
        let result = deposit(&mut ledger, &broken, Address::from_low_u64(1), Wei::from_ether_units(1));
        assert_eq!(
            result,
            Err(FundMeError::Oracle(OracleError::InvalidAnswer { answer: -1 }))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_deposit_tracks_price_moves() {
        let mut ledger = Ledger::new();
        let mut mock = feed();
        let amount = Wei::from_ether("0.03").unwrap(); // 60 USD at 2000

        assert!(deposit(&mut ledger, &mock, Address::from_low_u64(1), amount).is_ok());

        mock.update_answer(100_000_000_000, 1); // 1000 USD/ETH → 30 USD
        assert!(deposit(&mut ledger, &mock, Address::from_low_u64(1), amount).is_err());
        assert_eq!(ledger.len(), 1);
    }
}
