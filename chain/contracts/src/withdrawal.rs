//! Withdrawal — owner drains the contract
//!
//! Order is fixed:
//! 1. Authorization (`NotOwner` before anything is read or written)
//! 2. Effects: zero every balance and empty the funders log
//! 3. Interaction: send the whole held balance to the owner
//!
//! The transfer may run recipient code that calls back into the contract.
//! By the time it does, the ledger already reads as drained. A failed
//! transfer fails the call, and the host rolls back step 2 with it.

use tracing::info;
use types::ids::Address;

use crate::chain::Chain;
use crate::errors::FundMeError;
use crate::events::Withdrawn;
use crate::fund_me::FundMe;

pub(crate) fn withdraw(
    contract: &mut FundMe,
    chain: &mut Chain,
    caller: &Address,
) -> Result<Withdrawn, FundMeError> {
    contract.access_control().require_owner(caller)?;

    // Effects
    let funders_cleared = contract.ledger_mut().clear();

    // Interaction
    let owner = contract.owner();
    let amount = chain.balance_of(&contract.address());
    chain
        .transfer_from_contract(contract, owner, amount)
        .map_err(FundMeError::TransferFailed)?;

    info!(
        owner = %owner,
        amount = %amount,
        funders_cleared,
        "Withdrawal sent"
    );

    Ok(Withdrawn {
        owner,
        amount,
        funders_cleared,
    })
}
