//! Chain — in-process host for the FundMe contract
//!
//! Provides what the contract assumes from its execution environment:
//! - Account balances and nonces
//! - A total order over transactions, one block per transaction
//! - All-or-nothing calls: accounts and contract state are snapshotted and
//!   restored when a call fails
//! - Gas charged to the sender, kept even when the call reverts
//! - Price feeds registered by address
//! - Receive hooks: code run when an address receives value, which may call
//!   back into the contract

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{debug, warn};
use types::ids::Address;
use types::units::Wei;
use uuid::Uuid;

use crate::errors::{ChainError, FundMeError, OracleError, TransferError};
use crate::events::ContractEvent;
use crate::fund_me::{Call, FundMe, Message};
use crate::oracle::PriceOracle;

/// Gas charged for every transaction
pub const BASE_TX_GAS: u64 = 21_000;

/// Seconds between blocks
pub const BLOCK_TIME_SECS: i64 = 12;

/// Default gas price (1 gwei)
pub const DEFAULT_GAS_PRICE: Wei = Wei::new(1_000_000_000);

/// A signed call into the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    pub value: Wei,
    pub call: Call,
}

impl Transaction {
    pub fn fund(from: Address, value: Wei) -> Self {
        Self {
            from,
            value,
            call: Call::Fund,
        }
    }

    pub fn withdraw(from: Address) -> Self {
        Self {
            from,
            value: Wei::ZERO,
            call: Call::Withdraw,
        }
    }

    /// Plain value transfer to the contract.
    pub fn transfer(from: Address, value: Wei) -> Self {
        Self {
            from,
            value,
            call: Call::Transfer,
        }
    }

    pub fn raw(from: Address, value: Wei, data: Vec<u8>) -> Self {
        Self {
            from,
            value,
            call: Call::Raw(data),
        }
    }
}

/// Outcome of a successful transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub tx_id: Uuid,
    pub block_number: u64,
    pub gas_used: u64,
    pub effective_gas_price: Wei,
    /// Events emitted during this transaction, nested calls included
    pub events: Vec<ContractEvent>,
}

impl Receipt {
    /// Total fee paid by the sender.
    pub fn gas_cost(&self) -> Wei {
        self.effective_gas_price
            .checked_mul(self.gas_used as u128)
            .unwrap_or(Wei::new(u128::MAX))
    }
}

/// Code that runs when an address receives value from the contract.
///
/// Returning an error rejects the transfer.
pub trait ReceiveHook {
    fn on_receive(&mut self, reentry: &mut Reentry<'_>, from: Address, amount: Wei) -> Result<(), String>;
}

/// Handle given to a receive hook for calling back into the contract.
pub struct Reentry<'a> {
    chain: &'a mut Chain,
    contract: &'a mut FundMe,
    account: Address,
}

impl Reentry<'_> {
    /// Address the hook runs as.
    pub fn account(&self) -> Address {
        self.account
    }

    pub fn contract(&self) -> &FundMe {
        &*self.contract
    }

    pub fn chain(&self) -> &Chain {
        &*self.chain
    }

    /// Nested call from the hook's account into the contract.
    ///
    /// Atomic on its own: a failure undoes only the nested call.
    pub fn call(&mut self, value: Wei, call: Call) -> Result<ContractEvent, FundMeError> {
        let msg = Message {
            sender: self.account,
            value,
        };
        let to = self.contract.address();
        self.chain.atomically(self.contract, |chain, contract| {
            chain
                .move_value(msg.sender, to, msg.value)
                .map_err(FundMeError::TransferFailed)?;
            contract.dispatch(chain, &msg, &call)
        })
    }
}

pub struct Chain {
    chain_id: u64,
    accounts: HashMap<Address, Wei>,
    nonces: HashMap<Address, u64>,
    oracles: HashMap<Address, Box<dyn PriceOracle>>,
    hooks: HashMap<Address, Box<dyn ReceiveHook>>,
    block_number: u64,
    timestamp: i64,
    gas_price: Wei,
}

impl Chain {
    /// Start a chain at genesis, timestamped now.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            accounts: HashMap::new(),
            nonces: HashMap::new(),
            oracles: HashMap::new(),
            hooks: HashMap::new(),
            block_number: 0,
            timestamp: Utc::now().timestamp(),
            gas_price: DEFAULT_GAS_PRICE,
        }
    }

    pub fn with_gas_price(mut self, gas_price: Wei) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn gas_price(&self) -> Wei {
        self.gas_price
    }

    // ───────────────────────── Accounts ─────────────────────────

    pub fn balance_of(&self, account: &Address) -> Wei {
        self.accounts.get(account).copied().unwrap_or(Wei::ZERO)
    }

    /// Set an account's balance directly (genesis allocation).
    pub fn set_balance(&mut self, account: Address, balance: Wei) {
        self.accounts.insert(account, balance);
    }

    /// Create `count` prefunded accounts at addresses 1..=count.
    pub fn dev_accounts(&mut self, count: u64, balance: Wei) -> Vec<Address> {
        (1..=count)
            .map(|i| {
                let account = Address::from_low_u64(i);
                self.set_balance(account, balance);
                account
            })
            .collect()
    }

    pub fn nonce_of(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    /// Address the next contract created by `deployer` will get.
    pub fn next_contract_address(&self, deployer: &Address) -> Address {
        let mut hasher = Sha256::new();
        hasher.update(deployer.as_bytes());
        hasher.update(self.nonce_of(deployer).to_be_bytes());
        Address::from_digest_tail(&hasher.finalize())
    }

    /// Reserve a contract address for `deployer`, consuming a nonce.
    pub fn create_address(&mut self, deployer: &Address) -> Address {
        let address = self.next_contract_address(deployer);
        *self.nonces.entry(*deployer).or_insert(0) += 1;
        address
    }

    // ───────────────────────── Price Feeds ─────────────────────────

    /// Deploy a feed from `deployer` and return its address.
    pub fn deploy_oracle(&mut self, deployer: &Address, oracle: Box<dyn PriceOracle>) -> Address {
        let address = self.create_address(deployer);
        debug!(address = %address, description = oracle.description(), "Price feed deployed");
        self.oracles.insert(address, oracle);
        address
    }

    /// Place a feed at a fixed address (a feed that already exists on the network).
    pub fn install_oracle(&mut self, address: Address, oracle: Box<dyn PriceOracle>) {
        self.oracles.insert(address, oracle);
    }

    pub fn oracle(&self, address: &Address) -> Result<&dyn PriceOracle, OracleError> {
        self.oracles
            .get(address)
            .map(|o| o.as_ref())
            .ok_or(OracleError::NotDeployed { address: *address })
    }

    /// Concrete feed at `address`, if one of type `T` is registered there.
    pub fn oracle_mut<T: PriceOracle>(&mut self, address: &Address) -> Option<&mut T> {
        self.oracles
            .get_mut(address)
            .and_then(|o| o.as_any_mut().downcast_mut::<T>())
    }

    // ───────────────────────── Receive Hooks ─────────────────────────

    pub fn set_receive_hook(&mut self, account: Address, hook: Box<dyn ReceiveHook>) {
        self.hooks.insert(account, hook);
    }

    pub fn remove_receive_hook(&mut self, account: &Address) -> Option<Box<dyn ReceiveHook>> {
        self.hooks.remove(account)
    }

    // ───────────────────────── Transactions ─────────────────────────

    /// Execute one transaction against `contract` as its own block.
    ///
    /// Gas is charged up front and kept. Everything else the call did is
    /// undone if it fails.
    pub fn transact(&mut self, contract: &mut FundMe, tx: Transaction) -> Result<Receipt, ChainError> {
        let gas_used = BASE_TX_GAS;
        let effective_gas_price = self.gas_price;
        let gas_cost = effective_gas_price
            .checked_mul(gas_used as u128)
            .ok_or(ChainError::Overflow)?;
        let required = tx.value.checked_add(gas_cost).ok_or(ChainError::Overflow)?;
        let available = self.balance_of(&tx.from);
        if available < required {
            return Err(ChainError::InsufficientFunds {
                account: tx.from,
                required,
                available,
            });
        }

        self.accounts.insert(tx.from, Wei::new(available.as_u128() - gas_cost.as_u128()));
        *self.nonces.entry(tx.from).or_insert(0) += 1;

        let events_before = contract.events().len();
        let msg = Message {
            sender: tx.from,
            value: tx.value,
        };
        let to = contract.address();
        let outcome = self.atomically(contract, |chain, contract| {
            chain
                .move_value(msg.sender, to, msg.value)
                .map_err(FundMeError::TransferFailed)?;
            contract.dispatch(chain, &msg, &tx.call)
        });

        self.block_number += 1;
        self.timestamp += BLOCK_TIME_SECS;

        match outcome {
            Ok(_) => Ok(Receipt {
                tx_id: Uuid::now_v7(),
                block_number: self.block_number,
                gas_used,
                effective_gas_price,
                events: contract.events()[events_before..].to_vec(),
            }),
            Err(err) => {
                warn!(
                    from = %tx.from,
                    call = ?tx.call,
                    block = self.block_number,
                    error = %err,
                    "Transaction reverted"
                );
                Err(ChainError::Reverted(err))
            }
        }
    }

    /// Run `f`, restoring balances and contract state if it fails.
    fn atomically<T>(
        &mut self,
        contract: &mut FundMe,
        f: impl FnOnce(&mut Chain, &mut FundMe) -> Result<T, FundMeError>,
    ) -> Result<T, FundMeError> {
        let accounts = self.accounts.clone();
        let saved = contract.clone();
        let result = f(self, contract);
        if result.is_err() {
            self.accounts = accounts;
            *contract = saved;
        }
        result
    }

    /// Move value between accounts without running any hook.
    fn move_value(&mut self, from: Address, to: Address, amount: Wei) -> Result<(), TransferError> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(&from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                account: from,
                required: amount,
                available,
            })?;
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.accounts.insert(from, remaining);
        self.accounts.insert(to, credited);
        Ok(())
    }

    /// Send value out of `contract` to `to`, then run `to`'s receive hook.
    ///
    /// The hook may call back into `contract`. While it runs, `to` has no
    /// hook installed, so a nested transfer to the same address is plain.
    pub(crate) fn transfer_from_contract(
        &mut self,
        contract: &mut FundMe,
        to: Address,
        amount: Wei,
    ) -> Result<(), TransferError> {
        let from = contract.address();
        self.move_value(from, to, amount)?;

        if let Some(mut hook) = self.hooks.remove(&to) {
            let result = {
                let mut reentry = Reentry {
                    chain: &mut *self,
                    contract: &mut *contract,
                    account: to,
                };
                hook.on_receive(&mut reentry, from, amount)
            };
            self.hooks.insert(to, hook);
            result.map_err(|reason| TransferError::Rejected {
                recipient: to,
                reason,
            })?;
        }
        Ok(())
    }
}
