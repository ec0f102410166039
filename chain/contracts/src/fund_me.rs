//! FundMe — the externally callable contract surface
//!
//! Composes the ledger, the owner check, and the price feed handle. Every
//! entry point takes the call `Message` (sender and attached value) and the
//! host `Chain` it executes on. The host has already moved `msg.value` into
//! the contract's account before an entry point runs.

use tracing::trace;
use types::ids::Address;
use types::units::Wei;

use crate::chain::Chain;
use crate::contribution;
use crate::errors::FundMeError;
use crate::events::ContractEvent;
use crate::ledger::Ledger;
use crate::security::AccessControl;
use crate::withdrawal;

/// Sender and attached value of the current call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub sender: Address,
    pub value: Wei,
}

/// Entry point selected by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fund,
    Withdraw,
    /// Plain value transfer with no calldata
    Transfer,
    /// Arbitrary calldata; empty data behaves like `Transfer`
    Raw(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct FundMe {
    address: Address,
    access_control: AccessControl,
    price_feed: Address,
    ledger: Ledger,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl FundMe {
    /// Construct the contract at `address`, owned by `owner`, pricing deposits through `price_feed`.
    pub fn new(address: Address, owner: Address, price_feed: Address) -> Self {
        Self {
            address,
            access_control: AccessControl::new(owner),
            price_feed,
            ledger: Ledger::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Entry Points ─────────────────────────

    /// Route a call to its entry point.
    pub(crate) fn dispatch(
        &mut self,
        chain: &mut Chain,
        msg: &Message,
        call: &Call,
    ) -> Result<ContractEvent, FundMeError> {
        match call {
            Call::Fund => self.fund(chain, msg),
            Call::Withdraw => self.withdraw(chain, msg),
            Call::Transfer => self.receive(chain, msg),
            Call::Raw(data) if data.is_empty() => self.receive(chain, msg),
            Call::Raw(data) => self.fallback(chain, msg, data),
        }
    }

    /// Accept `msg.value` if it is worth at least the minimum.
    pub(crate) fn fund(&mut self, chain: &Chain, msg: &Message) -> Result<ContractEvent, FundMeError> {
        let oracle = chain.oracle(&self.price_feed)?;
        let funded = contribution::deposit(&mut self.ledger, oracle, msg.sender, msg.value)?;
        Ok(self.emit(ContractEvent::Funded(funded)))
    }

    /// Send everything the contract holds to the owner and reset the ledger.
    pub(crate) fn withdraw(&mut self, chain: &mut Chain, msg: &Message) -> Result<ContractEvent, FundMeError> {
        if !msg.value.is_zero() {
            return Err(FundMeError::NonPayable);
        }
        let withdrawn = withdrawal::withdraw(self, chain, &msg.sender)?;
        Ok(self.emit(ContractEvent::Withdrawn(withdrawn)))
    }

    /// Value sent without calldata is treated as a deposit.
    pub(crate) fn receive(&mut self, chain: &Chain, msg: &Message) -> Result<ContractEvent, FundMeError> {
        self.fund(chain, msg)
    }

    /// Calls with unrecognized calldata are treated as a deposit.
    pub(crate) fn fallback(
        &mut self,
        chain: &Chain,
        msg: &Message,
        data: &[u8],
    ) -> Result<ContractEvent, FundMeError> {
        trace!(sender = %msg.sender, calldata_len = data.len(), "Fallback routed to fund");
        self.fund(chain, msg)
    }

    // ───────────────────────── Accessors ─────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.access_control.owner()
    }

    /// Address of the price feed this contract reads.
    pub fn price_feed(&self) -> Address {
        self.price_feed
    }

    pub fn address_to_amount_funded(&self, funder: &Address) -> Wei {
        self.ledger.balance_of(funder)
    }

    /// Funders log entry at `index`; reading past the end fails.
    pub fn funder(&self, index: usize) -> Result<Address, FundMeError> {
        self.ledger.funder(index).ok_or(FundMeError::IndexOutOfBounds {
            index,
            len: self.ledger.len(),
        })
    }

    pub fn funders(&self) -> &[Address] {
        self.ledger.funders()
    }

    pub fn funders_len(&self) -> usize {
        self.ledger.len()
    }

    /// Sum of all recorded balances.
    pub fn total_funded(&self) -> Result<Wei, FundMeError> {
        self.ledger.total()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn access_control(&self) -> &AccessControl {
        &self.access_control
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        self.events.push(event.clone());
        event
    }
}
