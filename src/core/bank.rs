//! Bank validator and message router
//!
//! This module provides the `Bank`, the single logical authority every
//! terminal submits its messages to. The bank authenticates the card and
//! PIN, resolves card-local account slots through its directory, and
//! dispatches to the ledger rule for the requested kind.
//!
//! The card directory and PIN table are read-only seed data; all mutable
//! state lives in the [`AccountLedger`].

use crate::core::ledger::{AccountLedger, DailyLimits, Decision};
use crate::types::{
    AccountNumber, AccountSlot, AtmError, CardNumber, FailureReason, Message, MessageKind, Money,
    Pin, Status,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Limits and terminal policy configured at startup
///
/// Defaults match the stock simulation: 5,000,000 daily withdrawal,
/// 10,000,000 daily transfer, 10,000,000 terminal transfer ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankConfig {
    /// Maximum total withdrawn per card per day
    pub daily_withdrawal_limit: Money,

    /// Maximum total transferred per card per day
    pub daily_transfer_limit: Money,

    /// Largest single transfer the terminal will accept before
    /// re-prompting; a client-side policy, not a ledger rule
    pub transfer_ceiling: Money,
}

impl BankConfig {
    /// The ledger-enforced subset of this configuration
    pub fn daily_limits(&self) -> DailyLimits {
        DailyLimits {
            withdrawal: self.daily_withdrawal_limit,
            transfer: self.daily_transfer_limit,
        }
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            daily_withdrawal_limit: Money::from_units(5_000_000),
            daily_transfer_limit: Money::from_units(10_000_000),
            transfer_ceiling: Money::from_units(10_000_000),
        }
    }
}

/// Directory entry for one card: its PIN and linked accounts
///
/// One account number per [`AccountSlot`]; 0 means no account of that
/// type is linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRecord {
    /// PIN the customer must present
    pub pin: Pin,

    /// Linked account numbers, indexed by slot
    pub accounts: [AccountNumber; AccountSlot::COUNT],
}

impl CardRecord {
    pub fn new(pin: Pin, accounts: [AccountNumber; AccountSlot::COUNT]) -> Self {
        CardRecord { pin, accounts }
    }

    /// Account number linked at the given slot; 0 if none
    pub fn linked_account(&self, slot: AccountSlot) -> AccountNumber {
        self.accounts[slot.index()]
    }
}

/// The bank: authentication, slot resolution, and rule dispatch
///
/// `handle` is safe to call from any number of terminal threads
/// concurrently; serialization happens per account and per card inside
/// the ledger.
pub struct Bank {
    /// Card number to PIN/linkage directory (read-only)
    directory: HashMap<CardNumber, CardRecord>,

    /// Balance and daily-usage state
    ledger: AccountLedger,
}

impl Bank {
    /// Create a bank over a card directory and a seeded ledger
    pub fn new(directory: HashMap<CardNumber, CardRecord>, ledger: AccountLedger) -> Self {
        Bank { directory, ledger }
    }

    /// Handle one transaction message
    ///
    /// Validation short-circuits in order: card, PIN, slot resolution,
    /// kind-specific ledger rules. Business declines come back as
    /// `Status::Failure`; only programming faults use the `Err` channel.
    ///
    /// # Returns
    ///
    /// * `Ok(Status::Success(balances))` - applied (or validated, for
    ///   the initiate phase of a deposit)
    /// * `Ok(Status::Failure(reason))` - declined, ledger untouched
    /// * `Ok(Status::InvalidPin)` - PIN mismatch, ledger untouched
    /// * `Err(AtmError)` - programming fault
    pub fn handle(&self, message: &Message) -> Result<Status, AtmError> {
        let status = self.authorize(message)?;

        match &status {
            Status::Success(balances) => info!(
                card = message.card,
                serial = message.serial,
                kind = %message.kind,
                balance = %balances.balance,
                available = %balances.available,
                "request approved"
            ),
            Status::Failure(reason) => info!(
                card = message.card,
                serial = message.serial,
                kind = %message.kind,
                reason = %reason,
                "request declined"
            ),
            Status::InvalidPin => warn!(
                card = message.card,
                serial = message.serial,
                kind = %message.kind,
                "invalid PIN"
            ),
        }

        Ok(status)
    }

    /// Day-boundary hook: zero every card's daily usage counters
    pub fn reset_daily_totals(&self) -> Result<(), AtmError> {
        self.ledger.reset_daily_totals()
    }

    fn authorize(&self, message: &Message) -> Result<Status, AtmError> {
        let Some(record) = self.directory.get(&message.card) else {
            return Ok(Status::Failure(FailureReason::InvalidCard));
        };

        if message.pin != record.pin {
            return Ok(Status::InvalidPin);
        }

        let decision: Decision = match message.kind {
            MessageKind::Withdrawal => {
                match self.resolve(record, message.from, message.kind, "from")? {
                    Some(account) => {
                        self.ledger.withdraw(message.card, account, message.amount)?
                    }
                    None => Err(FailureReason::InvalidAccount),
                }
            }
            MessageKind::InitiateDeposit => {
                // Validate the target only; nothing is credited until
                // the envelope has been processed.
                match self.resolve(record, message.to, message.kind, "to")? {
                    Some(account) => self.ledger.balances(account)?,
                    None => Err(FailureReason::InvalidAccount),
                }
            }
            MessageKind::CompleteDeposit => {
                match self.resolve(record, message.to, message.kind, "to")? {
                    Some(account) => self.ledger.credit_deposit(account, message.amount)?,
                    None => Err(FailureReason::InvalidAccount),
                }
            }
            MessageKind::Transfer => {
                let from = self.resolve(record, message.from, message.kind, "from")?;
                let to = self.resolve(record, message.to, message.kind, "to")?;
                match (from, to) {
                    (Some(from), Some(to)) => {
                        self.ledger.transfer(message.card, from, to, message.amount)?
                    }
                    _ => Err(FailureReason::InvalidAccount),
                }
            }
            MessageKind::Inquiry => {
                match self.resolve(record, message.from, message.kind, "from")? {
                    Some(account) => self.ledger.balances(account)?,
                    None => Err(FailureReason::InvalidAccount),
                }
            }
        };

        Ok(match decision {
            Ok(balances) => Status::Success(balances),
            Err(reason) => Status::Failure(reason),
        })
    }

    /// Resolve a card-local slot to an account number
    ///
    /// `Ok(None)` means the slot has no linked account (a decline); a
    /// missing slot for a kind that requires it is a fault.
    fn resolve(
        &self,
        record: &CardRecord,
        slot: Option<AccountSlot>,
        kind: MessageKind,
        field: &'static str,
    ) -> Result<Option<AccountNumber>, AtmError> {
        let slot = slot.ok_or_else(|| AtmError::malformed_message(kind, field))?;
        let account = record.linked_account(slot);
        Ok((account != 0).then_some(account))
    }
}
