//! Protocol types exchanged between the terminal and the bank
//!
//! This module defines the request payload ([`Message`]) sent for every
//! transaction attempt and the closed set of responses ([`Status`]) the
//! terminal must react to deterministically.

use super::account::{AccountSlot, Balances, CardNumber, Pin, SerialNumber};
use super::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Operations the bank accepts
///
/// Deposits are two-phase: `InitiateDeposit` only validates the target
/// account, `CompleteDeposit` performs the credit once the envelope has
/// been physically accepted. Both phases of one deposit carry the same
/// serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Debit an account, gated by the daily withdrawal limit
    Withdrawal,

    /// Validate a deposit target; mutates nothing
    InitiateDeposit,

    /// Credit the posted balance of a deposit target
    ///
    /// The available balance is deliberately left untouched, modeling a
    /// hold on uncollected funds.
    CompleteDeposit,

    /// Move funds between two of the card's accounts
    Transfer,

    /// Read balances; never mutates
    Inquiry,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Withdrawal => "withdrawal",
            MessageKind::InitiateDeposit => "initiate_deposit",
            MessageKind::CompleteDeposit => "complete_deposit",
            MessageKind::Transfer => "transfer",
            MessageKind::Inquiry => "inquiry",
        };
        f.write_str(name)
    }
}

/// One transaction request as sent to the bank
///
/// Immutable once built. `from`/`to` are `None` when the kind does not
/// use them; a message whose required slot is missing for its kind is a
/// programming error on the terminal side, not a business decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// The requested operation
    pub kind: MessageKind,

    /// Card number the request is made on
    pub card: CardNumber,

    /// PIN entered by the customer for this attempt
    pub pin: Pin,

    /// Serial number correlating related messages
    pub serial: SerialNumber,

    /// Source account slot (withdrawal, transfer, inquiry)
    pub from: Option<AccountSlot>,

    /// Destination account slot (deposit phases, transfer)
    pub to: Option<AccountSlot>,

    /// Requested amount; zero for inquiries
    pub amount: Money,
}

/// Reason a request was declined by a business rule
///
/// Each variant surfaces a distinct customer-facing reason string.
/// Declines are not errors: the session stays active and the ledger is
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The card number is not known to the bank
    #[error("invalid card")]
    InvalidCard,

    /// The referenced slot has no linked account
    #[error("invalid account")]
    InvalidAccount,

    /// The amount would exceed the card's remaining daily limit
    #[error("daily limit exceeded")]
    DailyLimitExceeded,

    /// The amount exceeds the account's available balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Transfer source and destination resolve to the same account
    #[error("same account")]
    SameAccount,
}

/// Bank response to one message
///
/// `InvalidPin` is a distinguished failure the terminal must
/// special-case: it feeds the session's retry counter instead of ending
/// the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Request applied (or, for `InitiateDeposit`, validated); carries
    /// the refreshed balances of the reported account
    Success(Balances),

    /// Request declined by a business rule
    Failure(FailureReason),

    /// The PIN did not match the card
    InvalidPin,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success(_))
    }

    pub fn is_invalid_pin(&self) -> bool {
        matches!(self, Status::InvalidPin)
    }

    /// Balances reported with an approval, if any
    pub fn balances(&self) -> Option<Balances> {
        match self {
            Status::Success(balances) => Some(*balances),
            _ => None,
        }
    }
}
