//! Error types for the ATM engine
//!
//! This module defines the faults that can occur outside the business
//! rules. Business declines (insufficient funds, daily limit, ...) are
//! not errors — they travel as [`FailureReason`](super::message::FailureReason)
//! values inside a [`Status`](super::message::Status). `AtmError` covers
//! everything that must not be silently recovered:
//!
//! # Error Categories
//!
//! - **Seed/configuration errors**: missing or malformed seed files,
//!   rows violating the ledger invariants. Fatal at startup.
//! - **I/O errors**: file access problems while loading seed data.
//! - **Programming errors**: malformed messages, non-positive mutation
//!   amounts, failed checked arithmetic, poisoned locks. These indicate
//!   a defect and are propagated, never converted to a decline.

use super::account::{AccountNumber, CardNumber};
use super::message::MessageKind;
use thiserror::Error;

/// Fatal error type for the ATM engine
///
/// Each variant carries enough context to diagnose the fault. None of
/// these are customer-recoverable; the request (or, for seed errors,
/// the process) is aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtmError {
    /// Seed file not found at the specified path
    #[error("seed file not found: {path}")]
    SeedNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading seed data
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error in a seed file
    #[error("seed parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Card number 0 is the invalid sentinel and cannot be seeded
    #[error("card number 0 is reserved")]
    ReservedCardNumber,

    /// Account number 0 is the nonexistent sentinel and cannot be seeded
    #[error("account number 0 is reserved")]
    ReservedAccountNumber,

    /// The same card number appears twice in the seed
    #[error("duplicate card {card} in seed")]
    DuplicateCard {
        /// Card number that is duplicated
        card: CardNumber,
    },

    /// The same account number appears twice in the seed
    #[error("duplicate account {account} in seed")]
    DuplicateAccount {
        /// Account number that is duplicated
        account: AccountNumber,
    },

    /// A card links an account the ledger does not hold
    #[error("card {card} links unknown account {account}")]
    UnknownLinkedAccount {
        /// Card with the dangling link
        card: CardNumber,
        /// The account number that is not seeded
        account: AccountNumber,
    },

    /// Seeded available balance exceeds the posted balance
    #[error("account {account}: available balance exceeds posted balance")]
    AvailableExceedsBalance {
        /// Offending account
        account: AccountNumber,
    },

    /// Seeded balance is negative
    #[error("account {account}: negative seed balance")]
    NegativeSeedBalance {
        /// Offending account
        account: AccountNumber,
    },

    /// A message is missing a slot its kind requires
    ///
    /// Message construction is the terminal's job; a missing slot is a
    /// defect there, not a customer-visible decline.
    #[error("{kind} message missing {field} account slot")]
    MalformedMessage {
        /// Kind of the offending message
        kind: MessageKind,
        /// Name of the missing field
        field: &'static str,
    },

    /// A mutation was requested with a zero or negative amount
    ///
    /// Amounts are validated at input-gathering time; a non-positive
    /// amount reaching the ledger is a defect.
    #[error("non-positive amount in {operation}")]
    NonPositiveAmount {
        /// Operation that received the amount
        operation: &'static str,
    },

    /// Checked addition failed
    #[error("arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: &'static str,
        /// Affected account
        account: AccountNumber,
    },

    /// A debit would take a balance below zero
    ///
    /// The sufficiency checks run before any debit; reaching this point
    /// means a rule was bypassed.
    #[error("balance underflow in {operation} for account {account}")]
    BalanceUnderflow {
        /// Operation that would underflow
        operation: &'static str,
        /// Affected account
        account: AccountNumber,
    },

    /// The ledger has no usage counters for a card the directory knows
    #[error("no ledger state for card {card}")]
    UnknownCard {
        /// Card without ledger state
        card: CardNumber,
    },

    /// A ledger lock was poisoned by a panicking holder
    #[error("poisoned lock on {resource}")]
    LockPoisoned {
        /// Description of the poisoned resource
        resource: &'static str,
    },
}

// Conversion from io::Error to AtmError
impl From<std::io::Error> for AtmError {
    fn from(error: std::io::Error) -> Self {
        AtmError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to AtmError
impl From<csv::Error> for AtmError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        AtmError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl AtmError {
    /// Create a MalformedMessage error
    pub fn malformed_message(kind: MessageKind, field: &'static str) -> Self {
        AtmError::MalformedMessage { kind, field }
    }

    /// Create a NonPositiveAmount error
    pub fn non_positive_amount(operation: &'static str) -> Self {
        AtmError::NonPositiveAmount { operation }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &'static str, account: AccountNumber) -> Self {
        AtmError::ArithmeticOverflow { operation, account }
    }

    /// Create a BalanceUnderflow error
    pub fn balance_underflow(operation: &'static str, account: AccountNumber) -> Self {
        AtmError::BalanceUnderflow { operation, account }
    }

    /// Create an UnknownCard error
    pub fn unknown_card(card: CardNumber) -> Self {
        AtmError::UnknownCard { card }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(resource: &'static str) -> Self {
        AtmError::LockPoisoned { resource }
    }
}
