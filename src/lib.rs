//! ATM Engine Library
//! # Overview
//!
//! This library models an automated teller transaction flow: a terminal
//! exchanges structured messages with a bank back end that authenticates
//! a card/PIN pair and executes withdrawals, deposits, transfers, and
//! balance inquiries.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Money, Message, Status, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Server-side components:
//!   - [`core::bank`] - Authentication, slot resolution, rule dispatch
//!   - [`core::ledger`] - Balance state, daily counters, authorization
//! - [`atm`] - Client-side state machines and collaborator seams:
//!   - [`atm::transaction`] - Per-kind gathering and submission driver
//!   - [`atm::session`] - Per-card sequencing and PIN-retry escalation
//! - [`io`] - Seed loading and terminal-backed collaborators
//!
//! # Transaction Kinds
//!
//! The bank accepts five message kinds:
//!
//! - **Withdrawal**: debit an account, gated by a per-card daily limit
//!   and the account's available balance
//! - **InitiateDeposit**: validate a deposit target; mutates nothing
//! - **CompleteDeposit**: credit the posted balance once the envelope
//!   is in the machine; the available balance stays held
//! - **Transfer**: move funds between two of the card's accounts
//! - **Inquiry**: read balances without mutating
//!
//! # Concurrency
//!
//! One bank serves any number of terminal sessions on their own
//! threads. The ledger serializes the read-check-mutate sequence per
//! account and per card's daily counters, so concurrent requests on a
//! shared (joint) account can never both pass a sufficiency check
//! against a stale balance, while disjoint accounts never contend.

// Module declarations
pub mod atm;
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use atm::{
    CardSlot, CustomerConsole, Receipt, ReceiptPrinter, SerialNumbers, Session, SessionOutcome,
    Transaction, TransactionKind,
};
pub use core::{AccountLedger, Bank, BankConfig, CardRecord, DailyLimits};
pub use io::{load_seed, BankSeed};
pub use types::{
    AtmError, Balances, Card, FailureReason, Message, MessageKind, Money, Status,
};
