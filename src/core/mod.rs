//! Core business logic module
//!
//! This module contains the server-side components:
//! - `ledger` - balance state, daily counters, and authorization rules
//! - `bank` - authentication, slot resolution, and rule dispatch

pub mod bank;
pub mod ledger;

pub use bank::{Bank, BankConfig, CardRecord};
pub use ledger::{AccountLedger, DailyLimits, Decision};
