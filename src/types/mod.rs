//! Types module
//!
//! Contains core data structures used throughout the engine.
//! This module organizes types into logical submodules:
//! - `money`: exact monetary values
//! - `account`: card/account identities, slots, balances, daily usage
//! - `message`: protocol payload and response variants
//! - `error`: fatal error types for the engine

pub mod account;
pub mod error;
pub mod message;
pub mod money;

pub use account::{
    AccountNumber, AccountSlot, Balances, Card, CardNumber, DailyUsage, Pin, SerialNumber,
};
pub use error::AtmError;
pub use message::{FailureReason, Message, MessageKind, Status};
pub use money::Money;
