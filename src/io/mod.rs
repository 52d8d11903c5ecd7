//! I/O module
//!
//! Handles seed-file loading and the terminal-backed collaborators.
//!
//! # Components
//!
//! - `seed` - CSV seed loading and validation for the card directory
//!   and opening ledger positions
//! - `terminal` - stdin/stdout implementations of the customer-facing
//!   collaborator traits

pub mod seed;
pub mod terminal;

pub use seed::{load_seed, BankSeed};
pub use terminal::{TerminalCardSlot, TerminalConsole, TerminalPrinter};
