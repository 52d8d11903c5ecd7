//! ATM Engine terminal
//!
//! Interactive automated-teller terminal backed by the validating bank
//! engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --seed-dir seed
//! cargo run -- --daily-withdrawal-limit 2000000 --transfer-ceiling 500000
//! ```
//!
//! The program loads the card directory and opening balances from the
//! seed directory, then services card-present sessions on the terminal:
//! enter a card number, enter the PIN, and choose transactions. Typing
//! `cancel` at any prompt aborts it; `quit` at the card prompt stops
//! the terminal.
//!
//! Bank decisions are logged to stderr; control verbosity with
//! `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (seed files missing or invalid, engine fault)

use atm_engine::atm::{SerialNumbers, Session};
use atm_engine::cli;
use atm_engine::io::seed;
use atm_engine::io::terminal::{TerminalCardSlot, TerminalConsole, TerminalPrinter};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let config = args.to_bank_config();

    let bank = match seed::load_seed(&args.cards_file(), &args.accounts_file()) {
        Ok(seed) => seed.into_bank(&config),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let serials = SerialNumbers::new();

    let mut console = TerminalConsole;
    let mut printer = TerminalPrinter;
    let mut card_slot = TerminalCardSlot;

    while let Some(card) = card_slot.await_card() {
        let mut session = Session::new(&bank, &serials, card, config.transfer_ceiling);
        if let Err(e) = session.run(&mut console, &mut printer, &mut card_slot) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
