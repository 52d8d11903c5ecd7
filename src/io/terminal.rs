//! Terminal-backed collaborator implementations
//!
//! These drive the engine from a plain interactive terminal: prompts on
//! stdout, responses on stdin. The customer cancels a prompt by typing
//! `cancel` (or closing stdin). Only the prompt/response surface of the
//! original hardware is kept; everything visual is out of scope.

use crate::atm::console::{Cancelled, CardSlot, CustomerConsole, InputResult, ReceiptPrinter};
use crate::atm::receipt::Receipt;
use crate::types::{Card, Money, Pin};
use std::io::{self, BufRead};

/// Read one line from stdin; EOF or the literal `cancel` cancels
fn read_line() -> InputResult<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => Err(Cancelled),
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("cancel") {
                Err(Cancelled)
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

/// Interactive stdin/stdout console
pub struct TerminalConsole;

impl CustomerConsole for TerminalConsole {
    fn select_from_menu(&mut self, prompt: &str, options: &[&str]) -> InputResult<usize> {
        loop {
            println!("{prompt}");
            for (index, option) in options.iter().enumerate() {
                println!("  {}) {}", index + 1, option);
            }
            let line = read_line()?;
            match line.parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(choice - 1),
                _ => println!("Please choose between 1 and {}", options.len()),
            }
        }
    }

    fn read_amount(&mut self, prompt: &str) -> InputResult<Money> {
        loop {
            println!("{prompt}");
            match read_line()?.parse::<Money>() {
                Ok(amount) => return Ok(amount),
                Err(_) => println!("Please enter a numeric amount"),
            }
        }
    }

    fn read_pin(&mut self, prompt: &str) -> InputResult<Pin> {
        loop {
            println!("{prompt}");
            match read_line()?.parse::<Pin>() {
                Ok(pin) => return Ok(pin),
                Err(_) => println!("Please enter a numeric PIN"),
            }
        }
    }

    fn accept_envelope(&mut self) -> InputResult<()> {
        println!("Insert the deposit envelope and press Enter ('cancel' to abort)");
        read_line().map(|_| ())
    }

    fn display(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Receipt printer writing to stdout
pub struct TerminalPrinter;

impl ReceiptPrinter for TerminalPrinter {
    fn print(&mut self, receipt: &Receipt) {
        println!("----------------------------------------");
        println!("CARD {}  TRANS #{}", receipt.card, receipt.serial);
        for line in &receipt.details {
            if !line.is_empty() {
                println!("{line}");
            }
        }
        println!("BALANCE: {}", receipt.balances.balance);
        println!("AVAILABLE BALANCE: {}", receipt.balances.available);
        println!("----------------------------------------");
    }
}

/// Simulated card transport
pub struct TerminalCardSlot;

impl TerminalCardSlot {
    /// Simulate card insertion: prompt for a card number
    ///
    /// Returns `None` when the operator types `quit` or closes stdin.
    pub fn await_card(&mut self) -> Option<Card> {
        loop {
            println!("Enter card number ('quit' to stop the terminal)");
            let Ok(line) = read_line() else { return None };
            if line.eq_ignore_ascii_case("quit") {
                return None;
            }
            match line.parse::<u32>() {
                Ok(number) if number > 0 => return Some(Card::new(number)),
                _ => println!("Card numbers are positive integers"),
            }
        }
    }
}

impl CardSlot for TerminalCardSlot {
    fn eject(&mut self) {
        println!("Please take your card");
    }

    fn retain(&mut self) {
        println!("Your card has been retained; please contact your bank");
    }
}
