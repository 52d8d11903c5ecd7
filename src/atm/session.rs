//! Session: one card-present period at the terminal
//!
//! A session sequences transactions for one authenticated card. It owns
//! the consecutive-invalid-PIN counter and the escalation policy: three
//! invalid PINs in a row, across any transactions of the session, and
//! the card is retained instead of returned.

use crate::atm::console::{CardSlot, CustomerConsole, ReceiptPrinter};
use crate::atm::receipt::Receipt;
use crate::atm::transaction::{SerialNumbers, SubmitResult, Transaction, TransactionKind};
use crate::core::Bank;
use crate::types::{AtmError, Card, Money};

/// Consecutive invalid PINs before the card is retained
pub const MAX_INVALID_PINS: u32 = 3;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Card returned to the customer
    Ejected,

    /// Card kept after repeated PIN failures
    Retained,
}

/// One customer's card-present period
///
/// Driven by a single thread of control; concurrency enters only at the
/// bank, which other sessions share.
pub struct Session<'a> {
    bank: &'a Bank,
    serials: &'a SerialNumbers,
    card: Card,
    transfer_ceiling: Money,
    invalid_pin_attempts: u32,
}

impl<'a> Session<'a> {
    pub fn new(
        bank: &'a Bank,
        serials: &'a SerialNumbers,
        card: Card,
        transfer_ceiling: Money,
    ) -> Self {
        Session {
            bank,
            serials,
            card,
            transfer_ceiling,
            invalid_pin_attempts: 0,
        }
    }

    /// Run the session to completion
    ///
    /// Reads the PIN, then loops gathering and submitting transactions
    /// until the customer is done or the card is retained. The card
    /// slot is always told how to dispose of the card before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Propagates programming faults from the bank; business declines
    /// and cancellations are handled inside the loop.
    pub fn run(
        &mut self,
        console: &mut dyn CustomerConsole,
        printer: &mut dyn ReceiptPrinter,
        card_slot: &mut dyn CardSlot,
    ) -> Result<SessionOutcome, AtmError> {
        let Ok(mut pin) = console.read_pin("Enter your PIN") else {
            card_slot.eject();
            return Ok(SessionOutcome::Ejected);
        };

        loop {
            let labels: Vec<&str> = TransactionKind::MENU.iter().map(|kind| kind.label()).collect();
            let kind = match console.select_from_menu("Select a transaction", &labels) {
                Ok(index) => {
                    let Some(kind) = TransactionKind::MENU.get(index).copied() else {
                        continue;
                    };
                    kind
                }
                Err(_) => break,
            };

            let mut transaction =
                match Transaction::gather(kind, console, self.transfer_ceiling, self.serials) {
                    Ok(transaction) => transaction,
                    Err(_) => {
                        // Cancelled while gathering: back to idle, no penalty.
                        if !wants_another(console) {
                            break;
                        }
                        continue;
                    }
                };

            loop {
                match transaction.submit(self.bank, console, self.card.number, pin)? {
                    SubmitResult::Approved(balances) => {
                        self.invalid_pin_attempts = 0;
                        printer.print(&Receipt::new(
                            self.card.number,
                            transaction.serial(),
                            transaction.request().receipt_details(),
                            balances,
                        ));
                        break;
                    }
                    SubmitResult::Declined(reason) => {
                        // The PIN was accepted before the rules ran.
                        self.invalid_pin_attempts = 0;
                        console.display(&format!("Unable to complete transaction: {reason}"));
                        break;
                    }
                    SubmitResult::Cancelled => break,
                    SubmitResult::InvalidPin => {
                        self.invalid_pin_attempts += 1;
                        if self.invalid_pin_attempts >= MAX_INVALID_PINS {
                            console.display("Too many invalid PINs; your card has been retained");
                            card_slot.retain();
                            return Ok(SessionOutcome::Retained);
                        }
                        match console.read_pin("Invalid PIN, please re-enter your PIN") {
                            Ok(new_pin) => pin = new_pin,
                            Err(_) => break,
                        }
                    }
                }
            }

            if !wants_another(console) {
                break;
            }
        }

        card_slot.eject();
        Ok(SessionOutcome::Ejected)
    }

    /// Invalid PINs seen in a row so far (used by tests)
    pub fn invalid_pin_attempts(&self) -> u32 {
        self.invalid_pin_attempts
    }
}

fn wants_another(console: &mut dyn CustomerConsole) -> bool {
    matches!(
        console.select_from_menu("Would you like another transaction?", &["Yes", "No"]),
        Ok(0)
    )
}
