//! Collaborator traits for the customer-facing hardware
//!
//! The engine drives the physical terminal only through these traits:
//! customer input, receipt printing, and the card slot. Implementations
//! for a real terminal live in [`crate::io::terminal`]; tests script
//! them.
//!
//! Cancellation is a value, not an exception: every prompt returns an
//! [`InputResult`] and the caller propagates [`Cancelled`] by early
//! return up to the enclosing transaction or session transition.

use crate::atm::receipt::Receipt;
use crate::types::{Money, Pin};
use thiserror::Error;

/// Signal that the customer aborted the current prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled by customer")]
pub struct Cancelled;

/// Result of a cancellable customer interaction
pub type InputResult<T> = Result<T, Cancelled>;

/// Customer input and display surface of the terminal
///
/// Prompts block until the customer responds or cancels. There is no
/// timeout in the engine; a timing-out terminal reports `Cancelled`.
pub trait CustomerConsole {
    /// Present a menu and return the index of the chosen option
    ///
    /// Implementations must return an index below `options.len()`.
    fn select_from_menu(&mut self, prompt: &str, options: &[&str]) -> InputResult<usize>;

    /// Read a monetary amount
    ///
    /// Implementations re-prompt on unparsable input; semantic checks
    /// (positivity, ceilings) belong to the caller.
    fn read_amount(&mut self, prompt: &str) -> InputResult<Money>;

    /// Read a PIN
    fn read_pin(&mut self, prompt: &str) -> InputResult<Pin>;

    /// Wait for the customer to insert a deposit envelope
    ///
    /// Cancellation here aborts a deposit between its two phases; the
    /// initiate phase mutated nothing, so no compensation is needed.
    fn accept_envelope(&mut self) -> InputResult<()>;

    /// Show a message to the customer
    fn display(&mut self, message: &str);
}

/// Receipt output device
///
/// The engine supplies the receipt data; layout and printing mechanics
/// are the implementation's concern.
pub trait ReceiptPrinter {
    fn print(&mut self, receipt: &Receipt);
}

/// Card transport of the terminal
///
/// Told how to dispose of the card when a session ends. The engine
/// never inspects physical state.
pub trait CardSlot {
    /// Return the card to the customer
    fn eject(&mut self);

    /// Keep the card after repeated PIN failures
    fn retain(&mut self);
}
