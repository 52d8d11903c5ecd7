//! ATM client side: collaborator seams and the transaction/session
//! state machines
//!
//! - `console` - traits for the customer-facing hardware and the
//!   cancellation signal
//! - `transaction` - per-kind request gathering, message construction,
//!   and the submission driver
//! - `session` - per-card sequencing and PIN-retry escalation
//! - `receipt` - plain receipt data for the printing collaborator

pub mod console;
pub mod receipt;
pub mod session;
pub mod transaction;

pub use console::{Cancelled, CardSlot, CustomerConsole, InputResult, ReceiptPrinter};
pub use receipt::Receipt;
pub use session::{Session, SessionOutcome, MAX_INVALID_PINS};
pub use transaction::{
    SerialNumbers, SubmitResult, Transaction, TransactionKind, TransactionRequest,
    TransactionState,
};
