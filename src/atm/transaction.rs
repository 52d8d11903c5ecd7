//! Transaction state machine: gather input, build messages, submit
//!
//! One driver implements the common GATHERING → SUBMIT → REPORT
//! sequence for every transaction kind; the kinds themselves are a
//! closed [`TransactionRequest`] union supplying only their input
//! gathering, message fields, and receipt detail lines.
//!
//! Cancellation during gathering aborts before any message is sent.
//! Once `submit` has been invoked there is no cancellation, with one
//! exception: a deposit may still be abandoned between its initiate and
//! complete phases (the envelope was never inserted), because the
//! initiate phase mutates nothing.

use crate::atm::console::{CustomerConsole, InputResult};
use crate::core::Bank;
use crate::types::{
    AccountSlot, AtmError, Balances, CardNumber, FailureReason, Message, MessageKind, Money, Pin,
    SerialNumber, Status,
};
use std::sync::atomic::{AtomicU32, Ordering};

/// Allocator of monotonic transaction serial numbers
///
/// Shared by every session of one terminal process; the two phases of a
/// deposit reuse the serial allocated for the transaction.
#[derive(Debug)]
pub struct SerialNumbers {
    next: AtomicU32,
}

impl SerialNumbers {
    pub fn new() -> Self {
        SerialNumbers {
            next: AtomicU32::new(1),
        }
    }

    /// Allocate the next serial number
    pub fn next(&self) -> SerialNumber {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SerialNumbers {
    fn default() -> Self {
        Self::new()
    }
}

/// Transaction kinds the customer can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Withdrawal,
    Deposit,
    Transfer,
    Inquiry,
}

impl TransactionKind {
    /// Menu order presented to the customer
    pub const MENU: [TransactionKind; 4] = [
        TransactionKind::Withdrawal,
        TransactionKind::Deposit,
        TransactionKind::Transfer,
        TransactionKind::Inquiry,
    ];

    /// Menu label for this kind
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Withdrawal => "Withdrawal",
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Inquiry => "Balance Inquiry",
        }
    }
}

/// Parameters gathered from the customer for one transaction
///
/// A closed tagged union: adding a kind means adding a variant here and
/// an arm to each match below, checked by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionRequest {
    Withdrawal {
        from: AccountSlot,
        amount: Money,
    },
    Deposit {
        to: AccountSlot,
        amount: Money,
    },
    Transfer {
        from: AccountSlot,
        to: AccountSlot,
        amount: Money,
    },
    Inquiry {
        from: AccountSlot,
    },
}

impl TransactionRequest {
    /// Gather kind-specific parameters from the customer
    ///
    /// Amounts must be strictly positive and are re-prompted otherwise;
    /// a transfer amount at or above `transfer_ceiling` is re-prompted
    /// as terminal policy (the ledger enforces the daily limit
    /// independently). Any cancellation propagates out before a message
    /// is built.
    pub fn gather(
        kind: TransactionKind,
        console: &mut dyn CustomerConsole,
        transfer_ceiling: Money,
    ) -> InputResult<Self> {
        match kind {
            TransactionKind::Withdrawal => {
                let from = choose_slot(console, "Account to withdraw from")?;
                let amount = read_positive_amount(console, "Enter amount to withdraw")?;
                Ok(TransactionRequest::Withdrawal { from, amount })
            }
            TransactionKind::Deposit => {
                let to = choose_slot(console, "Account to deposit to")?;
                let amount = read_positive_amount(console, "Enter amount to deposit")?;
                Ok(TransactionRequest::Deposit { to, amount })
            }
            TransactionKind::Transfer => {
                let from = choose_slot(console, "Account to transfer from")?;
                let to = choose_slot(console, "Account to transfer to")?;
                let prompt = format!("Maximum transfer: {transfer_ceiling}\nEnter amount to transfer");
                let mut amount = read_positive_amount(console, &prompt)?;
                while amount >= transfer_ceiling {
                    console.display("That amount is over the transfer maximum");
                    amount = read_positive_amount(console, &prompt)?;
                }
                Ok(TransactionRequest::Transfer { from, to, amount })
            }
            TransactionKind::Inquiry => {
                let from = choose_slot(console, "Account to inquire about")?;
                Ok(TransactionRequest::Inquiry { from })
            }
        }
    }

    /// Build the opening message for this request
    ///
    /// A deposit opens with `InitiateDeposit`; its completion message is
    /// built by the submission driver under the same serial number.
    pub fn message(&self, card: CardNumber, pin: Pin, serial: SerialNumber) -> Message {
        match *self {
            TransactionRequest::Withdrawal { from, amount } => Message {
                kind: MessageKind::Withdrawal,
                card,
                pin,
                serial,
                from: Some(from),
                to: None,
                amount,
            },
            TransactionRequest::Deposit { to, amount } => Message {
                kind: MessageKind::InitiateDeposit,
                card,
                pin,
                serial,
                from: None,
                to: Some(to),
                amount,
            },
            TransactionRequest::Transfer { from, to, amount } => Message {
                kind: MessageKind::Transfer,
                card,
                pin,
                serial,
                from: Some(from),
                to: Some(to),
                amount,
            },
            TransactionRequest::Inquiry { from } => Message {
                kind: MessageKind::Inquiry,
                card,
                pin,
                serial,
                from: Some(from),
                to: None,
                amount: Money::ZERO,
            },
        }
    }

    /// Two receipt detail lines describing this transaction
    pub fn receipt_details(&self) -> [String; 2] {
        match *self {
            TransactionRequest::Withdrawal { from, amount } => [
                format!("WITHDRAWAL FROM: {}", from.abbreviation()),
                format!("AMOUNT: {amount}"),
            ],
            TransactionRequest::Deposit { to, amount } => [
                format!("DEPOSIT TO: {}", to.abbreviation()),
                format!("AMOUNT: {amount}"),
            ],
            TransactionRequest::Transfer { from, to, amount } => [
                format!(
                    "TRANSFER FROM: {} TO: {}",
                    from.abbreviation(),
                    to.abbreviation()
                ),
                format!("AMOUNT: {amount}"),
            ],
            TransactionRequest::Inquiry { from } => {
                [format!("INQUIRY FROM: {}", from.abbreviation()), String::new()]
            }
        }
    }
}

/// Present the account menu until a valid slot is chosen
fn choose_slot(console: &mut dyn CustomerConsole, prompt: &str) -> InputResult<AccountSlot> {
    let names: Vec<&str> = AccountSlot::ALL.iter().map(|slot| slot.name()).collect();
    loop {
        let index = console.select_from_menu(prompt, &names)?;
        if let Some(slot) = AccountSlot::from_index(index) {
            return Ok(slot);
        }
    }
}

/// Read an amount, re-prompting until it is strictly positive
fn read_positive_amount(console: &mut dyn CustomerConsole, prompt: &str) -> InputResult<Money> {
    loop {
        let amount = console.read_amount(prompt)?;
        if amount.is_positive() {
            return Ok(amount);
        }
        console.display("Amount must be greater than zero");
    }
}

/// Lifecycle of one transaction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    GatheringInput,
    AwaitingBankResponse,
    Completed,
    Cancelled,
    Rejected,
}

/// Outcome of one submission, as seen by the session
///
/// `InvalidPin` is deliberately separate from `Declined`: it feeds the
/// session's retry counter instead of ending the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Applied; balances for the receipt
    Approved(Balances),

    /// Declined by a business rule; reason for the customer
    Declined(FailureReason),

    /// PIN rejected; the session decides whether to retry or retain
    InvalidPin,

    /// Abandoned between deposit phases; nothing was mutated
    Cancelled,
}

/// One transaction attempt: gathered request, serial, and state
pub struct Transaction {
    request: TransactionRequest,
    serial: SerialNumber,
    state: TransactionState,
}

impl Transaction {
    /// Gather input for a new transaction of the given kind
    ///
    /// Returns `Err(Cancelled)` if the customer aborts during
    /// gathering; no serial is consumed and no message is ever sent.
    pub fn gather(
        kind: TransactionKind,
        console: &mut dyn CustomerConsole,
        transfer_ceiling: Money,
        serials: &SerialNumbers,
    ) -> InputResult<Self> {
        let request = TransactionRequest::gather(kind, console, transfer_ceiling)?;
        Ok(Transaction {
            request,
            serial: serials.next(),
            state: TransactionState::GatheringInput,
        })
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn serial(&self) -> SerialNumber {
        self.serial
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Submit this transaction to the bank
    ///
    /// Drives both phases of a deposit, including envelope acceptance
    /// between them. May be called again with a fresh PIN after an
    /// `InvalidPin` result; the retried messages keep their serial
    /// number.
    pub fn submit(
        &mut self,
        bank: &Bank,
        console: &mut dyn CustomerConsole,
        card: CardNumber,
        pin: Pin,
    ) -> Result<SubmitResult, AtmError> {
        self.state = TransactionState::AwaitingBankResponse;

        let opening = self.request.message(card, pin, self.serial);
        let result = match bank.handle(&opening)? {
            Status::InvalidPin => SubmitResult::InvalidPin,
            Status::Failure(reason) => SubmitResult::Declined(reason),
            Status::Success(balances) => {
                if let TransactionRequest::Deposit { to, amount } = self.request {
                    // Initiate approved; nothing is credited until the
                    // envelope is in the machine.
                    if console.accept_envelope().is_err() {
                        self.state = TransactionState::Cancelled;
                        return Ok(SubmitResult::Cancelled);
                    }
                    let complete = Message {
                        kind: MessageKind::CompleteDeposit,
                        card,
                        pin,
                        serial: self.serial,
                        from: None,
                        to: Some(to),
                        amount,
                    };
                    match bank.handle(&complete)? {
                        Status::Success(balances) => SubmitResult::Approved(balances),
                        Status::Failure(reason) => SubmitResult::Declined(reason),
                        Status::InvalidPin => SubmitResult::InvalidPin,
                    }
                } else {
                    SubmitResult::Approved(balances)
                }
            }
        };

        self.state = match result {
            SubmitResult::Approved(_) => TransactionState::Completed,
            SubmitResult::Declined(_) => TransactionState::Rejected,
            SubmitResult::Cancelled => TransactionState::Cancelled,
            // The session may retry with a new PIN.
            SubmitResult::InvalidPin => TransactionState::AwaitingBankResponse,
        };

        Ok(result)
    }
}
