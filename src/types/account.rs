//! Card and account identities for the ATM engine
//!
//! This module defines the identifiers exchanged between the terminal
//! and the bank, the card-local account slots, and the balance and
//! daily-usage state tracked by the ledger.

use super::money::Money;
use serde::{Deserialize, Serialize};

/// Card number embossed on a customer card
///
/// Valid card numbers start at 1; 0 is the invalid sentinel.
pub type CardNumber = u32;

/// Bank-global account identity
///
/// 0 denotes "no such account" in the card directory.
pub type AccountNumber = u32;

/// Personal identification number entered at the terminal
pub type Pin = u32;

/// Monotonic serial number correlating the messages of one transaction
///
/// The two phases of a deposit share a serial number.
pub type SerialNumber = u32;

/// A customer card as read by the terminal
///
/// Created by the card-physical collaborator; the engine only ever
/// reads the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// The embossed card number
    pub number: CardNumber,
}

impl Card {
    pub fn new(number: CardNumber) -> Self {
        Card { number }
    }
}

/// Card-local reference to one of the card's linked accounts
///
/// Each card links up to one account per slot. The slot resolves to a
/// real [`AccountNumber`] through the bank's card directory; a slot
/// that resolves to 0 has no linked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSlot {
    Checking,
    Savings,
    MoneyMarket,
}

impl AccountSlot {
    /// Number of slots on a card
    pub const COUNT: usize = 3;

    /// All slots in directory order
    pub const ALL: [AccountSlot; AccountSlot::COUNT] = [
        AccountSlot::Checking,
        AccountSlot::Savings,
        AccountSlot::MoneyMarket,
    ];

    /// Position of this slot in the card directory
    pub fn index(self) -> usize {
        match self {
            AccountSlot::Checking => 0,
            AccountSlot::Savings => 1,
            AccountSlot::MoneyMarket => 2,
        }
    }

    /// Slot at the given directory position, if any
    pub fn from_index(index: usize) -> Option<AccountSlot> {
        AccountSlot::ALL.get(index).copied()
    }

    /// Customer-facing name used in menus
    pub fn name(self) -> &'static str {
        match self {
            AccountSlot::Checking => "Checking",
            AccountSlot::Savings => "Savings",
            AccountSlot::MoneyMarket => "Money Market",
        }
    }

    /// Short form used on receipt detail lines
    pub fn abbreviation(self) -> &'static str {
        match self {
            AccountSlot::Checking => "CHK",
            AccountSlot::Savings => "SAV",
            AccountSlot::MoneyMarket => "MMA",
        }
    }
}

/// Posted and available balance of one account
///
/// `available` is the posted balance minus uncollected or held funds.
/// Invariant: `available <= balance` at all times. Both fields are
/// mutated only through the ledger's authorization path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    /// Posted balance
    pub balance: Money,

    /// Balance available for withdrawal or transfer
    pub available: Money,
}

impl Balances {
    pub fn new(balance: Money, available: Money) -> Self {
        Balances { balance, available }
    }
}

/// Running per-card usage totals within one day
///
/// Both totals are monotonically non-decreasing between day-boundary
/// resets and are compared against the configured daily limits before
/// any debit is authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyUsage {
    /// Total withdrawn on this card today
    pub withdrawn_today: Money,

    /// Total transferred from this card's accounts today
    pub transferred_today: Money,
}
