//! Receipt data handed to the printing collaborator
//!
//! A receipt is plain data: the engine fills in the fields, the printer
//! owns the layout. Nothing here formats or prints.

use crate::types::{Balances, CardNumber, SerialNumber};

/// Data for one printed receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Card the transaction was performed on
    pub card: CardNumber,

    /// Serial number of the transaction
    pub serial: SerialNumber,

    /// Two kind-specific detail lines
    pub details: [String; 2],

    /// Balances reported by the bank after the transaction
    pub balances: Balances,
}

impl Receipt {
    /// Build a receipt from explicit fields
    pub fn new(
        card: CardNumber,
        serial: SerialNumber,
        details: [String; 2],
        balances: Balances,
    ) -> Self {
        Receipt {
            card,
            serial,
            details,
            balances,
        }
    }
}
