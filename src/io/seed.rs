//! Seed data loading
//!
//! The bank's PIN table, card-to-account linkage, and opening balances
//! are configuration data loaded once at startup from two CSV files:
//!
//! - `cards.csv`: `card,pin,checking,savings,money_market` — one linked
//!   account number per slot, 0 meaning no account of that type
//! - `accounts.csv`: `account,balance,available`
//!
//! Every row is validated before the bank is built; a violated ledger
//! invariant in the seed is fatal, not skipped.

use crate::core::{AccountLedger, Bank, BankConfig, CardRecord};
use crate::types::{AccountNumber, AtmError, Balances, CardNumber, Money, Pin};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// One row of `cards.csv`
#[derive(Debug, Deserialize)]
struct CardRow {
    card: CardNumber,
    pin: Pin,
    checking: AccountNumber,
    savings: AccountNumber,
    money_market: AccountNumber,
}

/// One row of `accounts.csv`
#[derive(Debug, Deserialize)]
struct AccountRow {
    account: AccountNumber,
    balance: Money,
    available: Money,
}

/// Validated seed state: card directory plus opening balances
#[derive(Debug)]
pub struct BankSeed {
    /// Card number to PIN/linkage directory
    pub directory: HashMap<CardNumber, CardRecord>,

    /// Opening balances per account
    pub accounts: HashMap<AccountNumber, Balances>,
}

impl BankSeed {
    /// Build a bank over this seed with the given configuration
    pub fn into_bank(self, config: &BankConfig) -> Bank {
        let cards: Vec<CardNumber> = self.directory.keys().copied().collect();
        let ledger = AccountLedger::new(self.accounts, cards, config.daily_limits());
        Bank::new(self.directory, ledger)
    }
}

/// Load and validate the seed files
///
/// # Errors
///
/// Returns an error if either file is missing or malformed, or if any
/// row violates a ledger invariant: reserved identifier 0, duplicate
/// card or account, a card linking an account that is not seeded,
/// a negative balance, or an available balance above the posted one.
pub fn load_seed(cards_path: &Path, accounts_path: &Path) -> Result<BankSeed, AtmError> {
    let accounts = load_accounts(accounts_path)?;
    let directory = load_cards(cards_path, &accounts)?;
    Ok(BankSeed {
        directory,
        accounts,
    })
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AtmError> {
    if !path.exists() {
        return Err(AtmError::SeedNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(ReaderBuilder::new().trim(Trim::All).from_path(path)?)
}

fn load_accounts(path: &Path) -> Result<HashMap<AccountNumber, Balances>, AtmError> {
    let mut accounts = HashMap::new();

    for row in open_reader(path)?.deserialize::<AccountRow>() {
        let row = row?;

        if row.account == 0 {
            return Err(AtmError::ReservedAccountNumber);
        }
        if row.balance.is_negative() || row.available.is_negative() {
            return Err(AtmError::NegativeSeedBalance {
                account: row.account,
            });
        }
        if row.available > row.balance {
            return Err(AtmError::AvailableExceedsBalance {
                account: row.account,
            });
        }
        if accounts
            .insert(row.account, Balances::new(row.balance, row.available))
            .is_some()
        {
            return Err(AtmError::DuplicateAccount {
                account: row.account,
            });
        }
    }

    Ok(accounts)
}

fn load_cards(
    path: &Path,
    accounts: &HashMap<AccountNumber, Balances>,
) -> Result<HashMap<CardNumber, CardRecord>, AtmError> {
    let mut directory = HashMap::new();

    for row in open_reader(path)?.deserialize::<CardRow>() {
        let row = row?;

        if row.card == 0 {
            return Err(AtmError::ReservedCardNumber);
        }

        let linked = [row.checking, row.savings, row.money_market];
        for account in linked {
            if account != 0 && !accounts.contains_key(&account) {
                return Err(AtmError::UnknownLinkedAccount {
                    card: row.card,
                    account,
                });
            }
        }

        if directory
            .insert(row.card, CardRecord::new(row.pin, linked))
            .is_some()
        {
            return Err(AtmError::DuplicateCard { card: row.card });
        }
    }

    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CARDS: &str = "card,pin,checking,savings,money_market\n\
                         1,422442,1,2,0\n\
                         2,123456,1,0,3\n";
    const ACCOUNTS: &str = "account,balance,available\n\
                            1,100000000,5000000\n\
                            2,50000000,10000000\n\
                            3,0,0\n";

    fn write_seed(cards: &str, accounts: &str) -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        let mut cards_file = File::create(dir.path().join("cards.csv")).unwrap();
        cards_file.write_all(cards.as_bytes()).unwrap();
        let mut accounts_file = File::create(dir.path().join("accounts.csv")).unwrap();
        accounts_file.write_all(accounts.as_bytes()).unwrap();
        dir
    }

    fn load(dir: &TempDir) -> Result<BankSeed, AtmError> {
        load_seed(
            &dir.path().join("cards.csv"),
            &dir.path().join("accounts.csv"),
        )
    }

    #[test]
    fn loads_the_stock_seed() {
        let dir = write_seed(CARDS, ACCOUNTS);

        let seed = load(&dir).unwrap();

        assert_eq!(seed.directory.len(), 2);
        assert_eq!(seed.accounts.len(), 3);
        assert_eq!(seed.directory[&1].pin, 422_442);
        assert_eq!(seed.directory[&2].accounts, [1, 0, 3]);
        assert_eq!(
            seed.accounts[&1],
            Balances::new(Money::from_units(100_000_000), Money::from_units(5_000_000))
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = load_seed(
            &dir.path().join("cards.csv"),
            &dir.path().join("accounts.csv"),
        );
        assert!(matches!(result, Err(AtmError::SeedNotFound { .. })));
    }

    #[test]
    fn available_above_balance_is_rejected() {
        let dir = write_seed(CARDS, "account,balance,available\n1,100,200\n2,0,0\n3,0,0\n");
        assert_eq!(
            load(&dir).unwrap_err(),
            AtmError::AvailableExceedsBalance { account: 1 }
        );
    }

    #[test]
    fn negative_seed_balance_is_rejected() {
        let dir = write_seed(CARDS, "account,balance,available\n1,-100,0\n2,0,0\n3,0,0\n");
        assert_eq!(load(&dir).unwrap_err(), AtmError::NegativeSeedBalance { account: 1 });
    }

    #[test]
    fn duplicate_account_is_rejected() {
        let dir = write_seed(
            CARDS,
            "account,balance,available\n1,100,100\n1,200,200\n2,0,0\n3,0,0\n",
        );
        assert_eq!(load(&dir).unwrap_err(), AtmError::DuplicateAccount { account: 1 });
    }

    #[test]
    fn duplicate_card_is_rejected() {
        let dir = write_seed(
            "card,pin,checking,savings,money_market\n1,1111,1,0,0\n1,2222,2,0,0\n",
            ACCOUNTS,
        );
        assert_eq!(load(&dir).unwrap_err(), AtmError::DuplicateCard { card: 1 });
    }

    #[test]
    fn card_zero_is_rejected() {
        let dir = write_seed(
            "card,pin,checking,savings,money_market\n0,1111,1,0,0\n",
            ACCOUNTS,
        );
        assert_eq!(load(&dir).unwrap_err(), AtmError::ReservedCardNumber);
    }

    #[test]
    fn dangling_account_link_is_rejected() {
        let dir = write_seed(
            "card,pin,checking,savings,money_market\n1,1111,7,0,0\n",
            ACCOUNTS,
        );
        assert_eq!(
            load(&dir).unwrap_err(),
            AtmError::UnknownLinkedAccount { card: 1, account: 7 }
        );
    }

    #[test]
    fn malformed_row_is_a_parse_error() {
        let dir = write_seed(CARDS, "account,balance,available\nnot-a-number,1,1\n");
        assert!(matches!(load(&dir), Err(AtmError::ParseError { .. })));
    }

    #[test]
    fn seed_builds_a_working_bank() {
        let dir = write_seed(CARDS, ACCOUNTS);
        let bank = load(&dir).unwrap().into_bank(&BankConfig::default());

        let status = bank
            .handle(&crate::types::Message {
                kind: crate::types::MessageKind::Inquiry,
                card: 1,
                pin: 422_442,
                serial: 1,
                from: Some(crate::types::AccountSlot::Checking),
                to: None,
                amount: Money::ZERO,
            })
            .unwrap();

        assert_eq!(
            status.balances().unwrap(),
            Balances::new(Money::from_units(100_000_000), Money::from_units(5_000_000))
        );
    }
}
