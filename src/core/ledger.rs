//! Account ledger: balance state, daily counters, and authorization rules
//!
//! This module provides the `AccountLedger`, the single source of truth
//! for account balances and per-card daily usage, and the only place the
//! daily limits and available-balance constraints are enforced.
//!
//! # Design
//!
//! The account and usage maps are fixed at construction from the seed;
//! accounts are opened at the bank, never at a terminal. Each entry sits
//! behind its own `Mutex`, so requests against disjoint accounts never
//! contend while the read-check-mutate sequence for one account appears
//! atomic to concurrent sessions.
//!
//! # Lock order
//!
//! Every operation acquires locks in a fixed order: the card's usage
//! counters first, then account entries in ascending account number.
//! A transfer is the only operation holding two account locks at once;
//! the ascending order makes opposite-direction transfers over the same
//! account pair deadlock-free.
//!
//! # Declines vs. faults
//!
//! Business declines are values: operations return a [`Decision`]
//! (`Result<Balances, FailureReason>`) inside `Ok`. The `Err` channel is
//! reserved for programming faults — non-positive amounts, failed
//! checked arithmetic, poisoned locks — which must propagate, never be
//! presented to the customer as a decline.

use crate::types::{
    AccountNumber, AtmError, Balances, CardNumber, DailyUsage, FailureReason, Money,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Outcome of an authorization: approved with fresh balances, or declined
pub type Decision = Result<Balances, FailureReason>;

/// Per-card daily limits enforced by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyLimits {
    /// Maximum total withdrawn per card per day
    pub withdrawal: Money,

    /// Maximum total transferred per card per day
    pub transfer: Money,
}

/// Balance and daily-usage state for all accounts and cards
///
/// Constructed once at startup and shared by reference across every
/// concurrently active session. All mutation happens through the
/// authorization methods below.
pub struct AccountLedger {
    /// Per-account balance state
    accounts: HashMap<AccountNumber, Mutex<Balances>>,

    /// Per-card daily usage counters
    usage: HashMap<CardNumber, Mutex<DailyUsage>>,

    /// Daily limits applied to every card
    limits: DailyLimits,
}

impl AccountLedger {
    /// Create a ledger holding the given accounts and card counters
    ///
    /// # Arguments
    ///
    /// * `accounts` - opening balances per account number
    /// * `cards` - card numbers to track daily usage for
    /// * `limits` - daily limits applied to every card
    pub fn new(
        accounts: impl IntoIterator<Item = (AccountNumber, Balances)>,
        cards: impl IntoIterator<Item = CardNumber>,
        limits: DailyLimits,
    ) -> Self {
        AccountLedger {
            accounts: accounts
                .into_iter()
                .map(|(number, balances)| (number, Mutex::new(balances)))
                .collect(),
            usage: cards
                .into_iter()
                .map(|card| (card, Mutex::new(DailyUsage::default())))
                .collect(),
            limits,
        }
    }

    /// Authorize and apply a withdrawal
    ///
    /// Checks run in order, short-circuiting on the first decline: the
    /// card's remaining daily withdrawal limit, then the account's
    /// available balance. On approval the daily counter, posted balance,
    /// and available balance move together under the held locks.
    ///
    /// # Returns
    ///
    /// * `Ok(Ok(balances))` - applied; fresh balances of the account
    /// * `Ok(Err(reason))` - declined, ledger untouched
    /// * `Err(AtmError)` - programming fault, must propagate
    pub fn withdraw(
        &self,
        card: CardNumber,
        account: AccountNumber,
        amount: Money,
    ) -> Result<Decision, AtmError> {
        ensure_positive(amount, "withdrawal")?;

        let mut usage = lock(self.usage_cell(card)?, "daily usage")?;

        let remaining = self
            .limits
            .withdrawal
            .checked_sub(usage.withdrawn_today)
            .ok_or_else(|| AtmError::arithmetic_overflow("withdrawal limit", account))?;
        if amount > remaining {
            return Ok(Err(FailureReason::DailyLimitExceeded));
        }

        let Some(cell) = self.accounts.get(&account) else {
            return Ok(Err(FailureReason::InvalidAccount));
        };
        let mut balances = lock(cell, "account")?;

        if amount > balances.available {
            return Ok(Err(FailureReason::InsufficientFunds));
        }

        let withdrawn = credit(usage.withdrawn_today, amount, "withdrawal", account)?;
        let balance = debit(balances.balance, amount, "withdrawal", account)?;
        let available = debit(balances.available, amount, "withdrawal", account)?;

        usage.withdrawn_today = withdrawn;
        balances.balance = balance;
        balances.available = available;

        Ok(Ok(*balances))
    }

    /// Apply the completion phase of a deposit
    ///
    /// Credits the posted balance only. The available balance is
    /// deliberately not credited: deposited funds stay unavailable until
    /// collected, which keeps `available <= balance`.
    pub fn credit_deposit(
        &self,
        account: AccountNumber,
        amount: Money,
    ) -> Result<Decision, AtmError> {
        ensure_positive(amount, "deposit")?;

        let Some(cell) = self.accounts.get(&account) else {
            return Ok(Err(FailureReason::InvalidAccount));
        };
        let mut balances = lock(cell, "account")?;

        balances.balance = credit(balances.balance, amount, "deposit", account)?;

        Ok(Ok(*balances))
    }

    /// Authorize and apply a transfer between two accounts
    ///
    /// Declines when the accounts are identical, the card's daily
    /// transfer limit would be exceeded, or the source lacks available
    /// funds. On approval the source is debited (posted and available)
    /// and the destination credited (both) under the held locks; the
    /// reported balances are the **destination** account's.
    pub fn transfer(
        &self,
        card: CardNumber,
        from: AccountNumber,
        to: AccountNumber,
        amount: Money,
    ) -> Result<Decision, AtmError> {
        ensure_positive(amount, "transfer")?;

        if from == to {
            return Ok(Err(FailureReason::SameAccount));
        }

        let mut usage = lock(self.usage_cell(card)?, "daily usage")?;

        let remaining = self
            .limits
            .transfer
            .checked_sub(usage.transferred_today)
            .ok_or_else(|| AtmError::arithmetic_overflow("transfer limit", from))?;
        if amount > remaining {
            return Ok(Err(FailureReason::DailyLimitExceeded));
        }

        let (Some(from_cell), Some(to_cell)) = (self.accounts.get(&from), self.accounts.get(&to))
        else {
            return Ok(Err(FailureReason::InvalidAccount));
        };

        // Ascending account-number order keeps concurrent transfers over
        // the same pair deadlock-free.
        let mut from_balances;
        let mut to_balances;
        if from < to {
            from_balances = lock(from_cell, "account")?;
            to_balances = lock(to_cell, "account")?;
        } else {
            to_balances = lock(to_cell, "account")?;
            from_balances = lock(from_cell, "account")?;
        }

        if amount > from_balances.available {
            return Ok(Err(FailureReason::InsufficientFunds));
        }

        let transferred = credit(usage.transferred_today, amount, "transfer", from)?;
        let from_balance = debit(from_balances.balance, amount, "transfer", from)?;
        let from_available = debit(from_balances.available, amount, "transfer", from)?;
        let to_balance = credit(to_balances.balance, amount, "transfer", to)?;
        let to_available = credit(to_balances.available, amount, "transfer", to)?;

        usage.transferred_today = transferred;
        from_balances.balance = from_balance;
        from_balances.available = from_available;
        to_balances.balance = to_balance;
        to_balances.available = to_available;

        Ok(Ok(*to_balances))
    }

    /// Read the current balances of an account
    ///
    /// Never mutates any ledger field; also serves as the validation
    /// step of the initiate phase of a deposit.
    pub fn balances(&self, account: AccountNumber) -> Result<Decision, AtmError> {
        let Some(cell) = self.accounts.get(&account) else {
            return Ok(Err(FailureReason::InvalidAccount));
        };
        let balances = lock(cell, "account")?;
        Ok(Ok(*balances))
    }

    /// Zero every card's daily usage counters
    ///
    /// Day-boundary hook for the host; the engine never calls this on
    /// its own.
    pub fn reset_daily_totals(&self) -> Result<(), AtmError> {
        for cell in self.usage.values() {
            let mut usage = lock(cell, "daily usage")?;
            *usage = DailyUsage::default();
        }
        Ok(())
    }

    /// Snapshot of a card's usage counters (used by tests and logging)
    pub fn daily_usage(&self, card: CardNumber) -> Result<DailyUsage, AtmError> {
        let usage = lock(self.usage_cell(card)?, "daily usage")?;
        Ok(*usage)
    }

    fn usage_cell(&self, card: CardNumber) -> Result<&Mutex<DailyUsage>, AtmError> {
        self.usage.get(&card).ok_or_else(|| AtmError::unknown_card(card))
    }
}

/// Lock a ledger cell, converting poisoning into a fatal error
fn lock<'a, T>(cell: &'a Mutex<T>, resource: &'static str) -> Result<MutexGuard<'a, T>, AtmError> {
    cell.lock().map_err(|_| AtmError::lock_poisoned(resource))
}

/// Reject zero and negative mutation amounts before any lock is taken
fn ensure_positive(amount: Money, operation: &'static str) -> Result<(), AtmError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(AtmError::non_positive_amount(operation))
    }
}

/// Checked addition on a ledger field
fn credit(
    value: Money,
    amount: Money,
    operation: &'static str,
    account: AccountNumber,
) -> Result<Money, AtmError> {
    value
        .checked_add(amount)
        .ok_or_else(|| AtmError::arithmetic_overflow(operation, account))
}

/// Checked subtraction on a ledger field; going below zero is a fault
///
/// The sufficiency checks run first, so a negative result here means a
/// rule was bypassed.
fn debit(
    value: Money,
    amount: Money,
    operation: &'static str,
    account: AccountNumber,
) -> Result<Money, AtmError> {
    let next = value
        .checked_sub(amount)
        .ok_or_else(|| AtmError::balance_underflow(operation, account))?;
    if next.is_negative() {
        return Err(AtmError::balance_underflow(operation, account));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn units(value: i64) -> Money {
        Money::from_units(value)
    }

    /// Ledger seeded with the stock simulation accounts: account 1 is
    /// joint between cards 1 and 2, account 3 starts empty.
    fn seeded_ledger() -> AccountLedger {
        AccountLedger::new(
            [
                (1, Balances::new(units(100_000_000), units(5_000_000))),
                (2, Balances::new(units(50_000_000), units(10_000_000))),
                (3, Balances::new(Money::ZERO, Money::ZERO)),
            ],
            [1, 2],
            DailyLimits {
                withdrawal: units(5_000_000),
                transfer: units(10_000_000),
            },
        )
    }

    fn approved(decision: Result<Decision, AtmError>) -> Balances {
        decision.unwrap().unwrap()
    }

    fn declined(decision: Result<Decision, AtmError>) -> FailureReason {
        decision.unwrap().unwrap_err()
    }

    #[test]
    fn withdraw_debits_both_balances_and_usage() {
        let ledger = seeded_ledger();

        let balances = approved(ledger.withdraw(1, 1, units(1_000_000)));

        assert_eq!(balances.balance, units(99_000_000));
        assert_eq!(balances.available, units(4_000_000));
        assert_eq!(ledger.daily_usage(1).unwrap().withdrawn_today, units(1_000_000));
    }

    #[test]
    fn withdraw_over_daily_limit_is_declined() {
        let ledger = seeded_ledger();
        approved(ledger.withdraw(2, 2, units(4_000_000)));

        // Remaining limit is 1,000,000; request more.
        let reason = declined(ledger.withdraw(2, 2, units(2_000_000)));

        assert_eq!(reason, FailureReason::DailyLimitExceeded);
        assert_eq!(approved(ledger.balances(2)).available, units(6_000_000));
    }

    #[test]
    fn withdraw_over_available_is_declined() {
        let ledger = seeded_ledger();

        // Account 1 has a large posted balance but only 5,000,000 available;
        // the daily limit alone would allow this.
        let reason = declined(ledger.withdraw(1, 1, units(5_000_001)));

        assert_eq!(reason, FailureReason::InsufficientFunds);
        let balances = approved(ledger.balances(1));
        assert_eq!(balances.balance, units(100_000_000));
        assert_eq!(balances.available, units(5_000_000));
    }

    #[test]
    fn withdraw_from_unknown_account_is_declined() {
        let ledger = seeded_ledger();
        let reason = declined(ledger.withdraw(1, 99, units(100)));
        assert_eq!(reason, FailureReason::InvalidAccount);
    }

    #[test]
    fn withdraw_checks_limit_before_funds() {
        let ledger = seeded_ledger();
        approved(ledger.withdraw(1, 1, units(4_900_000)));

        // Now both the remaining limit (100,000) and the remaining
        // available balance (100,000) are exceeded; the limit wins.
        let reason = declined(ledger.withdraw(1, 1, units(200_000)));
        assert_eq!(reason, FailureReason::DailyLimitExceeded);
    }

    #[test]
    fn withdraw_non_positive_amount_is_a_fault() {
        let ledger = seeded_ledger();
        assert_eq!(
            ledger.withdraw(1, 1, Money::ZERO),
            Err(AtmError::non_positive_amount("withdrawal"))
        );
        assert_eq!(
            ledger.withdraw(1, 1, units(-5)),
            Err(AtmError::non_positive_amount("withdrawal"))
        );
    }

    #[test]
    fn withdraw_for_unknown_card_is_a_fault() {
        let ledger = seeded_ledger();
        assert_eq!(
            ledger.withdraw(9, 1, units(100)),
            Err(AtmError::unknown_card(9))
        );
    }

    #[test]
    fn deposit_credits_posted_balance_only() {
        let ledger = seeded_ledger();

        let balances = approved(ledger.credit_deposit(3, units(500_000)));

        assert_eq!(balances.balance, units(500_000));
        assert_eq!(balances.available, Money::ZERO);
    }

    #[test]
    fn deposit_to_unknown_account_is_declined() {
        let ledger = seeded_ledger();
        let reason = declined(ledger.credit_deposit(99, units(500_000)));
        assert_eq!(reason, FailureReason::InvalidAccount);
    }

    #[test]
    fn transfer_moves_funds_and_reports_destination() {
        let ledger = seeded_ledger();

        let balances = approved(ledger.transfer(1, 1, 2, units(1_000_000)));

        // Destination balances are reported.
        assert_eq!(balances.balance, units(51_000_000));
        assert_eq!(balances.available, units(11_000_000));

        let from = approved(ledger.balances(1));
        assert_eq!(from.balance, units(99_000_000));
        assert_eq!(from.available, units(4_000_000));
        assert_eq!(
            ledger.daily_usage(1).unwrap().transferred_today,
            units(1_000_000)
        );
    }

    #[test]
    fn transfer_to_same_account_is_declined() {
        let ledger = seeded_ledger();
        let reason = declined(ledger.transfer(1, 1, 1, units(1_000)));
        assert_eq!(reason, FailureReason::SameAccount);
    }

    #[test]
    fn transfer_over_daily_limit_is_declined() {
        let ledger = seeded_ledger();
        approved(ledger.transfer(2, 2, 1, units(9_500_000)));

        let reason = declined(ledger.transfer(2, 2, 1, units(600_000)));
        assert_eq!(reason, FailureReason::DailyLimitExceeded);
    }

    #[test]
    fn transfer_over_available_is_declined() {
        let ledger = seeded_ledger();
        let reason = declined(ledger.transfer(1, 1, 2, units(5_000_001)));
        assert_eq!(reason, FailureReason::InsufficientFunds);
    }

    #[test]
    fn transfer_with_unknown_endpoint_is_declined() {
        let ledger = seeded_ledger();
        assert_eq!(
            declined(ledger.transfer(1, 1, 99, units(100))),
            FailureReason::InvalidAccount
        );
        assert_eq!(
            declined(ledger.transfer(1, 99, 2, units(100))),
            FailureReason::InvalidAccount
        );
    }

    #[test]
    fn inquiry_never_mutates() {
        let ledger = seeded_ledger();

        let before = approved(ledger.balances(1));
        let again = approved(ledger.balances(1));

        assert_eq!(before, again);
        assert_eq!(ledger.daily_usage(1).unwrap(), DailyUsage::default());
    }

    #[test]
    fn available_never_exceeds_balance_after_mixed_operations() {
        let ledger = seeded_ledger();

        approved(ledger.withdraw(1, 1, units(1_000_000)));
        approved(ledger.credit_deposit(1, units(2_000_000)));
        approved(ledger.transfer(1, 1, 2, units(500_000)));

        for account in [1, 2, 3] {
            let balances = approved(ledger.balances(account));
            assert!(
                balances.available <= balances.balance,
                "account {account}: {balances:?}"
            );
        }
    }

    #[test]
    fn reset_daily_totals_restores_full_limits() {
        let ledger = seeded_ledger();
        approved(ledger.withdraw(1, 1, units(5_000_000)));
        assert_eq!(
            declined(ledger.withdraw(1, 1, units(1))),
            FailureReason::DailyLimitExceeded
        );

        ledger.reset_daily_totals().unwrap();

        assert_eq!(ledger.daily_usage(1).unwrap(), DailyUsage::default());
        // Account 1 still has no available funds, so the next decline
        // comes from the balance check, not the limit.
        assert_eq!(
            declined(ledger.withdraw(1, 1, units(1))),
            FailureReason::InsufficientFunds
        );
    }

    #[test]
    fn concurrent_withdrawals_cannot_both_pass_a_stale_check() {
        // Account 1 is joint between cards 1 and 2 with 5,000,000
        // available; two simultaneous 4,000,000 withdrawals from
        // different terminals must not both succeed.
        let ledger = Arc::new(seeded_ledger());
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [1u32, 2u32]
            .into_iter()
            .map(|card| {
                let ledger = Arc::clone(&ledger);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    ledger.withdraw(card, 1, Money::from_units(4_000_000)).unwrap()
                })
            })
            .collect();

        let decisions: Vec<Decision> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = decisions.iter().filter(|d| d.is_ok()).count();
        assert_eq!(successes, 1, "exactly one withdrawal must win: {decisions:?}");
        assert_eq!(
            decisions.iter().copied().find(|d| d.is_err()).unwrap().unwrap_err(),
            FailureReason::InsufficientFunds
        );

        let balances = ledger.balances(1).unwrap().unwrap();
        assert_eq!(balances.available, units(1_000_000));
        assert_eq!(balances.balance, units(96_000_000));
    }

    #[test]
    fn opposite_direction_transfers_do_not_deadlock() {
        let ledger = Arc::new(AccountLedger::new(
            [
                (1, Balances::new(units(1_000_000), units(1_000_000))),
                (2, Balances::new(units(1_000_000), units(1_000_000))),
            ],
            [1, 2],
            DailyLimits {
                withdrawal: units(5_000_000),
                transfer: units(100_000_000),
            },
        ));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [(1u32, 1u32, 2u32), (2u32, 2u32, 1u32)]
            .into_iter()
            .map(|(card, from, to)| {
                let ledger = Arc::clone(&ledger);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..500 {
                        ledger.transfer(card, from, to, Money::from_units(10)).unwrap().unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Equal opposing flows leave both accounts where they started.
        for account in [1, 2] {
            let balances = ledger.balances(account).unwrap().unwrap();
            assert_eq!(balances.balance, units(1_000_000));
            assert_eq!(balances.available, units(1_000_000));
        }
    }

    #[test]
    fn disjoint_accounts_mutate_independently() {
        let ledger = seeded_ledger();

        approved(ledger.withdraw(1, 1, units(1_000_000)));
        approved(ledger.withdraw(2, 2, units(2_000_000)));

        assert_eq!(approved(ledger.balances(1)).available, units(4_000_000));
        assert_eq!(approved(ledger.balances(2)).available, units(8_000_000));
    }
}
