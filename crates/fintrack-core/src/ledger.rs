//! The ledger: ordered transactions plus an incrementally maintained balance.
//!
//! Every mutation validates first and only then touches state, so a failed
//! call leaves the ledger exactly as it was. The balance is never recomputed
//! from scratch; each operation applies its own delta, and
//! [`Ledger::is_consistent`] checks that
//! `current_balance == initial_balance + credits - debits` still holds.

use fintrack_domain::{signed_total, Amounted, LedgerSnapshot, Transaction, TransactionKind};
use tracing::debug;

use crate::{
    persistence::{self, StoredLedger},
    storage::KeyValueStore,
    validation::{ensure_finite, ensure_transaction_amount, parse_description},
    CoreError,
};

/// Tolerance used when comparing balances built from floating point sums.
pub const BALANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    initial_balance: f64,
    current_balance: f64,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored fields.
    ///
    /// The store only carries the current balance, so the initial balance is
    /// derived from it. Without a usable balance the ledger starts from zero.
    pub fn from_stored(stored: StoredLedger) -> Self {
        let net = signed_total(&stored.transactions);
        let (initial_balance, current_balance) = match stored.balance {
            Some(balance) => (balance - net, balance),
            None => (0.0, net),
        };
        Self {
            initial_balance,
            current_balance,
            transactions: stored.transactions,
        }
    }

    /// Reads the persisted transaction list and balance, defaulting on anything
    /// missing or malformed.
    pub fn rehydrate<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let ledger = Self::from_stored(persistence::read_ledger(store));
        debug!(
            transactions = ledger.transactions.len(),
            balance = ledger.current_balance,
            "ledger rehydrated"
        );
        ledger
    }

    /// Writes the transaction list and balance keys.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), CoreError> {
        persistence::write_ledger(store, &self.transactions, self.current_balance)
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn current_balance(&self) -> f64 {
        self.current_balance
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Resets the balance to `value`.
    ///
    /// Existing transactions are kept, but their contribution is discarded:
    /// the reported balance becomes exactly `value` and the initial balance is
    /// re-derived underneath it so the ledger stays consistent.
    pub fn set_initial_balance(&mut self, value: f64) -> Result<(), CoreError> {
        let value = ensure_finite(value, "balance")?;
        self.initial_balance = value - signed_total(&self.transactions);
        self.current_balance = value;
        debug!(balance = value, "balance reset");
        Ok(())
    }

    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<(), CoreError> {
        let amount = ensure_transaction_amount(amount)?;
        let description = parse_description(description)?;
        if kind == TransactionKind::Debit && amount > self.current_balance {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available: self.current_balance,
            });
        }

        let transaction = Transaction::new(kind, amount, description);
        self.current_balance += transaction.signed_amount();
        self.transactions.push(transaction);
        debug!(%kind, amount, balance = self.current_balance, "transaction added");
        Ok(())
    }

    /// Replaces the amount and description of the entry at `index`.
    ///
    /// The kind is fixed. No sufficient-balance check is made here, so an edit
    /// may leave the balance negative.
    pub fn edit_transaction(
        &mut self,
        index: usize,
        new_amount: f64,
        new_description: &str,
    ) -> Result<(), CoreError> {
        let len = self.transactions.len();
        let new_amount = ensure_transaction_amount(new_amount)?;
        let transaction = self
            .transactions
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;

        let delta = new_amount - transaction.amount;
        self.current_balance += transaction.kind.sign() * delta;
        transaction.amount = new_amount;
        transaction.description = new_description.trim().to_string();
        debug!(index, delta, balance = self.current_balance, "transaction edited");
        Ok(())
    }

    /// Removes the entry at `index`, reversing its effect on the balance.
    pub fn delete_transaction(&mut self, index: usize) -> Result<Transaction, CoreError> {
        let len = self.transactions.len();
        if index >= len {
            return Err(CoreError::IndexOutOfRange { index, len });
        }
        let removed = self.transactions.remove(index);
        self.current_balance -= removed.signed_amount();
        debug!(index, balance = self.current_balance, "transaction deleted");
        Ok(removed)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            initial_balance: self.initial_balance,
            current_balance: self.current_balance,
            transactions: self.transactions.clone(),
        }
    }

    /// Balance implied by the initial balance and the live transactions.
    pub fn expected_balance(&self) -> f64 {
        self.initial_balance + signed_total(&self.transactions)
    }

    pub fn is_consistent(&self) -> bool {
        (self.expected_balance() - self.current_balance).abs() <= BALANCE_EPSILON
    }
}
