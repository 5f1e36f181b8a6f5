//! Read-only views of ledger state handed to presentation layers.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Point-in-time copy of the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    pub initial_balance: f64,
    pub current_balance: f64,
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_credits(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.is_credit())
            .map(|txn| txn.amount)
            .sum()
    }

    pub fn total_debits(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| !txn.is_credit())
            .map(|txn| txn.amount)
            .sum()
    }
}
