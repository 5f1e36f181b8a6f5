//! Domain models for ledger transactions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Direction of a transaction relative to the balance.
///
/// Serialized with the short names used by the persisted payload
/// (`"add"` / `"subtract"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "add")]
    Credit,
    #[serde(rename = "subtract")]
    Debit,
}

impl TransactionKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "add",
            TransactionKind::Debit => "subtract",
        }
    }

    /// Sign applied to amounts of this kind.
    pub fn sign(self) -> f64 {
        match self {
            TransactionKind::Credit => 1.0,
            TransactionKind::Debit => -1.0,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TransactionKind::Credit => '+',
            TransactionKind::Debit => '-',
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        };
        f.write_str(label)
    }
}

/// A single income or expense entry. Identity is its position in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
        }
    }

    pub fn credit(amount: f64, description: impl Into<String>) -> Self {
        Self::new(TransactionKind::Credit, amount, description)
    }

    pub fn debit(amount: f64, description: impl Into<String>) -> Self {
        Self::new(TransactionKind::Debit, amount, description)
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let txn = Transaction::credit(50.0, "salary");
        let json = serde_json::to_string(&txn).unwrap();
        assert_eq!(json, r#"{"type":"add","amount":50.0,"description":"salary"}"#);
    }

    #[test]
    fn deserializes_subtract_entries() {
        let txn: Transaction =
            serde_json::from_str(r#"{"type":"subtract","amount":30,"description":"food"}"#)
                .unwrap();
        assert_eq!(txn.kind, TransactionKind::Debit);
        assert_eq!(txn.amount, 30.0);
        assert_eq!(txn.signed_amount(), -30.0);
    }

    #[test]
    fn signed_total_nets_credits_and_debits() {
        let entries = vec![
            Transaction::credit(50.0, "salary"),
            Transaction::debit(30.0, "food"),
            Transaction::credit(5.5, "refund"),
        ];
        assert_eq!(signed_total(&entries), 25.5);
    }
}
