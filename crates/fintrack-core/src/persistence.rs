//! Encoding of ledger and goal state into the persisted string keys.
//!
//! Decoding is permissive: anything that cannot be understood falls back to
//! defaults and is reported through `tracing`, never as an error.

use fintrack_domain::Transaction;
use serde_json::Value;
use tracing::warn;

use crate::{
    storage::{KeyValueStore, BALANCE_KEY, GOAL_KEY, TRANSACTIONS_KEY},
    CoreError,
};

/// Ledger fields as found in a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredLedger {
    pub transactions: Vec<Transaction>,
    pub balance: Option<f64>,
}

pub fn encode_transactions(transactions: &[Transaction]) -> Result<String, CoreError> {
    Ok(serde_json::to_string(transactions)?)
}

/// Shortest decimal form that parses back to the same value (`120`, `120.5`).
pub fn encode_decimal(value: f64) -> String {
    format!("{}", value)
}

/// Decodes the transaction array, keeping every entry that is well formed.
pub fn decode_transactions(raw: &str) -> Vec<Transaction> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "stored transactions are not valid JSON; starting empty");
            return Vec::new();
        }
    };
    let Value::Array(items) = value else {
        warn!("stored transactions are not a JSON array; starting empty");
        return Vec::new();
    };

    let total = items.len();
    let transactions: Vec<Transaction> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(txn) => Some(txn),
            Err(err) => {
                warn!(position, error = %err, "skipping malformed stored transaction");
                None
            }
        })
        .collect();
    if transactions.len() != total {
        warn!(
            kept = transactions.len(),
            total, "some stored transactions could not be restored"
        );
    }
    transactions
}

/// Parses a stored decimal string. Non-finite or unparsable values yield `None`.
pub fn decode_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn read_ledger<S: KeyValueStore + ?Sized>(store: &S) -> StoredLedger {
    let transactions = store
        .get(TRANSACTIONS_KEY)
        .map(|raw| decode_transactions(&raw))
        .unwrap_or_default();
    let balance = store.get(BALANCE_KEY).and_then(|raw| {
        let decoded = decode_decimal(&raw);
        if decoded.is_none() {
            warn!(raw = %raw, "stored balance is malformed; ignoring it");
        }
        decoded
    });
    StoredLedger {
        transactions,
        balance,
    }
}

pub fn write_ledger<S: KeyValueStore + ?Sized>(
    store: &mut S,
    transactions: &[Transaction],
    balance: f64,
) -> Result<(), CoreError> {
    store.set(TRANSACTIONS_KEY, &encode_transactions(transactions)?)?;
    store.set(BALANCE_KEY, &encode_decimal(balance))
}

/// Reads the goal; only positive finite values count as a goal.
pub fn read_goal<S: KeyValueStore + ?Sized>(store: &S) -> Option<f64> {
    let raw = store.get(GOAL_KEY)?;
    match decode_decimal(&raw) {
        Some(value) if value > 0.0 => Some(value),
        _ => {
            warn!(raw = %raw, "stored goal is not a positive number; treating it as unset");
            None
        }
    }
}

pub fn write_goal<S: KeyValueStore + ?Sized>(store: &mut S, goal: f64) -> Result<(), CoreError> {
    store.set(GOAL_KEY, &encode_decimal(goal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn decimal_encoding_matches_compact_form() {
        assert_eq!(encode_decimal(120.0), "120");
        assert_eq!(encode_decimal(120.5), "120.5");
        assert_eq!(encode_decimal(-3.25), "-3.25");
        assert_eq!(decode_decimal(" 42.10 "), Some(42.1));
        assert_eq!(decode_decimal("NaN"), None);
        assert_eq!(decode_decimal("abc"), None);
    }

    #[test]
    fn decode_transactions_handles_garbage() {
        assert!(decode_transactions("{not json").is_empty());
        assert!(decode_transactions(r#"{"type":"add"}"#).is_empty());
        assert!(decode_transactions("null").is_empty());
    }

    #[test]
    fn decode_transactions_keeps_well_formed_entries() {
        let raw = r#"[
            {"type":"add","amount":50,"description":"salary"},
            {"type":"transfer","amount":5,"description":"bogus"},
            {"type":"subtract","amount":"ten","description":"bad amount"},
            {"type":"subtract","amount":30,"description":"food"}
        ]"#;
        let decoded = decode_transactions(raw);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0], Transaction::credit(50.0, "salary"));
        assert_eq!(decoded[1], Transaction::debit(30.0, "food"));
    }

    #[test]
    fn read_goal_ignores_non_positive_values() {
        let store = MemoryStore::new().with_entry(GOAL_KEY, "NaN");
        assert_eq!(read_goal(&store), None);
        let store = MemoryStore::new().with_entry(GOAL_KEY, "0");
        assert_eq!(read_goal(&store), None);
        let store = MemoryStore::new().with_entry(GOAL_KEY, "250");
        assert_eq!(read_goal(&store), Some(250.0));
    }

    #[test]
    fn write_ledger_sets_both_keys() {
        let mut store = MemoryStore::new();
        write_ledger(&mut store, &[Transaction::credit(1.5, "tip")], 11.5).unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.get(BALANCE_KEY).as_deref(), Some("11.5"));
        assert_eq!(
            store.get(TRANSACTIONS_KEY).as_deref(),
            Some(r#"[{"type":"add","amount":1.5,"description":"tip"}]"#)
        );
    }
}
