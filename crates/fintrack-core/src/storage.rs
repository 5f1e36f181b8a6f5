//! Key-value persistence contract shared by every backend.

use std::collections::BTreeMap;

use crate::CoreError;

/// Key holding the JSON array of transactions.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the current balance as a decimal string.
pub const BALANCE_KEY: &str = "balance";
/// Key holding the savings goal as a decimal string.
pub const GOAL_KEY: &str = "goal";

/// Opaque string-keyed store. Keys are written independently; there is no
/// atomicity across them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set(key, value)
    }
}

/// Volatile store backed by a sorted map. Counts writes so callers can
/// observe whether an operation reached persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value without counting it as a write.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_counts_writes_but_not_seeds() {
        let mut store = MemoryStore::new().with_entry(GOAL_KEY, "100");
        assert_eq!(store.write_count(), 0);

        store.set(BALANCE_KEY, "42").unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get(BALANCE_KEY).as_deref(), Some("42"));
        assert_eq!(store.get(GOAL_KEY).as_deref(), Some("100"));
        assert_eq!(store.get(TRANSACTIONS_KEY), None);
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
