//! In-process store backend.
//!
//! Used as the test double for repositories and for ephemeral sessions.
//! An optional byte quota mimics a bounded browser storage area.

use super::{StoreBackend, StoreError, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// `BTreeMap`-backed store. Not `Sync`; one logical writer only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once keys plus values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl StoreBackend for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |existing| key.len() + existing.len());
            let required_bytes = self.used_bytes() - replaced + key.len() + value.len();
            if required_bytes > quota_bytes {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::{StoreBackend, StoreError};

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let store = MemoryStore::with_quota(16);
        store.write("key", "small").unwrap();

        let err = store.write("key", "this value is far too large").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota_bytes: 16, .. }));
        assert_eq!(store.read("key").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn quota_counts_replacement_not_accumulation() {
        let store = MemoryStore::with_quota(10);
        store.write("k", "123456789").unwrap();
        store.write("k", "987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.write("b", "1").unwrap();
        store.write("a", "2").unwrap();
        assert_eq!(store.list_keys().unwrap(), ["a", "b"]);
    }
}
