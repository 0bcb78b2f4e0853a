//! In-process key-value backend.
//!
//! Used for test isolation and for hosts without durable storage. An optional
//! byte quota emulates a capacity-limited host store.

use super::{StorageBackend, StoreError, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed storage with an optional total byte quota over keys and values.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently held by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let previous = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let required_bytes = self.used_bytes() - previous + key.len() + value.len();
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

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.borrow_mut().clear();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::store::{StorageBackend, StoreError};

    #[test]
    fn quota_rejects_write_and_keeps_prior_value() {
        let storage = MemoryStorage::with_quota(16);
        storage.set_item("k", "small").unwrap();

        let err = storage.set_item("k", "far too large a value").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn overwrite_counts_only_new_value_against_quota() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345678").unwrap();
        storage.set_item("k", "87654321").unwrap();
        assert_eq!(storage.used_bytes(), 9);
    }
}
