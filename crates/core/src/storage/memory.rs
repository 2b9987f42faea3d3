//! In-memory storage

use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageError};

/// Shared in-memory storage.
///
/// Clones share the same entries, so a store and a test (or two store
/// instances standing in for two sessions) can observe each other's writes.
/// An optional quota caps the combined size of keys and values in bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create empty, unbounded storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage holding at most `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Rc::default(),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Bytes currently held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let existing = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());

            let requested = self.used_bytes() - existing + key.len() + value.len();

            if requested > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    quota,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_key_reads_as_none() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set("cart", "one")?;
        storage.set("cart", "two")?;

        assert_eq!(storage.get("cart")?.as_deref(), Some("two"));
        assert_eq!(storage.len(), 1);

        Ok(())
    }

    #[test]
    fn clones_share_entries() -> TestResult {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("cart", "shared")?;

        assert_eq!(other.get("cart")?.as_deref(), Some("shared"));

        Ok(())
    }

    #[test]
    fn remove_reports_presence() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set("cart", "value")?;

        assert!(storage.remove("cart")?);
        assert!(!storage.remove("cart")?);
        assert!(storage.is_empty());

        Ok(())
    }

    #[test]
    fn quota_rejects_oversized_writes() -> TestResult {
        let storage = MemoryStorage::with_quota(10);

        storage.set("k", "12345")?;

        let result = storage.set("k2", "123456");

        assert!(matches!(
            result,
            Err(StorageError::QuotaExceeded {
                requested: 14,
                quota: 10,
                ..
            })
        ));
        assert_eq!(storage.get("k2")?, None);

        Ok(())
    }

    #[test]
    fn quota_counts_replaced_value_once() -> TestResult {
        let storage = MemoryStorage::with_quota(10);

        storage.set("k", "123456789")?;
        storage.set("k", "987654321")?;

        assert_eq!(storage.used_bytes(), 10);

        Ok(())
    }
}
