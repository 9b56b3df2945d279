//! In-memory storage with an optional size quota

use std::collections::BTreeMap;

use super::{Storage, StorageError};

/// Volatile storage, used by tests and by callers that persist elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    /// Maximum total bytes of stored values, if limited
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unlimited storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects writes past `limit` bytes
    pub fn with_quota(limit: usize) -> Self {
        Self { entries: BTreeMap::new(), quota: Some(limit) }
    }

    /// Total bytes currently stored
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` holds a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let replaced = self.entries.get(key).map(String::len).unwrap_or(0);
            let needed = self.used_bytes() - replaced + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { key: key.to_string(), needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_storage_is_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.used_bytes(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut storage = MemoryStorage::new();
        storage.set("a", "123").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("123"));
        assert!(storage.contains_key("a"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let mut storage = MemoryStorage::with_quota(5);
        storage.set("a", "12345").unwrap();

        let err = storage.set("b", "6").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 6, limit: 5, .. }));
        assert!(!storage.contains_key("b"));
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(5);
        storage.set("a", "12345").unwrap();
        storage.set("a", "54321").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("54321"));
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let mut storage = MemoryStorage::new();
        assert!(storage.remove("nothing").is_ok());
    }
}
