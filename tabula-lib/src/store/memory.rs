//! In-memory storage backend using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageBackend;
use crate::error::StoreError;

/// An in-memory backend backed by a concurrent hash map.
///
/// Data is lost when the process exits. An optional byte quota mimics the
/// size limit of browser storage: a write that would push the total size of
/// keys and values past the quota fails with [`StoreError::QuotaExceeded`].
///
/// # Example
///
/// ```
/// use tabula_lib::store::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// let small = MemoryStorage::with_quota(1024);
/// assert!(storage.is_empty());
/// assert_eq!(small.quota(), Some(1024));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates a new empty storage without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty storage limited to `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            store: DashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Returns the quota in bytes, if any.
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the bytes used by keys and values, excluding `skip`.
    fn used_bytes(&self, skip: &str) -> usize {
        self.store
            .iter()
            .filter(|entry| entry.key() != skip)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_bytes(key));
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StoreError::QuotaExceeded { needed, available });
            }
        }
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect())
    }
}
