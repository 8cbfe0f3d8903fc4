//! No-op backend for contexts without persistent storage.

use async_trait::async_trait;

use super::StorageBackend;
use crate::error::StoreError;

/// A backend that stores nothing.
///
/// Selected when no client-local store exists (server-side rendering,
/// headless jobs). Reports itself unavailable, so
/// [`StateStore`](super::StateStore) never calls it; direct calls fail
/// with [`StoreError::Unavailable`] on writes and read as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

#[async_trait]
impl StorageBackend for UnavailableStorage {
    fn is_available(&self) -> bool {
        false
    }

    async fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn set_item(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn keys_with_prefix(&self, _prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}
