//! Storage backend trait.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend trait for client-local persistent storage.
///
/// Implementations handle raw string storage/retrieval, the way a browser's
/// local storage does. [`StateStore`](super::StateStore) wraps this with
/// typed JSON serialization, key prefixing and error swallowing.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns `false` when no persistent store exists in this context.
    ///
    /// The state store skips every operation on an unavailable backend.
    fn is_available(&self) -> bool {
        true
    }

    /// Gets the value stored under a key.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores a value under a key, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes a key. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    /// Gets all keys starting with a prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
