//! Table state persistence
//!
//! Provides a [`StorageBackend`] trait with in-memory, SQLite and no-op
//! implementations, and a [`StateStore`] that saves and restores per-table
//! state under a namespaced key.
//!
//! Persistence never fails from the caller's point of view: every backend or
//! serialization error is logged and degraded to "absent" or "no-op".

mod backend;
mod memory;
mod sqlite;
mod state;
mod unavailable;

pub use backend::*;
pub use memory::*;
pub use sqlite::*;
pub use state::*;
pub use unavailable::*;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::GridConfig;
use crate::error::StoreError;

/// Saves and restores table state in client-local storage.
///
/// Keys are stored as `<prefix><key>`; tables with distinct keys never
/// interfere. Two tables sharing a key race with last-write-wins.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::query::PageSize;
/// use tabula_lib::store::{MemoryStorage, StateStore, TableState};
///
/// let store = StateStore::new(MemoryStorage::new());
/// let state = TableState { page_size: Some(PageSize::Rows(50)), ..Default::default() };
///
/// store.save("users", &state).await;
/// assert_eq!(store.load::<TableState>("users").await, Some(state));
/// assert_eq!(store.load::<TableState>("reports").await, None);
/// ```
#[derive(Clone)]
pub struct StateStore {
    backend: Arc<dyn StorageBackend>,
    prefix: String,
}

impl StateStore {
    /// Default key prefix.
    pub const DEFAULT_PREFIX: &'static str = "ag-grid-state-";

    /// Creates a store over a backend with the default prefix.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_prefix(backend, Self::DEFAULT_PREFIX)
    }

    /// Creates a store over a backend with a custom prefix.
    pub fn with_prefix(backend: impl StorageBackend + 'static, prefix: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(backend),
            prefix: prefix.into(),
        }
    }

    /// Creates a store over a shared backend using the prefix from `config`.
    pub fn from_config(backend: Arc<dyn StorageBackend>, config: &GridConfig) -> Self {
        Self {
            backend,
            prefix: config.storage_prefix.clone(),
        }
    }

    /// Creates a store that persists nothing.
    pub fn unavailable() -> Self {
        Self::new(UnavailableStorage)
    }

    /// Returns the key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` if the backend can persist anything.
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Loads the state stored under `key`.
    ///
    /// Returns `None` both when nothing was saved and when the stored blob
    /// cannot be read or parsed.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.is_available() {
            return None;
        }

        let storage_key = self.storage_key(key);
        let raw = match self.backend.get_item(&storage_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("Error loading table state '{}': {}", storage_key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Error loading table state '{}': {}", storage_key, e);
                None
            }
        }
    }

    /// Saves `state` under `key`. Failures are logged, never returned.
    pub async fn save<T: Serialize + Sync>(&self, key: &str, state: &T) {
        if !self.is_available() {
            return;
        }

        let storage_key = self.storage_key(key);
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Error saving table state '{}': {}", storage_key, e);
                return;
            }
        };

        match self.backend.set_item(&storage_key, json).await {
            Ok(()) => log::debug!("Saved table state '{}'", storage_key),
            Err(e @ StoreError::QuotaExceeded { .. }) => {
                log::warn!("Table state '{}' not saved: {}", storage_key, e)
            }
            Err(e) => log::error!("Error saving table state '{}': {}", storage_key, e),
        }
    }

    /// Removes the state stored under `key`.
    pub async fn clear(&self, key: &str) {
        if !self.is_available() {
            return;
        }

        let storage_key = self.storage_key(key);
        if let Err(e) = self.backend.remove_item(&storage_key).await {
            log::error!("Error clearing table state '{}': {}", storage_key, e);
        }
    }

    /// Removes every state stored under this store's prefix.
    ///
    /// Keys outside the prefix are left untouched.
    pub async fn clear_all(&self) {
        if !self.is_available() {
            return;
        }

        let keys = match self.backend.keys_with_prefix(&self.prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                log::error!("Error clearing all table states: {}", e);
                return;
            }
        };

        for key in keys {
            if let Err(e) = self.backend.remove_item(&key).await {
                log::error!("Error clearing table state '{}': {}", key, e);
            }
        }
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("prefix", &self.prefix)
            .field("available", &self.is_available())
            .finish()
    }
}
