//! SQLite-backed persistent storage.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;

use super::StorageBackend;
use crate::error::StoreError;

/// A persistent backend backed by SQLite.
///
/// Data is stored in a SQLite database file and persists across process
/// restarts. Uses WAL journal mode for file databases.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::store::SqliteStorage;
///
/// // File-based storage
/// let storage = SqliteStorage::open("table-state.db").await?;
///
/// // In-memory storage (for testing)
/// let storage = SqliteStorage::open_in_memory().await?;
/// ```
pub struct SqliteStorage {
    client: Client,
}

impl SqliteStorage {
    /// Opens storage at the specified path.
    ///
    /// Creates the database file and table if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    /// Opens an in-memory database. Data is lost when the storage is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    async fn init_schema(client: &Client) -> Result<(), async_sqlite::Error> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS storage (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    )",
                    [],
                )
                .map(|_| ())
            })
            .await
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM storage WHERE key = ?")?;
                let mut rows = stmt.query([&key])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        Ok(value)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let key = key.to_string();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO storage (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![&key, &value],
                )
            })
            .await?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM storage WHERE key = ?", [&key]))
            .await?;

        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // Exact prefix match; LIKE would treat `_` and `%` in keys as wildcards.
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT key FROM storage WHERE substr(key, 1, length(?1)) = ?1")?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite_remove() {
        let storage = SqliteStorage::open_in_memory().await.unwrap();

        assert_eq!(storage.get_item("a").await.unwrap(), None);

        storage.set_item("a", "1".into()).await.unwrap();
        storage.set_item("a", "2".into()).await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), Some("2".to_string()));

        storage.remove_item("a").await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_with_prefix_is_literal() {
        let storage = SqliteStorage::open_in_memory().await.unwrap();
        storage.set_item("grid_users", "{}".into()).await.unwrap();
        storage.set_item("gridXusers", "{}".into()).await.unwrap();

        let keys = storage.keys_with_prefix("grid_").await.unwrap();
        assert_eq!(keys, vec!["grid_users"]);
    }
}
