//! Storage error types

/// Errors raised by storage backends.
///
/// [`StateStore`](crate::store::StateStore) logs and swallows these; they
/// only reach callers that use a backend directly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite backend error.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// Writing the value would exceed the backend's quota.
    #[error("quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        /// Bytes the write would occupy.
        needed: usize,
        /// Bytes still available.
        available: usize,
    },

    /// The value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No persistent store is available in this context.
    #[error("storage unavailable")]
    Unavailable,
}
