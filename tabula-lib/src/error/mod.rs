//! Error types

mod source;
mod store;

pub use source::*;
pub use store::*;

/// Top-level error for callers that want a single error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A data source failed to produce rows.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
