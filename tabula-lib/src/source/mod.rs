//! Data sources for server-side grids
//!
//! A grid asks for "page P with sort S and filter F" through a
//! [`DatasourceRequest`]. Two kinds of backends answer it:
//!
//! - a [`DataSource`] that paginates, sorts and filters itself (for example
//!   [`HttpSource`] against a paged endpoint), or
//! - a [`BulkSource`] that only returns the whole collection, wrapped in
//!   [`Emulated`] which does the paging, sorting and filtering client-side.
//!
//! [`GridLoader`] sits between the grid and either kind and guarantees that
//! every block request ends in exactly one success or failure callback.

mod emulated;
mod http;
mod loader;

pub use emulated::*;
pub use http::*;
pub use loader::*;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::Row;
use crate::query::DatasourceRequest;
use crate::query::DatasourceResult;

/// A backend that answers page requests itself.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches one page of rows.
    async fn get_rows(&self, request: &DatasourceRequest) -> Result<DatasourceResult, SourceError>;
}

/// A backend that can only return its whole collection.
#[async_trait]
pub trait BulkSource: Send + Sync {
    /// Fetches every row.
    async fn fetch_all(&self) -> Result<Vec<Row>, SourceError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn get_rows(&self, request: &DatasourceRequest) -> Result<DatasourceResult, SourceError> {
        (**self).get_rows(request).await
    }
}

#[async_trait]
impl<T: BulkSource + ?Sized> BulkSource for Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<Row>, SourceError> {
        (**self).fetch_all().await
    }
}

/// A bulk source over a fixed collection.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
/// use tabula_lib::source::{Emulated, StaticSource};
///
/// let rows = vec![Row::new().set("id", 1i64), Row::new().set("id", 2i64)];
/// let source = Emulated::new(StaticSource::new(rows));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Arc<Vec<Row>>,
}

impl StaticSource {
    /// Creates a source serving `rows`.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    /// Returns the served rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[async_trait]
impl BulkSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<Row>, SourceError> {
        Ok(self.rows.as_ref().clone())
    }
}

/// A bulk source backed by an async closure, e.g. an API client call.
///
/// # Example
///
/// ```
/// use tabula_lib::error::SourceError;
/// use tabula_lib::model::Row;
/// use tabula_lib::source::{Emulated, FnSource};
///
/// let users = Emulated::new(FnSource::new(|| async {
///     Ok::<_, SourceError>(vec![Row::new().set("name", "Amina")])
/// }));
/// ```
pub struct FnSource<F> {
    fetch: F,
}

impl<F> FnSource<F> {
    /// Wraps a closure returning a future of all rows.
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<F, Fut> BulkSource for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Row>, SourceError>> + Send + 'static,
{
    async fn fetch_all(&self) -> Result<Vec<Row>, SourceError> {
        (self.fetch)().await
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSource(..)")
    }
}
