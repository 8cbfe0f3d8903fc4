//! Page request and result types.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use super::FilterModel;
use super::SortModelItem;
use crate::model::Row;

/// Number of rows per page, or the "all rows" sentinel.
///
/// On the wire the sentinel is `-1`; any negative number reads as `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    /// A fixed number of rows per page.
    Rows(usize),
    /// Every matching row on a single page.
    All,
}

impl PageSize {
    /// Wire value of [`PageSize::All`].
    pub const ALL_SENTINEL: i64 = -1;

    /// Reads a wire value (`-1` meaning all).
    pub fn from_wire(value: i64) -> Self {
        if value < 0 {
            PageSize::All
        } else {
            PageSize::Rows(value as usize)
        }
    }

    /// Returns the wire value.
    pub fn to_wire(self) -> i64 {
        match self {
            PageSize::Rows(n) => n as i64,
            PageSize::All => Self::ALL_SENTINEL,
        }
    }

    /// Returns the row count, or `None` for `All`.
    pub fn rows(self) -> Option<usize> {
        match self {
            PageSize::Rows(n) => Some(n),
            PageSize::All => None,
        }
    }

    /// Returns `true` for the all-rows sentinel.
    pub fn is_all(self) -> bool {
        matches!(self, PageSize::All)
    }

    /// Returns the 0-based page `page` of `items`.
    ///
    /// Out-of-range pages yield an empty slice; `All` yields everything.
    pub fn slice<T>(self, items: &[T], page: usize) -> &[T] {
        match self {
            PageSize::All => items,
            PageSize::Rows(size) => {
                let start = page.saturating_mul(size).min(items.len());
                let end = start.saturating_add(size).min(items.len());
                &items[start..end]
            }
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Rows(10)
    }
}

impl From<usize> for PageSize {
    fn from(value: usize) -> Self {
        PageSize::Rows(value)
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(PageSize::from_wire)
    }
}

/// A request for one page of rows.
///
/// # Example
///
/// ```
/// use tabula_lib::query::{DatasourceRequest, PageSize, SortModelItem};
///
/// let request = DatasourceRequest::new(1, PageSize::Rows(10))
///     .with_sort(vec![SortModelItem::asc("title")]);
///
/// let json = serde_json::to_string(&request).unwrap();
/// assert_eq!(json, r#"{"page":1,"pageSize":10,"sortModel":[{"colId":"title","sort":"asc"}]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceRequest {
    /// 0-based page index.
    pub page: usize,
    /// Rows per page.
    pub page_size: PageSize,
    /// Sort criteria; only the first is applied by emulated sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_model: Option<Vec<SortModelItem>>,
    /// Per-column filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_model: Option<FilterModel>,
}

impl DatasourceRequest {
    /// Creates a request for a page without sort or filter.
    pub fn new(page: usize, page_size: PageSize) -> Self {
        Self {
            page,
            page_size,
            sort_model: None,
            filter_model: None,
        }
    }

    /// Sets the sort model.
    pub fn with_sort(mut self, sort_model: Vec<SortModelItem>) -> Self {
        self.sort_model = Some(sort_model);
        self
    }

    /// Sets the filter model.
    pub fn with_filter(mut self, filter_model: FilterModel) -> Self {
        self.filter_model = Some(filter_model);
        self
    }
}

/// One page of rows and the number of rows matching the request overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasourceResult {
    /// The rows of the requested page.
    pub data: Vec<Row>,
    /// Total rows matching the filter, before pagination.
    pub total: usize,
}

impl DatasourceResult {
    /// Creates a new result.
    pub fn new(data: Vec<Row>, total: usize) -> Self {
        Self { data, total }
    }

    /// Returns the rows of this page.
    pub fn rows(&self) -> &[Row] {
        &self.data
    }

    /// Consumes the result and returns the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.data
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
