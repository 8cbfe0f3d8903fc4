//! Persisted table state.

use serde::Deserialize;
use serde::Serialize;

use crate::query::Direction;
use crate::query::FilterModel;
use crate::query::PageSize;
use crate::query::SortModelItem;

/// Layout of one column as a grid reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    /// The column id.
    pub col_id: String,
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Whether the column is hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    /// Sort direction applied to this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Direction>,
    /// Position of this column among multiple sorted columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

impl ColumnState {
    /// Creates a column state with only the id set.
    pub fn new(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            width: None,
            hide: None,
            sort: None,
            sort_index: None,
        }
    }

    /// Returns `true` if the column is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hide.unwrap_or(false)
    }
}

/// Table configuration persisted between sessions.
///
/// Serialized as `{ columnState?, filterModel?, sortModel?, pageSize? }`.
/// Every field is optional so that partial or older blobs still load.
///
/// # Example
///
/// ```
/// use tabula_lib::query::{PageSize, SortModelItem};
/// use tabula_lib::store::TableState;
///
/// let state = TableState {
///     sort_model: Some(vec![SortModelItem::desc("createdAt")]),
///     page_size: Some(PageSize::Rows(20)),
///     ..TableState::default()
/// };
///
/// let json = serde_json::to_string(&state).unwrap();
/// assert_eq!(json, r#"{"sortModel":[{"colId":"createdAt","sort":"desc"}],"pageSize":20}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    /// Column layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_state: Option<Vec<ColumnState>>,
    /// Active filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_model: Option<FilterModel>,
    /// Active sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_model: Option<Vec<SortModelItem>>,
    /// Rows per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,
}

impl TableState {
    /// Returns `true` if nothing is set.
    pub fn is_empty(&self) -> bool {
        self.column_state.is_none()
            && self.filter_model.is_none()
            && self.sort_model.is_none()
            && self.page_size.is_none()
    }
}
