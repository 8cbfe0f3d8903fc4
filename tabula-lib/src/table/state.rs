//! UI state owned by a table view.

use super::StatusFilter;
use crate::query::Direction;

/// Direction a newly selected sort column starts with.
pub const DEFAULT_SORT_DIRECTION: Direction = Direction::Desc;

/// The interactive state of one table: search, filter, sort and page.
///
/// Only [`TableView`](super::TableView) transitions mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Free-text search.
    pub search: String,
    /// Active status filter value, [`StatusFilter::ALL`] when inactive.
    pub status_filter: String,
    /// Key of the sort column, if any.
    pub sort_column: Option<String>,
    /// Sort direction.
    pub sort_direction: Direction,
    /// 1-based page number.
    pub current_page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl ViewState {
    /// Creates the default state for a page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            status_filter: StatusFilter::ALL.to_string(),
            sort_column: None,
            sort_direction: DEFAULT_SORT_DIRECTION,
            current_page: 1,
            page_size,
        }
    }

    /// Returns `true` if a status filter other than "all" is active.
    pub fn has_status_filter(&self) -> bool {
        self.status_filter != StatusFilter::ALL
    }

    /// Returns the active sort as `(column, direction)`.
    pub fn sort(&self) -> Option<(&str, Direction)> {
        self.sort_column
            .as_deref()
            .map(|column| (column, self.sort_direction))
    }
}
