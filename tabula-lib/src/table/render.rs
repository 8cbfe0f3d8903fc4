//! Presentation model produced by [`TableView::render`](super::TableView::render).
//!
//! These types carry everything a front end needs to draw a table and
//! nothing about how it is drawn.

use super::BadgeVariant;
use crate::query::Direction;

/// A fully rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    /// Stat cards; empty unless stats are enabled and supplied.
    pub stats: Vec<StatCard>,
    /// Search box, status buttons and result summary, when shown.
    pub filter_bar: Option<FilterBar>,
    /// Visible column headers in display order.
    pub headers: Vec<HeaderCell>,
    /// Whether an actions column is present.
    pub has_actions: bool,
    /// Body rows of the current page; empty while loading.
    pub rows: Vec<RenderedRow>,
    /// Empty-state message, set when not loading and the page has no rows.
    pub empty_message: Option<String>,
    /// Pagination controls, when pagination is enabled and rows are shown.
    pub pagination: Option<PaginationInfo>,
    /// Whether the loading placeholder is shown instead of rows.
    pub loading: bool,
}

/// One summary card above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub key: String,
    pub label: String,
    pub value: u64,
    pub color_class: &'static str,
}

/// The search and filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    /// Current search text.
    pub search: String,
    /// Placeholder of the search box.
    pub placeholder: String,
    /// Status filter buttons; empty when none are configured.
    pub buttons: Vec<FilterButton>,
    /// "Showing X of Y items", plus "(filtered from Z total)" when filtered.
    pub summary: String,
}

/// A status filter button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub value: String,
    pub label: String,
    pub active: bool,
    pub count: Option<usize>,
    /// Color class applied while active.
    pub color: Option<String>,
}

/// A column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    /// CSS width; a saved column width takes precedence over the configured one.
    pub width: Option<String>,
    pub sortable: bool,
    /// Sort indicator, set only on the active sort column.
    pub sort: Option<Direction>,
}

/// A body row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Position of the row on the current page.
    pub position: usize,
    /// One cell per visible column.
    pub cells: Vec<Cell>,
    /// Buttons of the actions visible for this row.
    pub actions: Vec<ActionButton>,
}

/// Content of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// A formatted date, or the raw text if it does not parse.
    Date(String),
    /// A badge with its color variant.
    Badge { text: String, variant: BadgeVariant },
    /// Output of a custom renderer.
    Custom(String),
}

impl Cell {
    /// Returns the text of the cell regardless of its kind.
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(text) | Cell::Date(text) | Cell::Custom(text) => text,
            Cell::Badge { text, .. } => text,
        }
    }
}

/// A row action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    /// Index of the action in the table configuration.
    pub action: usize,
    /// Text label; `None` for icon-only actions.
    pub label: Option<String>,
    /// Accessible label, always the action label.
    pub aria_label: String,
    pub icon: Option<String>,
    pub tooltip: String,
    pub color: Option<String>,
}

/// Page navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    /// 1-based current page.
    pub current_page: usize,
    pub total_pages: usize,
    /// 1-based position of the first row on the page.
    pub from: usize,
    /// 1-based position of the last row on the page.
    pub to: usize,
    /// Rows after filtering.
    pub of: usize,
    /// Rows per page.
    pub page_size: usize,
    /// First and previous buttons are enabled.
    pub can_prev: bool,
    /// Next and last buttons are enabled.
    pub can_next: bool,
}
