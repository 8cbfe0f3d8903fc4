//! Interactive table view: state transitions, persistence and rendering.

use std::sync::Arc;

use super::Action;
use super::ActionButton;
use super::Cell;
use super::Column;
use super::ColumnKind;
use super::FilterBar;
use super::FilterButton;
use super::HeaderCell;
use super::PaginationInfo;
use super::Projection;
use super::RenderedRow;
use super::RenderedTable;
use super::StatCard;
use super::TableConfig;
use super::TableStats;
use super::ViewState;
use super::engine;
use super::stat_color_class;
use super::stat_label;
use crate::model::Row;
use crate::model::Value;
use crate::model::format_date;
use crate::query::ColumnFilter;
use crate::query::FilterModel;
use crate::query::PageSize;
use crate::query::SortModelItem;
use crate::store::ColumnState;
use crate::store::StateStore;
use crate::store::TableState;

/// Filter model key under which the status filter is persisted.
const STATUS_FILTER_KEY: &str = "status";

/// A table over an in-memory collection.
///
/// The view owns the rows and the [`ViewState`] and keeps a projection of
/// the visible page up to date after every transition. Data is supplied by
/// the caller; the view never fetches anything.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
/// use tabula_lib::table::{Column, TableConfig, TableView};
///
/// let config = TableConfig::new(vec![Column::text("title", "Title")])
///     .with_search_keys(["title"]);
///
/// let mut view = TableView::new(config);
/// view.set_data(vec![
///     Row::new().set("title", "Alpha"),
///     Row::new().set("title", "Beta"),
/// ]);
/// view.set_search("alp");
///
/// assert_eq!(view.filtered_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TableView {
    config: Arc<TableConfig>,
    rows: Vec<Row>,
    state: ViewState,
    projection: Projection,
    stats: Option<TableStats>,
    loading: bool,
    column_layout: Vec<ColumnState>,
}

impl TableView {
    /// Creates an empty view with default state.
    pub fn new(config: impl Into<Arc<TableConfig>>) -> Self {
        let config = config.into();
        let state = ViewState::new(config.page_size);
        let mut view = Self {
            config,
            rows: Vec::new(),
            state,
            projection: Projection::default(),
            stats: None,
            loading: false,
            column_layout: Vec::new(),
        };
        view.recompute();
        view
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the full collection.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the current UI state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the current projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns the rows of the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        self.projection.page_rows(&self.rows)
    }

    /// Number of rows after status filter and search.
    pub fn filtered_count(&self) -> usize {
        self.projection.filtered_count()
    }

    /// Number of pages; 1 when pagination is disabled.
    pub fn total_pages(&self) -> usize {
        self.projection.total_pages
    }

    /// Returns the 1-based current page.
    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Returns the saved column layout.
    pub fn column_layout(&self) -> &[ColumnState] {
        &self.column_layout
    }

    /// Returns `true` while the loading placeholder is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Replaces the collection.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.recompute();
    }

    /// Sets the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.recompute();
    }

    /// Sets the active status filter.
    pub fn set_status_filter(&mut self, value: impl Into<String>) {
        self.state.status_filter = value.into();
        self.recompute();
    }

    /// Sorts by `column`, flipping the direction if it is already active.
    ///
    /// A newly selected column starts descending.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.state.sort_column.as_deref() == Some(column) {
            self.state.sort_direction = self.state.sort_direction.flipped();
        } else {
            self.state.sort_column = Some(column.to_string());
            self.state.sort_direction = super::DEFAULT_SORT_DIRECTION;
        }
        log::debug!(
            "Sorting by {} {}",
            column,
            self.state.sort_direction.as_str()
        );
        self.recompute();
    }

    /// Handles a click on a column header.
    ///
    /// Returns `false` without changing anything for unknown or non-sortable
    /// columns.
    pub fn header_clicked(&mut self, column: &str) -> bool {
        match self.config.column(column) {
            Some(c) if c.sortable => {
                self.toggle_sort(column);
                true
            }
            _ => false,
        }
    }

    /// Moves to page `page`.
    ///
    /// Pages outside `1..=total_pages` are ignored; returns whether the page
    /// changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.projection.total_pages {
            return false;
        }
        self.state.current_page = page;
        engine::repaginate(&mut self.projection, &self.config, &self.state);
        true
    }

    /// Changes the page size and returns to the first page.
    pub fn change_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size;
        self.state.current_page = 1;
        engine::repaginate(&mut self.projection, &self.config, &self.state);
    }

    /// Restores the default state and clears the column layout.
    pub fn reset(&mut self) {
        self.state = ViewState::new(self.config.page_size);
        self.column_layout.clear();
        self.recompute();
    }

    /// Shows or hides the loading placeholder.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Sets the stats shown above the table.
    pub fn set_stats(&mut self, stats: Option<TableStats>) {
        self.stats = stats;
    }

    /// Records a user-resized column width in pixels.
    pub fn set_column_width(&mut self, column: &str, width: u32) {
        self.layout_mut(column).width = Some(width);
    }

    /// Hides or shows a column.
    pub fn set_column_hidden(&mut self, column: &str, hidden: bool) {
        self.layout_mut(column).hide = Some(hidden);
    }

    /// Runs action `action` for the row at `position` on the current page.
    ///
    /// Returns `false` if either index is out of range or the action is not
    /// visible for that row.
    pub fn trigger_action(&self, action: usize, position: usize) -> bool {
        let Some(action) = self.config.actions.get(action) else {
            return false;
        };
        let Some(&index) = self.projection.page_indices().get(position) else {
            return false;
        };
        action.invoke(&self.rows[index])
    }

    fn recompute(&mut self) {
        self.projection = engine::project(&self.rows, &self.config, &self.state);
    }

    fn layout_mut(&mut self, column: &str) -> &mut ColumnState {
        let position = match self.column_layout.iter().position(|c| c.col_id == column) {
            Some(position) => position,
            None => {
                self.column_layout.push(ColumnState::new(column));
                self.column_layout.len() - 1
            }
        };
        &mut self.column_layout[position]
    }

    fn layout(&self, column: &str) -> Option<&ColumnState> {
        self.column_layout.iter().find(|c| c.col_id == column)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Returns the persistable part of the state.
    ///
    /// The search text is not persisted.
    pub fn saved_state(&self) -> TableState {
        let sort_model = self.state.sort().map(|(col_id, sort)| {
            vec![SortModelItem {
                col_id: col_id.to_string(),
                sort,
            }]
        });

        let filter_model = self.state.has_status_filter().then(|| {
            let mut model = FilterModel::new();
            model.insert(
                STATUS_FILTER_KEY.to_string(),
                ColumnFilter::text(self.state.status_filter.clone()),
            );
            model
        });

        TableState {
            column_state: (!self.column_layout.is_empty()).then(|| self.column_layout.clone()),
            filter_model,
            sort_model,
            page_size: Some(PageSize::Rows(self.state.page_size)),
        }
    }

    /// Applies a persisted state and returns to the first page.
    ///
    /// Absent fields keep their current value. The all-rows page size has no
    /// meaning for an in-memory table and is ignored.
    pub fn apply_saved_state(&mut self, saved: TableState) {
        if let Some(item) = saved.sort_model.as_ref().and_then(|items| items.first()) {
            self.state.sort_column = Some(item.col_id.clone());
            self.state.sort_direction = item.sort;
        }

        if let Some(status) = saved
            .filter_model
            .as_ref()
            .and_then(|model| model.get(STATUS_FILTER_KEY))
            .and_then(ColumnFilter::criterion)
        {
            self.state.status_filter = status.to_display_string();
        }

        if let Some(PageSize::Rows(size)) = saved.page_size
            && size > 0
        {
            self.state.page_size = size;
        }

        if let Some(layout) = saved.column_state {
            self.column_layout = layout;
        }

        self.state.current_page = 1;
        self.recompute();
    }

    /// Saves the current state under `key`.
    pub async fn persist(&self, store: &StateStore, key: &str) {
        store.save(key, &self.saved_state()).await;
    }

    /// Restores the state saved under `key`.
    ///
    /// Returns `false` and keeps the current state when nothing usable was
    /// saved.
    pub async fn restore(&mut self, store: &StateStore, key: &str) -> bool {
        match store.load::<TableState>(key).await {
            Some(saved) => {
                self.apply_saved_state(saved);
                true
            }
            None => false,
        }
    }

    /// Clears the state saved under `key` and resets the view.
    pub async fn reset_persisted(&mut self, store: &StateStore, key: &str) {
        store.clear(key).await;
        self.reset();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Builds the presentation model of the current state.
    pub fn render(&self) -> RenderedTable {
        let page = self.projection.page_indices();
        let columns: Vec<&Column> = self
            .config
            .columns
            .iter()
            .filter(|c| !self.layout(&c.key).is_some_and(ColumnState::is_hidden))
            .collect();

        let rows: Vec<RenderedRow> = if self.loading {
            Vec::new()
        } else {
            page.iter()
                .enumerate()
                .map(|(position, &index)| self.render_row(position, &self.rows[index], &columns))
                .collect()
        };

        let empty_message =
            (!self.loading && rows.is_empty()).then(|| self.config.empty_message.clone());
        let pagination = (self.config.show_pagination && !rows.is_empty())
            .then(|| self.pagination_info(page.len()));

        RenderedTable {
            stats: self.render_stats(),
            filter_bar: self.render_filter_bar(page.len()),
            headers: columns.iter().map(|c| self.render_header(c)).collect(),
            has_actions: !self.config.actions.is_empty(),
            rows,
            empty_message,
            pagination,
            loading: self.loading,
        }
    }

    fn render_stats(&self) -> Vec<StatCard> {
        match &self.stats {
            Some(stats) if self.config.show_stats => stats
                .entries()
                .iter()
                .map(|(key, value)| StatCard {
                    key: key.clone(),
                    label: stat_label(key),
                    value: *value,
                    color_class: stat_color_class(key),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn render_filter_bar(&self, shown: usize) -> Option<FilterBar> {
        if !self.config.show_filters || self.config.hide_search_bar {
            return None;
        }

        let buttons = self
            .config
            .status_filters
            .iter()
            .map(|filter| FilterButton {
                value: filter.value.clone(),
                label: filter.label.clone(),
                active: filter.value == self.state.status_filter,
                count: filter.count,
                color: filter.color.clone(),
            })
            .collect();

        let filtered = self.filtered_count();
        let mut summary = format!("Showing {} of {} items", shown, filtered);
        if filtered != self.rows.len() {
            summary.push_str(&format!(" (filtered from {} total)", self.rows.len()));
        }

        Some(FilterBar {
            search: self.state.search.clone(),
            placeholder: self.config.search_placeholder.clone(),
            buttons,
            summary,
        })
    }

    fn render_header(&self, column: &Column) -> HeaderCell {
        let width = self
            .layout(&column.key)
            .and_then(|layout| layout.width)
            .map(|px| format!("{px}px"))
            .or_else(|| column.width.clone());

        let sort = self
            .state
            .sort()
            .filter(|(key, _)| column.sortable && *key == column.key)
            .map(|(_, direction)| direction);

        HeaderCell {
            key: column.key.clone(),
            label: column.label.clone(),
            width,
            sortable: column.sortable,
            sort,
        }
    }

    fn render_row(&self, position: usize, row: &Row, columns: &[&Column]) -> RenderedRow {
        RenderedRow {
            position,
            cells: columns.iter().map(|column| render_cell(column, row)).collect(),
            actions: self
                .config
                .actions
                .iter()
                .enumerate()
                .filter(|(_, action)| action.is_visible(row))
                .map(|(index, action)| render_action(index, action, row))
                .collect(),
        }
    }

    fn pagination_info(&self, shown: usize) -> PaginationInfo {
        let current_page = self.state.current_page;
        let total_pages = self.projection.total_pages;
        let from = current_page.saturating_sub(1) * self.state.page_size + 1;

        PaginationInfo {
            current_page,
            total_pages,
            from,
            to: (from + shown).saturating_sub(1),
            of: self.filtered_count(),
            page_size: self.state.page_size,
            can_prev: current_page > 1,
            can_next: current_page < total_pages,
        }
    }
}

fn render_cell(column: &Column, row: &Row) -> Cell {
    let value = column.cell_value(row);
    match column.kind {
        ColumnKind::Text => Cell::Text(value.to_display_string()),
        ColumnKind::Date => Cell::Date(render_date(&value)),
        ColumnKind::Badge => Cell::Badge {
            text: value.to_display_string(),
            variant: column
                .badge_variant
                .as_ref()
                .map(|variant| variant(row))
                .unwrap_or_default(),
        },
        ColumnKind::Custom => Cell::Custom(match &column.renderer {
            Some(renderer) => renderer(row),
            None => value.to_display_string(),
        }),
    }
}

fn render_date(value: &Value) -> String {
    match value.to_timestamp() {
        Some(dt) => format_date(&dt),
        None => value.to_display_string(),
    }
}

fn render_action(index: usize, action: &Action, row: &Row) -> ActionButton {
    ActionButton {
        action: index,
        label: (!action.icon_only).then(|| action.label.clone()),
        aria_label: action.label.clone(),
        icon: action.icon_for(row),
        tooltip: action.tooltip_for(row),
        color: action.color.clone(),
    }
}
