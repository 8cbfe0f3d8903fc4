//! Table configuration: columns, actions, status filters, feature flags.

use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// A shared function of a row.
pub type RowFn<T> = Arc<dyn Fn(&Row) -> T + Send + Sync>;

/// A configuration value that is either fixed or computed from the row.
///
/// Render and sort paths both go through [`Dynamic::resolve`], so they always
/// agree on the resolved value.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
/// use tabula_lib::table::Dynamic;
///
/// let fixed = Dynamic::from("Edit");
/// let computed = Dynamic::computed(|row: &Row| {
///     if row.resolve_or_null("status").as_str() == Some("published") {
///         "Unpublish".to_string()
///     } else {
///         "Publish".to_string()
///     }
/// });
///
/// let row = Row::new().set("status", "draft");
/// assert_eq!(fixed.resolve(&row), "Edit");
/// assert_eq!(computed.resolve(&row), "Publish");
/// ```
pub enum Dynamic<T> {
    /// The same value for every row.
    Literal(T),
    /// A value derived from the row.
    Computed(RowFn<T>),
}

impl<T: Clone> Dynamic<T> {
    /// Creates a fixed value.
    pub fn literal(value: impl Into<T>) -> Self {
        Dynamic::Literal(value.into())
    }

    /// Creates a row-dependent value.
    pub fn computed(f: impl Fn(&Row) -> T + Send + Sync + 'static) -> Self {
        Dynamic::Computed(Arc::new(f))
    }

    /// Resolves the value for a row.
    pub fn resolve(&self, row: &Row) -> T {
        match self {
            Dynamic::Literal(value) => value.clone(),
            Dynamic::Computed(f) => f(row),
        }
    }
}

impl<T: Clone> Clone for Dynamic<T> {
    fn clone(&self) -> Self {
        match self {
            Dynamic::Literal(value) => Dynamic::Literal(value.clone()),
            Dynamic::Computed(f) => Dynamic::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Dynamic::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Dynamic<String> {
    fn from(value: &str) -> Self {
        Dynamic::Literal(value.to_string())
    }
}

impl From<String> for Dynamic<String> {
    fn from(value: String) -> Self {
        Dynamic::Literal(value)
    }
}

// =============================================================================
// Columns
// =============================================================================

/// How a column renders its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Plain text.
    #[default]
    Text,
    /// A date formatted as `Mon d, yyyy`; sorts by timestamp.
    Date,
    /// A colored badge; the variant comes from the column's badge function.
    Badge,
    /// Rendered by the column's custom renderer.
    Custom,
}

/// Color variant of a badge cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    #[default]
    Default,
    Primary,
    Secondary,
    Success,
    Warning,
    Error,
}

/// Describes how one field of a row is displayed, sorted and filtered.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{Row, Value};
/// use tabula_lib::table::{BadgeVariant, Column};
///
/// let status = Column::badge("status", "Status", |row: &Row| {
///     match row.resolve_or_null("status").as_str() {
///         Some("published") => BadgeVariant::Success,
///         _ => BadgeVariant::Warning,
///     }
/// });
///
/// let author = Column::text("author.name", "Author")
///     .formatter(|row: &Row| Value::from(row.resolve_or_null("author.name").to_display_string().to_uppercase()));
///
/// let row: Row = serde_json::from_str(r#"{"author":{"name":"Amina"}}"#).unwrap();
/// assert_eq!(author.cell_value(&row), Value::from("AMINA"));
/// assert!(status.sortable);
/// ```
#[derive(Clone)]
pub struct Column {
    /// Dot-separated path into the row.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Render kind.
    pub kind: ColumnKind,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the column offers a filter.
    pub filterable: bool,
    /// CSS width, e.g. `200px`.
    pub width: Option<String>,
    /// Derives the cell value from the row instead of reading `key`.
    pub value_formatter: Option<RowFn<Value>>,
    /// Picks the badge variant for [`ColumnKind::Badge`] cells.
    pub badge_variant: Option<RowFn<BadgeVariant>>,
    /// Renders [`ColumnKind::Custom`] cells.
    pub renderer: Option<RowFn<String>>,
}

impl Column {
    /// Creates a column of the given kind. Sortable by default.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            sortable: true,
            filterable: false,
            width: None,
            value_formatter: None,
            badge_variant: None,
            renderer: None,
        }
    }

    /// Creates a text column.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::Text)
    }

    /// Creates a date column.
    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnKind::Date)
    }

    /// Creates a badge column with its variant function.
    pub fn badge(
        key: impl Into<String>,
        label: impl Into<String>,
        variant: impl Fn(&Row) -> BadgeVariant + Send + Sync + 'static,
    ) -> Self {
        let mut column = Self::new(key, label, ColumnKind::Badge);
        column.badge_variant = Some(Arc::new(variant));
        column
    }

    /// Creates a custom column with its renderer. Not sortable by default.
    pub fn custom(
        key: impl Into<String>,
        label: impl Into<String>,
        renderer: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        let mut column = Self::new(key, label, ColumnKind::Custom);
        column.sortable = false;
        column.renderer = Some(Arc::new(renderer));
        column
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column is filterable.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Sets the CSS width.
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Sets the value formatter.
    pub fn formatter(mut self, f: impl Fn(&Row) -> Value + Send + Sync + 'static) -> Self {
        self.value_formatter = Some(Arc::new(f));
        self
    }

    /// Returns the value this column shows (and sorts by) for a row.
    ///
    /// Uses the formatter when set, otherwise the field at `key`; a missing
    /// field yields [`Value::Null`].
    pub fn cell_value(&self, row: &Row) -> Value {
        match &self.value_formatter {
            Some(format) => format(row),
            None => row.resolve_or_null(&self.key).clone(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("width", &self.width)
            .field("value_formatter", &self.value_formatter.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Actions
// =============================================================================

/// A per-row action button.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use tabula_lib::model::Row;
/// use tabula_lib::table::Action;
///
/// let deleted = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&deleted);
/// let delete = Action::new("Delete", move |_row: &Row| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// })
/// .icon_only(true)
/// .visible_when(|row: &Row| row.resolve_or_null("status").as_str() == Some("draft"));
///
/// let draft = Row::new().set("status", "draft");
/// assert!(delete.is_visible(&draft));
/// assert!(delete.invoke(&draft));
/// assert_eq!(deleted.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Action {
    /// Button label; also the accessible name.
    pub label: String,
    /// Icon markup.
    pub icon: Option<Dynamic<String>>,
    /// Tooltip; defaults to the label.
    pub tooltip: Option<Dynamic<String>>,
    /// CSS color class.
    pub color: Option<String>,
    /// Hide the text label and show the icon only.
    pub icon_only: bool,
    /// Visibility predicate; visible when unset.
    pub visible: Option<RowFn<bool>>,
    /// Invoked with the full row.
    pub handler: RowFn<()>,
}

impl Action {
    /// Creates an action with a handler.
    pub fn new(label: impl Into<String>, handler: impl Fn(&Row) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            icon: None,
            tooltip: None,
            color: None,
            icon_only: false,
            visible: None,
            handler: Arc::new(handler),
        }
    }

    /// Sets the icon.
    pub fn icon(mut self, icon: impl Into<Dynamic<String>>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the tooltip.
    pub fn tooltip(mut self, tooltip: impl Into<Dynamic<String>>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets the color class.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the icon-only flag.
    pub fn icon_only(mut self, icon_only: bool) -> Self {
        self.icon_only = icon_only;
        self
    }

    /// Sets the visibility predicate.
    pub fn visible_when(mut self, predicate: impl Fn(&Row) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Some(Arc::new(predicate));
        self
    }

    /// Returns `true` if the action is shown for the row.
    pub fn is_visible(&self, row: &Row) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(row))
    }

    /// Returns the icon for the row, if any.
    pub fn icon_for(&self, row: &Row) -> Option<String> {
        self.icon
            .as_ref()
            .map(|icon| icon.resolve(row))
            .filter(|icon| !icon.is_empty())
    }

    /// Returns the tooltip for the row, falling back to the label.
    pub fn tooltip_for(&self, row: &Row) -> String {
        match &self.tooltip {
            Some(tooltip) => tooltip.resolve(row),
            None => self.label.clone(),
        }
    }

    /// Invokes the handler if the action is visible for the row.
    ///
    /// Returns `true` if the handler ran.
    pub fn invoke(&self, row: &Row) -> bool {
        if !self.is_visible(row) {
            return false;
        }
        (self.handler)(row);
        true
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .field("color", &self.color)
            .field("icon_only", &self.icon_only)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Status filters
// =============================================================================

/// A filter button over the row's `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    /// The status value to match, or [`StatusFilter::ALL`].
    pub value: String,
    /// Button label.
    pub label: String,
    /// CSS color class of the active button.
    pub color: Option<String>,
    /// Precomputed count shown next to the label.
    pub count: Option<usize>,
}

impl StatusFilter {
    /// The filter value that matches every row.
    pub const ALL: &'static str = "all";

    /// Creates a status filter.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: None,
            count: None,
        }
    }

    /// Creates the "all" filter.
    pub fn all(label: impl Into<String>) -> Self {
        Self::new(Self::ALL, label)
    }

    /// Sets the color class.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the count.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

// =============================================================================
// Table configuration
// =============================================================================

/// Everything an embedding page supplies to configure one table.
///
/// Shared as `Arc<TableConfig>` and never mutated by the view.
///
/// # Example
///
/// ```
/// use tabula_lib::table::{Column, StatusFilter, TableConfig};
///
/// let config = TableConfig::new(vec![
///     Column::text("title", "Title"),
///     Column::date("createdAt", "Created"),
/// ])
/// .with_status_filters(vec![
///     StatusFilter::all("All"),
///     StatusFilter::new("published", "Published"),
/// ])
/// .with_search_keys(["title", "author.name"])
/// .with_pagination(true)
/// .with_page_size(20);
///
/// assert_eq!(config.page_size, 20);
/// assert!(config.column("createdAt").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Columns in display order.
    pub columns: Vec<Column>,
    /// Per-row actions in display order.
    pub actions: Vec<Action>,
    /// Status filter buttons.
    pub status_filters: Vec<StatusFilter>,
    /// Row paths searched by the free-text search.
    pub search_keys: Vec<String>,
    /// Initial rows per page.
    ///
    /// Default: 10
    pub page_size: usize,
    /// Message shown when no rows match.
    pub empty_message: String,
    /// Placeholder of the search input.
    pub search_placeholder: String,
    /// Show the stats cards (when stats are supplied).
    pub show_stats: bool,
    /// Paginate the rows.
    pub show_pagination: bool,
    /// Show the search and filter bar.
    pub show_filters: bool,
    /// Hide the search and filter bar even when filters are shown.
    pub hide_search_bar: bool,
}

impl TableConfig {
    /// Creates a configuration with the given columns and default settings.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            actions: Vec::new(),
            status_filters: Vec::new(),
            search_keys: Vec::new(),
            page_size: 10,
            empty_message: "No data available".to_string(),
            search_placeholder: "Search...".to_string(),
            show_stats: false,
            show_pagination: false,
            show_filters: true,
            hide_search_bar: false,
        }
    }

    /// Sets the actions.
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    /// Sets the status filters.
    pub fn with_status_filters(mut self, filters: Vec<StatusFilter>) -> Self {
        self.status_filters = filters;
        self
    }

    /// Sets the search keys.
    pub fn with_search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the empty-state message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Sets the search placeholder.
    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    /// Enables or disables the stats cards.
    pub fn with_stats(mut self, show: bool) -> Self {
        self.show_stats = show;
        self
    }

    /// Enables or disables pagination.
    pub fn with_pagination(mut self, show: bool) -> Self {
        self.show_pagination = show;
        self
    }

    /// Shows or hides the filter bar.
    pub fn with_filters(mut self, show: bool) -> Self {
        self.show_filters = show;
        self
    }

    /// Hides the search bar.
    pub fn with_hidden_search_bar(mut self, hide: bool) -> Self {
        self.hide_search_bar = hide;
        self
    }

    /// Finds a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }
}

/// Summary counts shown above the table, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    entries: Vec<(String, u64)>,
}

impl TableStats {
    /// Creates empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stat (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: u64) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    /// Returns the entries in display order.
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    /// Returns `true` if there are no stats.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display label of a stat key.
pub fn stat_label(key: &str) -> String {
    match key {
        "published" => "Active".to_string(),
        "drafts" => "Archived".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// CSS color class of a stat key.
pub fn stat_color_class(key: &str) -> &'static str {
    match key {
        "published" => "text-primary-600",
        "drafts" => "text-yellow-600",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_falls_back_to_null() {
        let column = Column::text("author.name", "Author");
        let row = Row::new().set("title", "Alpha");

        assert_eq!(column.cell_value(&row), Value::Null);
    }

    #[test]
    fn test_action_defaults() {
        let action = Action::new("Edit", |_row: &Row| {});
        let row = Row::new();

        assert!(action.is_visible(&row));
        assert_eq!(action.tooltip_for(&row), "Edit");
        assert_eq!(action.icon_for(&row), None);
    }

    #[test]
    fn test_hidden_action_does_not_run() {
        use std::sync::atomic::AtomicBool;
        use std::sync::atomic::Ordering;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let action = Action::new("Delete", move |_row: &Row| flag.store(true, Ordering::SeqCst))
            .visible_when(|_row: &Row| false);

        assert!(!action.invoke(&Row::new()));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_computed_icon_and_tooltip() {
        let action = Action::new("Toggle", |_row: &Row| {})
            .icon(Dynamic::computed(|row: &Row| {
                row.resolve_or_null("status").to_display_string()
            }))
            .tooltip(Dynamic::computed(|row: &Row| {
                format!("Toggle {}", row.resolve_or_null("title"))
            }));
        let row = Row::new().set("status", "draft").set("title", "Alpha");

        assert_eq!(action.icon_for(&row), Some("draft".to_string()));
        assert_eq!(action.tooltip_for(&row), "Toggle Alpha");
    }

    #[test]
    fn test_stat_labels() {
        assert_eq!(stat_label("published"), "Active");
        assert_eq!(stat_label("drafts"), "Archived");
        assert_eq!(stat_label("total"), "Total");
        assert_eq!(stat_label(""), "");
        assert_eq!(stat_color_class("drafts"), "text-yellow-600");
    }
}
