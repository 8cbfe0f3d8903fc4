//! Filter, search, sort and paginate an in-memory collection.
//!
//! The engine is a pure projection: it never touches the rows, it only
//! computes which row indices are visible and in what order. Steps run in a
//! fixed order: status filter, search, sort, page slice.

use std::cmp::Ordering;
use std::ops::Range;

use super::Column;
use super::ColumnKind;
use super::TableConfig;
use super::ViewState;
use crate::model::Row;
use crate::model::Value;
use crate::query::Direction;

/// The outcome of running the engine over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Indices of the rows that survived filtering, in sorted order.
    pub filtered: Vec<usize>,
    /// Range of `filtered` shown on the current page.
    pub page: Range<usize>,
    /// Number of pages; 1 when pagination is disabled.
    pub total_pages: usize,
}

impl Projection {
    /// Returns the row indices of the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.filtered[self.page.clone()]
    }

    /// Returns the rows of the current page.
    pub fn page_rows<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        self.page_indices().iter().map(|&i| &rows[i]).collect()
    }

    /// Number of rows after filtering, before pagination.
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }
}

/// Runs every step and returns the projection.
pub fn project(rows: &[Row], config: &TableConfig, state: &ViewState) -> Projection {
    let filtered = filter_and_sort(rows, config, state);
    let (page, total_pages) = paginate(filtered.len(), config, state);
    Projection {
        filtered,
        page,
        total_pages,
    }
}

/// Re-slices an existing projection after a page or page size change.
pub fn repaginate(projection: &mut Projection, config: &TableConfig, state: &ViewState) {
    let (page, total_pages) = paginate(projection.filtered.len(), config, state);
    projection.page = page;
    projection.total_pages = total_pages;
}

/// Applies status filter, search and sort, returning row indices.
///
/// The status filter applies only when `config.status_filters` is non-empty
/// and a value other than `"all"` is selected; an empty filter list keeps
/// every row regardless of the selected status.
pub fn filter_and_sort(rows: &[Row], config: &TableConfig, state: &ViewState) -> Vec<usize> {
    let status_active = state.has_status_filter() && !config.status_filters.is_empty();
    let needle = state.search.to_lowercase();

    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !status_active || matches_status(row, &state.status_filter))
        .filter(|(_, row)| needle.is_empty() || matches_search(row, &config.search_keys, &needle))
        .map(|(i, _)| i)
        .collect();

    if let Some((key, direction)) = state.sort()
        && let Some(column) = config.column(key)
    {
        sort_indices(&mut indices, rows, column, direction);
    }

    indices
}

/// Returns `true` if the row's `status` equals the filter value.
pub fn matches_status(row: &Row, status: &str) -> bool {
    match row.resolve("status") {
        Some(Value::Null) | None => false,
        Some(value) => value.to_display_string() == status,
    }
}

/// Returns `true` if any search key's value contains `needle`.
///
/// `needle` must already be lower-cased. Missing and null values never match.
pub fn matches_search(row: &Row, keys: &[String], needle: &str) -> bool {
    keys.iter().any(|key| match row.resolve(key) {
        Some(Value::Null) | None => false,
        Some(value) => value.to_display_string().to_lowercase().contains(needle),
    })
}

/// Sort key derived once per row.
///
/// Keys are totally ordered: missing values first, then numbers (and
/// timestamps), then text.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(column: &Column, row: &Row) -> Self {
        let value = column.cell_value(row);
        if value.is_null() {
            return SortKey::Missing;
        }
        if column.kind == ColumnKind::Date {
            return match value.to_timestamp() {
                Some(ts) => SortKey::Number(ts.timestamp_millis() as f64),
                None => SortKey::Missing,
            };
        }
        match value.as_f64() {
            Some(n) => SortKey::Number(n),
            None => SortKey::Text(value.to_display_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => locale_compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Compares two strings the way a UI collation does.
///
/// Case-insensitive first; on a tie lower-case sorts before upper-case.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Compares the cell values of two rows for one column, ascending.
pub fn compare_rows(column: &Column, a: &Row, b: &Row) -> Ordering {
    SortKey::of(column, a).compare(&SortKey::of(column, b))
}

fn sort_indices(indices: &mut [usize], rows: &[Row], column: &Column, direction: Direction) {
    let keys: Vec<SortKey> = rows.iter().map(|row| SortKey::of(column, row)).collect();
    indices.sort_by(|&a, &b| {
        let ordering = keys[a].compare(&keys[b]);
        match direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });
}

/// Number of pages for `count` rows of `page_size`.
pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

fn paginate(count: usize, config: &TableConfig, state: &ViewState) -> (Range<usize>, usize) {
    if !config.show_pagination {
        return (0..count, 1);
    }
    let size = state.page_size;
    let start = state
        .current_page
        .saturating_sub(1)
        .saturating_mul(size)
        .min(count);
    let end = start.saturating_add(size).min(count);
    (start..end, page_count(count, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::StatusFilter;

    fn rows() -> Vec<Row> {
        serde_json::from_str(
            r#"[
                {"id": 1, "status": "published", "title": "Alpha", "views": 10, "createdAt": "2024-03-01"},
                {"id": 2, "status": "draft", "title": "Beta", "views": 2, "createdAt": "2024-01-15"},
                {"id": 3, "status": "published", "title": "gamma", "views": 33, "createdAt": "2024-02-10"}
            ]"#,
        )
        .unwrap()
    }

    fn config() -> TableConfig {
        TableConfig::new(vec![
            Column::text("title", "Title"),
            Column::text("views", "Views"),
            Column::date("createdAt", "Created"),
        ])
        .with_status_filters(vec![
            StatusFilter::all("All"),
            StatusFilter::new("published", "Published"),
            StatusFilter::new("draft", "Draft"),
        ])
        .with_search_keys(["title"])
    }

    fn ids(rows: &[Row], indices: &[usize]) -> Vec<i64> {
        indices
            .iter()
            .map(|&i| match rows[i].id() {
                Some(Value::Int(id)) => *id,
                other => panic!("unexpected id {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.search = "a".to_string();

        let result = filter_and_sort(&rows, &config(), &state);

        // "Beta" lower-cased contains "a" as well.
        assert_eq!(ids(&rows, &result), vec![1, 2, 3]);

        state.search = "ALP".to_string();
        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1]);
    }

    #[test]
    fn test_status_filter() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.status_filter = "published".to_string();

        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1, 3]);

        state.status_filter = StatusFilter::ALL.to_string();
        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1, 2, 3]);
    }

    #[test]
    fn test_status_filter_ignored_without_configured_filters() {
        let rows = rows();
        let config = TableConfig::new(vec![Column::text("title", "Title")]);
        let mut state = ViewState::new(10);
        state.status_filter = "draft".to_string();

        assert_eq!(filter_and_sort(&rows, &config, &state).len(), 3);
    }

    #[test]
    fn test_missing_search_values_never_match() {
        let rows = vec![
            Row::new().set("id", 1i64),
            Row::new().set("id", 2i64).set("title", Value::Null),
        ];
        let mut state = ViewState::new(10);
        state.search = "null".to_string();

        assert!(filter_and_sort(&rows, &config(), &state).is_empty());
    }

    #[test]
    fn test_sort_text_locale_style() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.sort_column = Some("title".to_string());
        state.sort_direction = Direction::Asc;

        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1, 2, 3]);

        state.sort_direction = Direction::Desc;
        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_numbers_numerically() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.sort_column = Some("views".to_string());
        state.sort_direction = Direction::Asc;

        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_dates_by_timestamp() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.sort_column = Some("createdAt".to_string());
        state.sort_direction = Direction::Desc;

        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1, 3, 2]);
    }

    #[test]
    fn test_unknown_sort_column_keeps_input_order() {
        let rows = rows();
        let mut state = ViewState::new(10);
        state.sort_column = Some("nope".to_string());

        let result = filter_and_sort(&rows, &config(), &state);
        assert_eq!(ids(&rows, &result), vec![1, 2, 3]);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("alpha", "Beta"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("A", "a"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let column = Column::text("title", "Title");
        let present = Row::new().set("title", "x");
        let missing = Row::new();

        assert_eq!(compare_rows(&column, &missing, &present), Ordering::Less);
        assert_eq!(compare_rows(&column, &missing, &Row::new()), Ordering::Equal);
    }

    #[test]
    fn test_pagination_bounds() {
        let rows: Vec<Row> = (1..=5).map(|i| Row::new().set("id", i as i64)).collect();
        let config = config().with_pagination(true);
        let mut state = ViewState::new(2);

        let projection = project(&rows, &config, &state);
        assert_eq!(projection.total_pages, 3);
        assert_eq!(projection.page_indices(), &[0, 1]);

        state.current_page = 3;
        let projection = project(&rows, &config, &state);
        assert_eq!(projection.page_indices(), &[4]);

        state.current_page = 9;
        let projection = project(&rows, &config, &state);
        assert!(projection.page_indices().is_empty());
    }

    #[test]
    fn test_no_pagination_returns_everything() {
        let rows = rows();
        let mut state = ViewState::new(1);
        state.current_page = 2;

        let projection = project(&rows, &config(), &state);
        assert_eq!(projection.page_indices().len(), 3);
        assert_eq!(projection.total_pages, 1);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let rows = rows();
        let before = rows.clone();
        let mut state = ViewState::new(2);
        state.search = "a".to_string();
        state.sort_column = Some("title".to_string());

        let config = config().with_pagination(true);
        let first = project(&rows, &config, &state);
        let second = project(&rows, &config, &state);

        assert_eq!(first, second);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(4, 2), 2);
        assert_eq!(page_count(0, 2), 0);
        assert_eq!(page_count(5, 0), 0);
    }
}
