//! Client-side paging, sorting and filtering over a bulk source.

use std::cmp::Ordering;
use std::cmp::Reverse;

use async_trait::async_trait;

use super::BulkSource;
use super::DataSource;
use crate::error::SourceError;
use crate::model::Row;
use crate::model::Value;
use crate::model::parse_timestamp;
use crate::query::ColumnFilter;
use crate::query::DatasourceRequest;
use crate::query::DatasourceResult;
use crate::query::Direction;
use crate::query::FilterModel;
use crate::query::convert_sort_model;

/// Serves page requests from a source that only returns everything.
///
/// Every request fetches the full collection again; there is no caching
/// between pages.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::query::{DatasourceRequest, PageSize};
/// use tabula_lib::source::{DataSource, Emulated, StaticSource};
///
/// let source = Emulated::new(StaticSource::new(users));
/// let page = source.get_rows(&DatasourceRequest::new(1, PageSize::Rows(10))).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Emulated<B> {
    bulk: B,
}

impl<B: BulkSource> Emulated<B> {
    /// Wraps a bulk source.
    pub fn new(bulk: B) -> Self {
        Self { bulk }
    }

    /// Returns the wrapped source.
    pub fn inner(&self) -> &B {
        &self.bulk
    }
}

#[async_trait]
impl<B: BulkSource> DataSource for Emulated<B> {
    async fn get_rows(&self, request: &DatasourceRequest) -> Result<DatasourceResult, SourceError> {
        let rows = self.bulk.fetch_all().await?;
        Ok(emulate(rows, request))
    }
}

/// Applies a request's filter, sort and page to a full collection.
pub fn emulate(rows: Vec<Row>, request: &DatasourceRequest) -> DatasourceResult {
    let mut filtered = match &request.filter_model {
        Some(model) => apply_filters(rows, model),
        None => rows,
    };

    if let Some((col_id, direction)) = convert_sort_model(request.sort_model.as_deref()) {
        sort_rows(&mut filtered, col_id, direction);
    }

    let total = filtered.len();
    let data = request.page_size.slice(&filtered, request.page).to_vec();
    DatasourceResult::new(data, total)
}

fn apply_filters(rows: Vec<Row>, model: &FilterModel) -> Vec<Row> {
    rows.into_iter()
        .filter(|row| {
            model
                .iter()
                .all(|(col_id, filter)| matches_filter(row, col_id, filter))
        })
        .collect()
}

/// Returns `true` if the row passes one column filter.
///
/// Filters without a criterion pass everything. Missing and null fields fail
/// any filter that has a criterion.
pub fn matches_filter(row: &Row, col_id: &str, filter: &ColumnFilter) -> bool {
    let Some(criterion) = filter.criterion() else {
        return true;
    };
    let value = match row.resolve(col_id) {
        Some(Value::Null) | None => return false,
        Some(value) => value,
    };

    match filter {
        ColumnFilter::Text { .. } => contains_ignore_case(value, &criterion),
        ColumnFilter::Number { .. } => match (numeric(value), criterion.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => contains_ignore_case(value, &criterion),
        },
        ColumnFilter::Date { .. } => match (value.to_timestamp(), criterion.to_timestamp()) {
            (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
            _ => contains_ignore_case(value, &criterion),
        },
    }
}

fn contains_ignore_case(value: &Value, criterion: &Value) -> bool {
    value
        .to_display_string()
        .to_lowercase()
        .contains(&criterion.to_display_string().to_lowercase())
}

fn numeric(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Sort key of a field in emulation mode.
///
/// Nulls are the smallest values, so they come first ascending and last
/// descending.
#[derive(Debug, Clone, PartialEq)]
enum FieldKey {
    Null,
    Number(f64),
    Date(i64),
    Text(String),
}

impl FieldKey {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldKey::Null,
            Some(value) => {
                if let Some(n) = value.as_f64() {
                    return FieldKey::Number(n);
                }
                if let Value::DateTime(dt) = value {
                    return FieldKey::Date(dt.timestamp_millis());
                }
                if let Some(dt) = value.as_str().and_then(parse_timestamp) {
                    return FieldKey::Date(dt.timestamp_millis());
                }
                FieldKey::Text(value.to_display_string().to_lowercase())
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldKey::Null => 0,
            FieldKey::Number(_) => 1,
            FieldKey::Date(_) => 2,
            FieldKey::Text(_) => 3,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldKey::Number(a), FieldKey::Number(b)) => a.total_cmp(b),
            (FieldKey::Date(a), FieldKey::Date(b)) => a.cmp(b),
            (FieldKey::Text(a), FieldKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort_rows(rows: &mut [Row], col_id: &str, direction: Direction) {
    match direction {
        Direction::Asc => {
            rows.sort_by_cached_key(|row| SortedKey(FieldKey::of(row.resolve(col_id))))
        }
        Direction::Desc => {
            rows.sort_by_cached_key(|row| Reverse(SortedKey(FieldKey::of(row.resolve(col_id)))))
        }
    }
}

/// Adapter giving `FieldKey` a total `Ord` for `sort_by_cached_key`.
#[derive(Debug, Clone, PartialEq)]
struct SortedKey(FieldKey);

impl Eq for SortedKey {}

impl PartialOrd for SortedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.compare(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageSize;
    use crate::query::SortModelItem;

    fn numbered(n: i64) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new().set("id", i).set("name", format!("user{i:02}")))
            .collect()
    }

    fn users() -> Vec<Row> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "amina", "role": "Admin", "age": 30, "joined": "2024-01-05T10:00:00Z"},
                {"id": 2, "name": "Bilal", "role": "editor", "age": 9, "joined": "2023-06-01T08:00:00Z"},
                {"id": 3, "name": "chidi", "role": null, "age": 100, "joined": null},
                {"id": 4, "name": "Dayo", "role": "ADMIN", "age": 30, "joined": "2024-01-05T23:00:00Z"}
            ]"#,
        )
        .unwrap()
    }

    fn ids(result: &DatasourceResult) -> Vec<i64> {
        result
            .rows()
            .iter()
            .filter_map(|row| match row.id() {
                Some(Value::Int(id)) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let request = DatasourceRequest::new(1, PageSize::Rows(10));

        let result = emulate(numbered(25), &request);

        assert_eq!(result.total, 25);
        assert_eq!(ids(&result), (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_all_sentinel_returns_everything() {
        let request = DatasourceRequest::new(3, PageSize::All);

        let result = emulate(numbered(25), &request);

        assert_eq!(result.len(), 25);
        assert_eq!(result.total, 25);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let mut model = FilterModel::new();
        model.insert("role".into(), ColumnFilter::text("admin"));
        let request = DatasourceRequest::new(0, PageSize::Rows(10)).with_filter(model);

        let result = emulate(users(), &request);

        assert_eq!(ids(&result), vec![1, 4]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_number_filter_matches_equal_values() {
        let mut model = FilterModel::new();
        model.insert("age".into(), ColumnFilter::number(30.0));
        let request = DatasourceRequest::new(0, PageSize::Rows(10)).with_filter(model);

        assert_eq!(ids(&emulate(users(), &request)), vec![1, 4]);
    }

    #[test]
    fn test_date_filter_matches_calendar_day() {
        let mut model = FilterModel::new();
        model.insert("joined".into(), ColumnFilter::date("2024-01-05 00:00:00"));
        let request = DatasourceRequest::new(0, PageSize::Rows(10)).with_filter(model);

        assert_eq!(ids(&emulate(users(), &request)), vec![1, 4]);
    }

    #[test]
    fn test_empty_criterion_is_ignored() {
        let mut model = FilterModel::new();
        model.insert("role".into(), ColumnFilter::text(""));
        let request = DatasourceRequest::new(0, PageSize::Rows(10)).with_filter(model);

        assert_eq!(emulate(users(), &request).total, 4);
    }

    #[test]
    fn test_sort_strings_case_insensitive() {
        let request = DatasourceRequest::new(0, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::asc("name")]);

        assert_eq!(ids(&emulate(users(), &request)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_nulls_first_ascending_last_descending() {
        let asc = DatasourceRequest::new(0, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::asc("joined")]);
        let desc = DatasourceRequest::new(0, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::desc("joined")]);

        assert_eq!(ids(&emulate(users(), &asc)), vec![3, 2, 1, 4]);
        assert_eq!(ids(&emulate(users(), &desc)), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_sort_numbers_numerically() {
        let request = DatasourceRequest::new(0, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::asc("age")]);

        let result = emulate(users(), &request);
        assert_eq!(ids(&result)[0], 2);
        assert_eq!(ids(&result)[3], 3);
    }

    #[test]
    fn test_only_first_sort_criterion_applies() {
        let request = DatasourceRequest::new(0, PageSize::Rows(10))
            .with_sort(vec![SortModelItem::desc("name"), SortModelItem::asc("id")]);

        assert_eq!(ids(&emulate(users(), &request)), vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_emulated_source_propagates_fetch_errors() {
        struct Broken;

        #[async_trait]
        impl BulkSource for Broken {
            async fn fetch_all(&self) -> Result<Vec<Row>, SourceError> {
                Err(SourceError::http(503, "down"))
            }
        }

        let source = Emulated::new(Broken);
        let err = source
            .get_rows(&DatasourceRequest::new(0, PageSize::Rows(10)))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(503));
    }
}
