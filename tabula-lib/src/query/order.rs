//! Sort model for data source requests.

use serde::Deserialize;
use serde::Serialize;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Returns the wire name (`asc` / `desc`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One entry of a grid sort model: `{ "colId": "...", "sort": "asc" }`.
///
/// # Example
///
/// ```
/// use tabula_lib::query::{Direction, SortModelItem};
///
/// let item = SortModelItem::desc("createdAt");
/// assert_eq!(item.sort, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModelItem {
    /// The column being sorted.
    pub col_id: String,
    /// The sort direction.
    pub sort: Direction,
}

impl SortModelItem {
    /// Creates an ascending sort on a column.
    pub fn asc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: Direction::Desc,
        }
    }
}

/// Converts a sort model to the `sortBy` / `sortOrder` pair of a REST call.
///
/// Only the first criterion is honored; multi-column sort is accepted in the
/// request shape but not applied.
pub fn convert_sort_model(sort_model: Option<&[SortModelItem]>) -> Option<(&str, Direction)> {
    sort_model
        .and_then(|items| items.first())
        .map(|item| (item.col_id.as_str(), item.sort))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_uses_first_item_only() {
        let model = vec![SortModelItem::asc("title"), SortModelItem::desc("id")];

        assert_eq!(
            convert_sort_model(Some(model.as_slice())),
            Some(("title", Direction::Asc))
        );
        assert_eq!(convert_sort_model(Some(&[][..])), None);
        assert_eq!(convert_sort_model(None), None);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&SortModelItem::desc("createdAt")).unwrap();
        assert_eq!(json, r#"{"colId":"createdAt","sort":"desc"}"#);
    }

    #[test]
    fn test_flipped() {
        assert_eq!(Direction::Asc.flipped(), Direction::Desc);
        assert_eq!(Direction::Desc.flipped().flipped(), Direction::Desc);
    }
}
