//! Filter model for data source requests.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Per-column filters keyed by column id.
pub type FilterModel = BTreeMap<String, ColumnFilter>;

/// A single column filter, tagged by `filterType` on the wire.
///
/// Only single-condition filters are supported; combined conditions are not
/// part of the request shape.
///
/// # Example
///
/// ```
/// use tabula_lib::query::ColumnFilter;
///
/// let filter: ColumnFilter =
///     serde_json::from_str(r#"{"filterType":"text","type":"contains","filter":"alp"}"#).unwrap();
/// assert_eq!(filter, ColumnFilter::text("alp"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filterType", rename_all = "lowercase")]
pub enum ColumnFilter {
    /// Text filter: `{ "filterType": "text", "filter": "..." }`.
    Text {
        /// The grid's condition name (e.g. `contains`).
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        /// The text to match.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
    },
    /// Number filter: `{ "filterType": "number", "filter": 42 }`.
    Number {
        /// The grid's condition name (e.g. `equals`).
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        /// The number to match.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<f64>,
    },
    /// Date filter: `{ "filterType": "date", "dateFrom": "2024-01-05 00:00:00" }`.
    Date {
        /// The grid's condition name (e.g. `equals`).
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        /// The date to match.
        #[serde(rename = "dateFrom", default, skip_serializing_if = "Option::is_none")]
        date_from: Option<String>,
        /// Upper bound for range conditions; carried but not applied.
        #[serde(rename = "dateTo", default, skip_serializing_if = "Option::is_none")]
        date_to: Option<String>,
    },
}

impl ColumnFilter {
    /// Creates a text `contains` filter.
    pub fn text(filter: impl Into<String>) -> Self {
        ColumnFilter::Text {
            condition: Some("contains".to_string()),
            filter: Some(filter.into()),
        }
    }

    /// Creates a number `equals` filter.
    pub fn number(filter: f64) -> Self {
        ColumnFilter::Number {
            condition: Some("equals".to_string()),
            filter: Some(filter),
        }
    }

    /// Creates a date `equals` filter.
    pub fn date(date_from: impl Into<String>) -> Self {
        ColumnFilter::Date {
            condition: Some("equals".to_string()),
            date_from: Some(date_from.into()),
            date_to: None,
        }
    }

    /// Returns the single criterion this filter carries, if any.
    ///
    /// Text and number filters yield their `filter`, date filters their
    /// `dateFrom`. Empty text counts as no criterion.
    pub fn criterion(&self) -> Option<Value> {
        match self {
            ColumnFilter::Text { filter, .. } => filter
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(Value::from),
            ColumnFilter::Number { filter, .. } => filter.map(number_value),
            ColumnFilter::Date { date_from, .. } => date_from
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(Value::from),
        }
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Int(n as i64)
    } else {
        Value::Float(n)
    }
}

/// Converts a filter model to one criterion per column for a REST call.
///
/// Columns whose filter carries no criterion are left out.
pub fn convert_filter_model(filter_model: Option<&FilterModel>) -> BTreeMap<String, Value> {
    let Some(model) = filter_model else {
        return BTreeMap::new();
    };

    model
        .iter()
        .filter_map(|(col_id, filter)| filter.criterion().map(|c| (col_id.clone(), c)))
        .collect()
}
