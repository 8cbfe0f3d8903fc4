//! Value enum for dynamic field values

use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::Row;

/// A dynamic value that can hold any field of an application record.
///
/// Rows arrive as loosely typed JSON, so every field is stored as a `Value`.
/// Strings are never re-typed on deserialization: a date that arrives as
/// text stays a [`Value::String`] and is parsed lazily by
/// [`Value::to_timestamp`] when a date column needs it.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | integer | `Int` |
/// | other number | `Float` |
/// | string | `String` |
/// | object | `Row` |
/// | array | `List` |
///
/// # Example
///
/// ```
/// use tabula_lib::model::Value;
///
/// let title = Value::from("Annual report");
/// let views = Value::from(42i64);
/// let empty = Value::Null;
///
/// assert_eq!(views.to_display_string(), "42");
/// assert_eq!(empty.to_display_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// Nested record (JSON object).
    Row(Box<Row>),
    /// Array of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value is an integer or a float.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Row(_) => "row",
            Value::List(_) => "list",
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the numeric value of an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the nested row if this is an object value.
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Value::Row(row) => Some(row.as_ref()),
            _ => None,
        }
    }

    /// Coerces the value to the text shown in a plain table cell.
    ///
    /// Null renders as the empty string, lists are comma-joined and nested
    /// rows render as their JSON form.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339(),
            Value::Row(row) => serde_json::to_string(row).unwrap_or_default(),
            Value::List(items) => items
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Interprets the value as a point in time.
    ///
    /// Dates are taken as-is, strings are parsed with [`parse_timestamp`] and
    /// integers are read as milliseconds since the Unix epoch.
    pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => parse_timestamp(s),
            Value::Int(ms) => DateTime::from_timestamp_millis(*ms),
            _ => None,
        }
    }
}

/// Parses the date formats that backends commonly emit.
///
/// Accepts RFC 3339, ISO 8601 without offset (read as UTC), the
/// `YYYY-MM-DD HH:MM:SS` form used by grid date filters, and bare dates.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp the way date cells display it, e.g. `Jan 5, 2024`.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

// =============================================================================
// Deserialization
// =============================================================================

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Row(Box::new(Row::from(map))),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Row> for Value {
    fn from(v: Row) -> Self {
        Value::Row(Box::new(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_coercion() {
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::from(true).to_display_string(), "true");
        assert_eq!(Value::from(3.0).to_display_string(), "3");
        assert_eq!(Value::from(2.5).to_display_string(), "2.5");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::from(1i64)]).to_display_string(),
            "a,1"
        );
    }

    #[test]
    fn test_deserialize_keeps_date_strings_as_text() {
        let value: Value = serde_json::from_str(r#""2024-01-05T10:00:00Z""#).unwrap();
        assert_eq!(value, Value::String("2024-01-05T10:00:00Z".to_string()));
        assert!(value.to_timestamp().is_some());
    }

    #[test]
    fn test_deserialize_numbers() {
        let value: Value = serde_json::from_str("12").unwrap();
        assert_eq!(value, Value::Int(12));

        let value: Value = serde_json::from_str("12.5").unwrap();
        assert_eq!(value, Value::Float(12.5));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        assert_eq!(parse_timestamp("2024-01-05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T00:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("Beta"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_format_date() {
        let dt = parse_timestamp("2024-01-05T13:45:00Z").unwrap();
        assert_eq!(format_date(&dt), "Jan 5, 2024");
    }
}
