//! Dynamic table row

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use super::Value;

static NULL: Value = Value::Null;

/// One application record (report, testimonial, hero slide, user, ...).
///
/// Rows hold field values as an ordered map, allowing dynamic access to any
/// field. Nested objects are stored as [`Value::Row`] and can be reached with
/// dot-separated paths.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
///
/// let author = Row::new().set("name", "Amina");
/// let row = Row::new()
///     .set("id", 1i64)
///     .set("title", "Alpha")
///     .set("author", author);
///
/// assert_eq!(row.resolve("author.name").map(|v| v.to_display_string()), Some("Amina".into()));
/// assert!(row.resolve("author.email").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the application identity of the row (its `id` field).
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id").filter(|v| !v.is_null())
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to a top-level field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given top-level field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Returns the number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Path lookup
    // =========================================================================

    /// Resolves a dot-separated path through nested rows and lists.
    ///
    /// Never fails: any segment that does not exist, or that walks into a
    /// scalar, yields `None`. List elements are addressed by index
    /// (`tags.0`).
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;

        for segment in segments {
            current = match current {
                Value::Row(row) => row.fields.get(segment)?,
                Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Resolves a path, substituting [`Value::Null`] for a missing value.
    pub fn resolve_or_null(&self, path: &str) -> &Value {
        self.resolve(path).unwrap_or(&NULL)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Row::from(map))
    }
}
