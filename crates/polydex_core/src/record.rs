//! Records and field paths.
//!
//! The engine treats records as opaque. All it needs is a way to resolve a
//! dot-separated [`FieldPath`] to a scalar, which the [`Record`] trait
//! provides. Paths that do not resolve are not errors: the field is simply
//! skipped for that record.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A dot-separated path locating a scalar inside a record (`address.city`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dot-separated path.
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the individual path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

/// An item that can be indexed.
pub trait Record {
    /// Resolves `path` to the stringified scalar it points at.
    ///
    /// Returns `None` when a segment is missing, traverses a non-container,
    /// or the leaf is null or not a scalar.
    fn field_value(&self, path: &FieldPath) -> Option<Cow<'_, str>>;
}

impl Record for serde_json::Value {
    fn field_value(&self, path: &FieldPath) -> Option<Cow<'_, str>> {
        use serde_json::Value;

        let mut current = self;
        for segment in path.segments() {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        match current {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Flat string maps only resolve single-segment paths.
impl Record for HashMap<String, String> {
    fn field_value(&self, path: &FieldPath) -> Option<Cow<'_, str>> {
        match path.segments() {
            [key] => self.get(key).map(|v| Cow::Borrowed(v.as_str())),
            _ => None,
        }
    }
}

impl Record for BTreeMap<String, String> {
    fn field_value(&self, path: &FieldPath) -> Option<Cow<'_, str>> {
        match path.segments() {
            [key] => self.get(key).map(|v| Cow::Borrowed(v.as_str())),
            _ => None,
        }
    }
}

/// Normalizes a raw field value for indexing.
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_segments() {
        let path = FieldPath::parse("address.city");
        assert_eq!(path.as_str(), "address.city");
        assert_eq!(path.segments(), &["address", "city"]);
        assert_eq!(path.to_string(), "address.city");
    }

    #[test]
    fn json_nested_lookup() {
        let record = json!({"name": "Alice", "address": {"city": "Paris"}});
        assert_eq!(
            record.field_value(&"address.city".into()).as_deref(),
            Some("Paris")
        );
        assert_eq!(record.field_value(&"name".into()).as_deref(), Some("Alice"));
    }

    #[test]
    fn json_scalars_are_stringified() {
        let record = json!({"age": 42, "ratio": 0.5, "active": true});
        assert_eq!(record.field_value(&"age".into()).as_deref(), Some("42"));
        assert_eq!(record.field_value(&"ratio".into()).as_deref(), Some("0.5"));
        assert_eq!(record.field_value(&"active".into()).as_deref(), Some("true"));
    }

    #[test]
    fn json_missing_paths_yield_nothing() {
        let record = json!({"name": "Alice", "tags": ["a", "b"], "nothing": null});
        assert!(record.field_value(&"missing".into()).is_none());
        assert!(record.field_value(&"name.first".into()).is_none());
        assert!(record.field_value(&"nothing".into()).is_none());
        assert!(record.field_value(&"tags".into()).is_none());
        assert!(record.field_value(&"".into()).is_none());
    }

    #[test]
    fn json_array_segments() {
        let record = json!({"tags": ["red", "blue"]});
        assert_eq!(record.field_value(&"tags.1".into()).as_deref(), Some("blue"));
        assert!(record.field_value(&"tags.7".into()).is_none());
        assert!(record.field_value(&"tags.x".into()).is_none());
    }

    #[test]
    fn flat_maps() {
        let mut record = HashMap::new();
        record.insert("name".to_string(), "Bob".to_string());
        assert_eq!(record.field_value(&"name".into()).as_deref(), Some("Bob"));
        assert!(record.field_value(&"name.first".into()).is_none());

        let record: BTreeMap<String, String> =
            [("city".to_string(), "Oslo".to_string())].into_iter().collect();
        assert_eq!(record.field_value(&"city".into()).as_deref(), Some("Oslo"));
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize("ALiCe"), "alice");
    }
}
