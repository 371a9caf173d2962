//! Typed document metadata
//!
//! Documents are edited by hand, so every metadata field is one of a small
//! set of shapes. [`FieldValue`] makes the shape explicit; readers match on
//! it totally instead of guessing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Field missing or null
    #[default]
    Absent,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// Single string
    Text(String),
    /// List of strings
    List(Vec<String>),
}

static ABSENT: FieldValue = FieldValue::Absent;

impl FieldValue {
    /// Convert arbitrary JSON into the closest typed value
    ///
    /// Arrays keep their scalar elements as strings; nested objects are
    /// treated as absent.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null | Value::Object(_) => Self::Absent,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Absent, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
        }
    }

    /// JSON form
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Absent => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }

    /// Field missing, null, empty text or empty list
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// First non-empty string, if the value holds text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()),
            Self::List(items) => items.iter().map(|s| s.trim()).find(|s| !s.is_empty()),
            Self::Absent | Self::Bool(_) | Self::Number(_) => None,
        }
    }

    /// Every non-empty string value (text is a one-element list)
    ///
    /// Numbers are rendered as text so that numeric ids typed without
    /// quotes still count.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Text(s) => Some(s.trim().to_string())
                .filter(|s| !s.is_empty())
                .into_iter()
                .collect(),
            Self::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Number(n) => vec![format_number(*n)],
            Self::Absent | Self::Bool(_) => Vec::new(),
        }
    }

    /// Text or list built from a set of strings
    #[must_use]
    pub fn from_values(values: Vec<String>) -> Self {
        match values.len() {
            0 => Self::Absent,
            1 => values.into_iter().next().map_or(Self::Absent, Self::Text),
            _ => Self::List(values),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Key/value metadata of a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, FieldValue>);

impl Metadata {
    /// Empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object (non-objects give empty metadata)
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut out = Self::new();
        if let serde_json::Value::Object(map) = value {
            for (key, value) in map {
                out.insert(key.clone(), FieldValue::from_json(value));
            }
        }
        out
    }

    /// JSON object form
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Value for key ([`FieldValue::Absent`] when missing)
    #[must_use]
    pub fn get(&self, key: &str) -> &FieldValue {
        self.0.get(key).unwrap_or(&ABSENT)
    }

    /// Shorthand for `get(key).as_text()`
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).as_text()
    }

    /// Whether key holds a non-empty value
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        !self.get(key).is_absent()
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a key
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rename user keys to canonical keys
    ///
    /// A canonical key already present wins over its alias.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &BTreeMap<String, String>) -> Self {
        for (alias, canonical) in aliases {
            if let Some(value) = self.0.remove(alias) {
                self.0.entry(canonical.clone()).or_insert(value);
            }
        }
        self
    }
}

impl FromIterator<(String, FieldValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_is_total() {
        let meta = Metadata::from_json(&json!({
            "name": "John Smith",
            "children": ["[[A]]", "[[B]]"],
            "born": 1850,
            "living": false,
            "nested": {"x": 1},
            "empty": null,
        }));

        assert_eq!(meta.text("name"), Some("John Smith"));
        assert_eq!(meta.get("children").values().len(), 2);
        assert_eq!(meta.get("born").values(), vec!["1850".to_string()]);
        assert_eq!(meta.get("living"), &FieldValue::Bool(false));
        assert!(meta.get("nested").is_absent());
        assert!(meta.get("empty").is_absent());
        assert!(meta.get("missing").is_absent());
    }

    #[test]
    fn values_skip_blank_entries() {
        let v = FieldValue::List(vec![" a ".into(), String::new(), "b".into()]);
        assert_eq!(v.values(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(v.as_text(), Some("a"));
    }

    #[test]
    fn from_values_picks_shape() {
        assert_eq!(FieldValue::from_values(vec![]), FieldValue::Absent);
        assert_eq!(FieldValue::from_values(vec!["a".into()]), FieldValue::Text("a".into()));
        assert!(matches!(
            FieldValue::from_values(vec!["a".into(), "b".into()]),
            FieldValue::List(_)
        ));
    }

    #[test]
    fn aliases_do_not_override_canonical() {
        let mut meta = Metadata::new();
        meta.insert("dad", "[[A]]");
        meta.insert("father", "[[B]]");
        meta.insert("mum", "[[C]]");

        let aliases: BTreeMap<String, String> = [
            ("dad".to_string(), "father".to_string()),
            ("mum".to_string(), "mother".to_string()),
        ]
        .into_iter()
        .collect();

        let meta = meta.with_aliases(&aliases);
        assert_eq!(meta.text("father"), Some("[[B]]"));
        assert_eq!(meta.text("mother"), Some("[[C]]"));
        assert!(!meta.has("dad"));
    }

    #[test]
    fn roundtrip_through_json_keeps_lists() {
        let mut meta = Metadata::new();
        meta.insert("spouse_id", vec!["a".to_string(), "b".to_string()]);
        let back = Metadata::from_json(&meta.to_json());
        assert_eq!(back, meta);
    }
}
