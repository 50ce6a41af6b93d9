//! Placeholder values passed into template execution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder key to value mapping used to render one message
pub type Placeholders = BTreeMap<String, PlaceholderValue>;

/// A placeholder value of any JSON-like shape
///
/// Values reach the template engine untouched; conversion to text happens
/// only when the template prints them, using the engine's default
/// formatting for the value's type. Callers needing a specific textual
/// form should pass a pre-formatted `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceholderValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PlaceholderValue>),
    Map(BTreeMap<String, PlaceholderValue>),
}

impl PlaceholderValue {
    /// Borrow the inner string if this is a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlaceholderValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PlaceholderValue::Null)
    }
}

impl From<&str> for PlaceholderValue {
    fn from(value: &str) -> Self {
        PlaceholderValue::String(value.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(value: String) -> Self {
        PlaceholderValue::String(value)
    }
}

impl From<bool> for PlaceholderValue {
    fn from(value: bool) -> Self {
        PlaceholderValue::Bool(value)
    }
}

impl From<i64> for PlaceholderValue {
    fn from(value: i64) -> Self {
        PlaceholderValue::Integer(value)
    }
}

impl From<f64> for PlaceholderValue {
    fn from(value: f64) -> Self {
        PlaceholderValue::Float(value)
    }
}

impl<T: Into<PlaceholderValue>> From<Vec<T>> for PlaceholderValue {
    fn from(values: Vec<T>) -> Self {
        PlaceholderValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, PlaceholderValue>> for PlaceholderValue {
    fn from(map: BTreeMap<String, PlaceholderValue>) -> Self {
        PlaceholderValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_variants() {
        let json = r#"{"n": null, "b": true, "i": 42, "f": 1.5, "s": "hi",
                       "l": [1, "two"], "m": {"k": "v"}}"#;
        let values: Placeholders = serde_json::from_str(json).unwrap();

        assert_eq!(values["n"], PlaceholderValue::Null);
        assert_eq!(values["b"], PlaceholderValue::Bool(true));
        assert_eq!(values["i"], PlaceholderValue::Integer(42));
        assert_eq!(values["f"], PlaceholderValue::Float(1.5));
        assert_eq!(values["s"].as_str(), Some("hi"));
        assert_eq!(
            values["l"],
            PlaceholderValue::List(vec![
                PlaceholderValue::Integer(1),
                PlaceholderValue::String("two".to_string()),
            ])
        );
        match &values["m"] {
            PlaceholderValue::Map(m) => assert_eq!(m["k"].as_str(), Some("v")),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_preserves_shape() {
        let value = PlaceholderValue::from(vec!["a", "b"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["a","b"]"#);
        assert_eq!(serde_json::to_string(&PlaceholderValue::Null).unwrap(), "null");
    }
}
