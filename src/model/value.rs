//! Attribute values and free-text field types.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value stored on an annotation item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Whole number
    Integer(i64),
    /// Floating point number
    Real(f64),
    /// Free text
    Text(String),
}

impl AttributeValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    /// Get the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the JSON representation of this value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Integer(v) => serde_json::Value::from(*v),
            AttributeValue::Real(v) => serde_json::Value::from(*v),
            AttributeValue::Text(v) => serde_json::Value::from(v.as_str()),
        }
    }

    /// Convert a scalar JSON value. Returns None for anything that is not a
    /// string or a number.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(AttributeValue::Text(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(AttributeValue::Integer)
                .or_else(|| n.as_f64().map(AttributeValue::Real)),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            AttributeValue::Integer(_) => 0,
            AttributeValue::Real(_) => 1,
            AttributeValue::Text(_) => 2,
        }
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttributeValue::Integer(a), AttributeValue::Integer(b)) => a.cmp(b),
            (AttributeValue::Real(a), AttributeValue::Real(b)) => a.total_cmp(b),
            (AttributeValue::Text(a), AttributeValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttributeValue {}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Real(v) => write!(f, "{v}"),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Real(value)
    }
}

/// Type of a free-text input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Any text
    #[serde(alias = "str", alias = "string")]
    Text,
    /// Whole numbers only
    #[serde(alias = "int")]
    Integer,
    /// Any number
    #[serde(alias = "float")]
    Real,
}

impl FieldKind {
    /// Get the display name for this field type.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Real => "real",
        }
    }

    /// Parse a type name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::from(name)).ok()
    }

    /// Convert text typed into a field of this kind into a value.
    ///
    /// Returns None when the text is not acceptable for this field type.
    pub fn coerce(&self, text: &str) -> Option<AttributeValue> {
        let text = text.trim();
        match self {
            FieldKind::Text => Some(AttributeValue::Text(text.to_string())),
            FieldKind::Integer => text
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|v| v.fract() == 0.0)
                        .filter(|v| (i64::MIN as f64..i64::MAX as f64).contains(v))
                        .map(|v| v as i64)
                })
                .map(AttributeValue::Integer),
            FieldKind::Real => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(AttributeValue::Real),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_field_kind_names() {
        assert_eq!(FieldKind::from_name("text"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("str"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("int"), Some(FieldKind::Integer));
        assert_eq!(FieldKind::from_name("float"), Some(FieldKind::Real));
        assert_eq!(FieldKind::from_name("bool"), None);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(FieldKind::Text.coerce(" door "), Some(AttributeValue::from("door")));
        assert_eq!(FieldKind::Integer.coerce("42"), Some(AttributeValue::Integer(42)));
        assert_eq!(FieldKind::Integer.coerce("3.0"), Some(AttributeValue::Integer(3)));
        assert_eq!(FieldKind::Integer.coerce("3.5"), None);
        assert_eq!(FieldKind::Integer.coerce("1e30"), None);
        assert_eq!(FieldKind::Integer.coerce("-1e30"), None);
        assert_eq!(FieldKind::Integer.coerce("inf"), None);
        assert_eq!(FieldKind::Integer.coerce("1e3"), Some(AttributeValue::Integer(1000)));
        assert_eq!(FieldKind::Real.coerce("5"), Some(AttributeValue::Real(5.0)));
        assert_eq!(FieldKind::Real.coerce("abc"), None);
    }

    #[test]
    fn test_values_form_a_set() {
        let values: BTreeSet<AttributeValue> = [
            AttributeValue::from("red"),
            AttributeValue::from("red"),
            AttributeValue::from(2.5_f64),
            AttributeValue::from(1_i64),
        ]
        .into_iter()
        .collect();
        assert_eq!(values.len(), 3);
        assert_ne!(AttributeValue::from(1_i64), AttributeValue::from("1"));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            AttributeValue::from_json(&serde_json::json!(7)),
            Some(AttributeValue::Integer(7))
        );
        assert_eq!(
            AttributeValue::from_json(&serde_json::json!("a")),
            Some(AttributeValue::from("a"))
        );
        assert_eq!(AttributeValue::from_json(&serde_json::json!(true)), None);
        assert_eq!(AttributeValue::from_json(&serde_json::Value::Null), None);
    }
}
