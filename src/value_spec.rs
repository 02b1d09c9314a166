//! Declarative attribute value specifications.
//!
//! A value spec describes what an attribute may hold. It is resolved once,
//! when a label class is registered:
//!
//! - [`ValueSpec::Literal`]: a fixed value written straight into the class prototype
//! - [`ValueSpec::Field`]: a free-text input of the given type
//! - [`ValueSpec::Choices`]: a list of choice values, free-text fields and the insert marker
//! - [`ValueSpec::Custom`]: a pre-built handler used as-is
//!
//! ## JSON encoding
//!
//! ```json
//! {
//!   "class": "rect",
//!   "id": 3,
//!   "label": {"type": "text"},
//!   "color": ["red", ["green", "g"], "*", {"type": "text"}]
//! }
//! ```

use serde_json::Value;

use crate::error::ConfigError;
use crate::handler::HandlerRef;
use crate::model::{AttributeValue, FieldKind};

/// Marker entry where newly typed values are inserted as choices.
pub const INSERT_MARKER: &str = "*";

/// Key of the JSON object that declares a free-text field.
const FIELD_TYPE_KEY: &str = "type";

/// What an attribute of a label class may hold.
#[derive(Debug, Clone)]
pub enum ValueSpec {
    /// Fixed, non-editable value
    Literal(AttributeValue),
    /// Free-text field of the given type
    Field(FieldKind),
    /// Sequence of choice entries
    Choices(Vec<ChoiceEntry>),
    /// Pre-built handler (extension point)
    Custom(HandlerRef),
}

/// The kind of a single entry in a choice list.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// Selectable choice value
    Value(AttributeValue),
    /// Free-text field
    Field(FieldKind),
    /// Insertion point for newly typed values
    InsertMarker,
}

/// One entry of a choice list, optionally bound to a shortcut key.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEntry {
    /// What this entry declares
    pub kind: EntryKind,
    /// Shortcut key for this entry
    pub shortcut: Option<String>,
}

impl ChoiceEntry {
    /// Create a choice value entry.
    pub fn value(value: impl Into<AttributeValue>) -> Self {
        Self {
            kind: EntryKind::Value(value.into()),
            shortcut: None,
        }
    }

    /// Create a free-text field entry.
    pub fn field(kind: FieldKind) -> Self {
        Self {
            kind: EntryKind::Field(kind),
            shortcut: None,
        }
    }

    /// Create the insert marker entry.
    pub fn insert_marker() -> Self {
        Self {
            kind: EntryKind::InsertMarker,
            shortcut: None,
        }
    }

    /// Attach a shortcut key.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Parse one entry of a JSON choice list.
    fn from_json(attribute: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Array(pair) => match pair.as_slice() {
                [inner @ (Value::String(_) | Value::Number(_) | Value::Object(_)), Value::String(key)] => {
                    Ok(Self::from_json(attribute, inner)?.with_shortcut(key.clone()))
                }
                _ => Err(ConfigError::unsupported_value(attribute, value)),
            },
            Value::String(s) if s == INSERT_MARKER => Ok(Self::insert_marker()),
            Value::Object(_) => Ok(Self::field(parse_field(attribute, value)?)),
            other => AttributeValue::from_json(other)
                .map(Self::value)
                .ok_or_else(|| ConfigError::unsupported_value(attribute, other)),
        }
    }
}

impl ValueSpec {
    /// Create a literal spec.
    pub fn literal(value: impl Into<AttributeValue>) -> Self {
        ValueSpec::Literal(value.into())
    }

    /// Create a choice list of plain values.
    pub fn choices<V: Into<AttributeValue>>(values: impl IntoIterator<Item = V>) -> Self {
        ValueSpec::Choices(values.into_iter().map(ChoiceEntry::value).collect())
    }

    /// Check whether this spec is a fixed value.
    pub fn is_literal(&self) -> bool {
        matches!(self, ValueSpec::Literal(_))
    }

    /// Parse a value spec for `attribute` from its JSON form.
    pub fn from_json(attribute: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Array(entries) => entries
                .iter()
                .map(|entry| ChoiceEntry::from_json(attribute, entry))
                .collect::<Result<Vec<_>, _>>()
                .map(ValueSpec::Choices),
            Value::Object(_) => Ok(ValueSpec::Field(parse_field(attribute, value)?)),
            other => AttributeValue::from_json(other)
                .map(ValueSpec::Literal)
                .ok_or_else(|| ConfigError::unsupported_value(attribute, other)),
        }
    }
}

/// Parse a `{"type": "<kind>"}` field declaration.
fn parse_field(attribute: &str, value: &Value) -> Result<FieldKind, ConfigError> {
    let Some(object) = value.as_object().filter(|o| o.len() == 1) else {
        return Err(ConfigError::unsupported_value(attribute, value));
    };
    match object.get(FIELD_TYPE_KEY) {
        Some(Value::String(name)) => {
            FieldKind::from_name(name).ok_or_else(|| ConfigError::UnsupportedFieldType {
                attribute: attribute.to_string(),
                name: name.clone(),
            })
        }
        _ => Err(ConfigError::unsupported_value(attribute, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_are_literals() {
        assert!(matches!(
            ValueSpec::from_json("id", &json!(3)),
            Ok(ValueSpec::Literal(AttributeValue::Integer(3)))
        ));
        assert!(ValueSpec::from_json("name", &json!("*")).unwrap().is_literal());
    }

    #[test]
    fn test_field_marker() {
        assert!(matches!(
            ValueSpec::from_json("label", &json!({"type": "str"})),
            Ok(ValueSpec::Field(FieldKind::Text))
        ));
        assert!(matches!(
            ValueSpec::from_json("label", &json!({"type": "complex"})),
            Err(ConfigError::UnsupportedFieldType { .. })
        ));
        assert!(matches!(
            ValueSpec::from_json("label", &json!({"kind": "text"})),
            Err(ConfigError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_choice_list() {
        let spec = ValueSpec::from_json(
            "color",
            &json!(["red", ["green", "g"], "*", [{"type": "text"}, "t"], 4]),
        )
        .unwrap();
        let ValueSpec::Choices(entries) = spec else {
            panic!("expected a choice list");
        };
        assert_eq!(
            entries,
            vec![
                ChoiceEntry::value("red"),
                ChoiceEntry::value("green").with_shortcut("g"),
                ChoiceEntry::insert_marker(),
                ChoiceEntry::field(FieldKind::Text).with_shortcut("t"),
                ChoiceEntry::value(4_i64),
            ]
        );
    }

    #[test]
    fn test_malformed_entries() {
        for bad in [
            json!(true),
            json!(null),
            json!([["a", "b", "c"]]),
            json!([["a", 1]]),
            json!([[["a"], "x"]]),
            json!([null]),
        ] {
            assert!(
                matches!(
                    ValueSpec::from_json("attr", &bad),
                    Err(ConfigError::UnsupportedValue { .. })
                ),
                "accepted {bad}"
            );
        }
    }
}
