//! Error types for the attribute editor.

use thiserror::Error;

use crate::model::FieldKind;

/// Errors raised while building the label class catalog.
///
/// Every variant is a configuration mistake: the catalog cannot be used until
/// the configuration is fixed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Label class declared without an `attributes` object
    #[error("Label with no 'attributes' dict found")]
    MissingAttributes,

    /// Label class declared without a `class` attribute
    #[error("Labels must have an attribute 'class'")]
    MissingClass,

    /// The `class` attribute is not a literal text value
    #[error("Attribute 'class' must be a literal text value, found {found}")]
    InvalidClassName {
        /// Description of the offending value
        found: String,
    },

    /// Two label classes share the same name
    #[error("Label with class '{class}' defined more than once")]
    DuplicateClass {
        /// The duplicated class name
        class: String,
    },

    /// Value specification of an unsupported shape
    #[error(
        "Values for attribute '{attribute}' must be types, strings, numbers, or pairs of (value, shortcut): {value}"
    )]
    UnsupportedValue {
        /// Attribute being configured
        attribute: String,
        /// Rendering of the rejected value
        value: String,
    },

    /// Free-text field type name that is not text, integer or real
    #[error("Input field with type '{name}' not supported for attribute '{attribute}'")]
    UnsupportedFieldType {
        /// Attribute being configured
        attribute: String,
        /// The unknown type name
        name: String,
    },

    /// Free-text field declared twice with different types
    #[error(
        "Input field for attribute '{attribute}' configured twice with different types {existing} != {requested}"
    )]
    FieldTypeConflict {
        /// Attribute being configured
        attribute: String,
        /// Type of the existing field
        existing: FieldKind,
        /// Type of the conflicting declaration
        requested: FieldKind,
    },

    /// Same shortcut key registered twice on one handler
    #[error("Shortcut '{shortcut}' defined more than once for attribute '{attribute}'")]
    DuplicateShortcut {
        /// Attribute being configured
        attribute: String,
        /// The duplicated key
        shortcut: String,
    },

    /// Shortcut attached to something that has no editable widget
    #[error("Shortcut '{shortcut}' defined for value '{value}' of attribute '{attribute}' which is hidden")]
    HiddenShortcut {
        /// Attribute being configured
        attribute: String,
        /// The shortcut key
        shortcut: String,
        /// The value the shortcut was attached to
        value: String,
    },

    /// A custom handler was given for an attribute that already has a different handler
    #[error("Attribute '{attribute}' already has a different handler")]
    HandlerConflict {
        /// Attribute being configured
        attribute: String,
    },

    /// Configuration file written by a newer version
    #[error("Unsupported config version: expected at most {expected}, found {found}")]
    UnsupportedVersion {
        /// Newest supported version
        expected: u32,
        /// Version found in the file
        found: u32,
    },
}

impl ConfigError {
    /// Create an unsupported value error.
    pub fn unsupported_value(attribute: impl Into<String>, value: impl ToString) -> Self {
        Self::UnsupportedValue {
            attribute: attribute.into(),
            value: value.to_string(),
        }
    }

    /// Create an invalid class name error.
    pub fn invalid_class_name(found: impl ToString) -> Self {
        Self::InvalidClassName {
            found: found.to_string(),
        }
    }
}

/// Errors raised by editing session transitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Insertion requested for a class the catalog does not know
    #[error("Unknown label class: {0}")]
    UnknownClass(String),
}
