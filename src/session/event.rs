//! Notifications emitted by the editing session.
//!
//! Events are queued in the order they happen and drained by the rendering
//! layer, in the same spirit as the application's message enum.

use crate::model::{AttributeMap, AttributeValue, ItemRef};

/// Something the rendering layer should react to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Insertion mode started for a class
    InsertionStarted(String),
    /// Insertion mode ended
    InsertionEnded,
    /// The prototype item changed during insertion
    InsertionPropertiesChanged(AttributeMap),
    /// Edited items changed
    EditPropertiesChanged(Vec<ItemRef>),
}

/// Result of triggering a shortcut key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    /// A choice was selected on the bound items
    Selected {
        /// Attribute that changed
        attribute: String,
        /// The selected value
        value: AttributeValue,
    },
    /// The choice was already the unique selection; nothing changed
    AlreadySelected {
        /// Attribute of the choice
        attribute: String,
    },
    /// The renderer should focus the attribute's free-text field
    FocusField {
        /// Attribute owning the field
        attribute: String,
    },
}
