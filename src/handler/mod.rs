//! Attribute handlers.
//!
//! A handler owns the editable state of one attribute name. It is shared by
//! every label class that declares the attribute, and is bound to the
//! annotation items currently being inserted or edited.

mod default;
mod registry;
mod value_set;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::error::ConfigError;
use crate::model::{AttributeMap, AttributeValue, FieldKind, ItemRef};
use crate::value_spec::ValueSpec;

pub use default::DefaultAttributeHandler;
pub use registry::HandlerRegistry;
pub use value_set::{AttributeValueSet, ShortcutTarget, Slot};

/// Shared handle to an attribute handler.
pub type HandlerRef = Rc<RefCell<dyn AttributeHandler>>;

/// Editable state for one attribute name.
///
/// Only [`attribute`](Self::attribute), [`update`](Self::update),
/// [`bind`](Self::bind) and [`items`](Self::items) are required. Custom
/// handlers that do not support choices or free text keep the default
/// no-op interaction methods.
pub trait AttributeHandler: fmt::Debug {
    /// Name of the attribute this handler edits.
    fn attribute(&self) -> &str;

    /// Values written into a class prototype when the class is registered.
    fn defaults(&self) -> AttributeMap {
        AttributeMap::new()
    }

    /// Merge another class's declaration for this attribute.
    fn update(&mut self, spec: &ValueSpec) -> Result<(), ConfigError>;

    /// Attach items, replacing any previous binding.
    ///
    /// `show_classes` switches the handler into aggregate mode, where its
    /// title lists the classes of the bound items.
    fn bind(&mut self, items: Vec<ItemRef>, show_classes: bool);

    /// Detach all items.
    fn unbind(&mut self) {
        self.bind(Vec::new(), false);
    }

    /// Items currently bound.
    fn items(&self) -> &[ItemRef];

    /// Distinct non-null values the bound items hold for this attribute.
    fn selected_values(&self) -> BTreeSet<AttributeValue> {
        selected_values(self.attribute(), self.items())
    }

    /// How the bound values should be displayed.
    fn display_state(&self) -> DisplayState {
        DisplayState::from_values(self.selected_values())
    }

    /// Select (`selected = true`) or deselect a choice on all bound items.
    ///
    /// Returns true if any bound item changed.
    fn apply_choice(&mut self, _value: &AttributeValue, _selected: bool) -> bool {
        false
    }

    /// Commit text typed into the free-text field.
    ///
    /// Returns true if any bound item changed.
    fn commit_text(&mut self, _text: &str) -> bool {
        false
    }

    /// Look up what a shortcut key activates on this handler.
    fn shortcut(&self, _key: &str) -> Option<ShortcutTarget> {
        None
    }

    /// Snapshot of the handler for rendering.
    fn view(&self) -> HandlerView {
        HandlerView {
            attribute: self.attribute().to_string(),
            title: self.attribute().to_string(),
            choices: Vec::new(),
            field: None,
        }
    }
}

/// Collect the distinct non-null values of `attribute` across `items`.
pub fn selected_values(attribute: &str, items: &[ItemRef]) -> BTreeSet<AttributeValue> {
    items
        .iter()
        .filter_map(|item| item.borrow().get(attribute).cloned())
        .collect()
}

/// Write `value` to `attribute` on every item. Returns true if any item changed.
pub(crate) fn assign(attribute: &str, items: &[ItemRef], value: Option<&AttributeValue>) -> bool {
    let mut changed = false;
    for item in items {
        let mut item = item.borrow_mut();
        if !item.contains(attribute) || item.get(attribute) != value {
            match value {
                Some(value) => item.set(attribute, Some(value.clone())),
                None => item.clear(attribute),
            }
            changed = true;
        }
    }
    changed
}

/// Aggregate display state of an attribute across the bound items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// No bound item has a value
    Empty,
    /// All bound items with a value agree
    Single(AttributeValue),
    /// Bound items disagree
    Ambiguous(BTreeSet<AttributeValue>),
}

impl DisplayState {
    /// Derive the display state from a set of selected values.
    pub fn from_values(mut values: BTreeSet<AttributeValue>) -> Self {
        match values.len() {
            0 => DisplayState::Empty,
            1 => values
                .pop_first()
                .map_or(DisplayState::Empty, DisplayState::Single),
            _ => DisplayState::Ambiguous(values),
        }
    }

    /// Check whether a value is shown as the exclusive selection.
    pub fn is_selected(&self, value: &AttributeValue) -> bool {
        matches!(self, DisplayState::Single(v) if v == value)
    }

    /// Get the state of a choice button for `value`.
    pub fn choice_state(&self, value: &AttributeValue) -> ChoiceState {
        match self {
            DisplayState::Single(v) if v == value => ChoiceState::Selected,
            DisplayState::Ambiguous(values) if values.contains(value) => ChoiceState::InUse,
            _ => ChoiceState::Unselected,
        }
    }

    /// Text shown in the free-text field.
    pub fn text(&self) -> String {
        match self {
            DisplayState::Single(v) => v.to_string(),
            _ => String::new(),
        }
    }

    /// Placeholder shown in the free-text field when values disagree.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            DisplayState::Ambiguous(values) => Some(
                values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

/// Display state of a single choice button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    /// Not held by any bound item
    Unselected,
    /// Held by every bound item that has a value
    Selected,
    /// Held by some bound items while others disagree
    InUse,
}

/// Render snapshot of a choice button.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView {
    /// The choice value
    pub value: AttributeValue,
    /// Shortcut keys that select it
    pub shortcuts: Vec<String>,
    /// Current display state
    pub state: ChoiceState,
}

/// Render snapshot of the free-text field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    /// Accepted input type
    pub kind: FieldKind,
    /// Current text (the common value, or empty)
    pub text: String,
    /// Placeholder listing disagreeing values
    pub placeholder: Option<String>,
    /// Position of the field among the choices
    pub position: usize,
}

/// Render snapshot of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerView {
    /// Attribute name
    pub attribute: String,
    /// Group title, including bound classes in aggregate mode
    pub title: String,
    /// Choice buttons in layout order
    pub choices: Vec<ChoiceView>,
    /// The free-text field, if declared
    pub field: Option<FieldView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_state_from_values() {
        assert_eq!(DisplayState::from_values(BTreeSet::new()), DisplayState::Empty);

        let single = DisplayState::from_values(["red".into()].into_iter().collect());
        assert_eq!(single, DisplayState::Single("red".into()));
        assert_eq!(single.text(), "red");
        assert_eq!(single.placeholder(), None);

        let ambiguous =
            DisplayState::from_values(["red".into(), "green".into()].into_iter().collect());
        assert_eq!(ambiguous.text(), "");
        assert_eq!(ambiguous.placeholder().as_deref(), Some("green, red"));
    }

    #[test]
    fn test_choice_states() {
        let red = AttributeValue::from("red");
        let green = AttributeValue::from("green");
        let blue = AttributeValue::from("blue");

        let single = DisplayState::Single(red.clone());
        assert_eq!(single.choice_state(&red), ChoiceState::Selected);
        assert_eq!(single.choice_state(&green), ChoiceState::Unselected);

        let ambiguous = DisplayState::Ambiguous([red.clone(), green.clone()].into());
        assert_eq!(ambiguous.choice_state(&red), ChoiceState::InUse);
        assert_eq!(ambiguous.choice_state(&green), ChoiceState::InUse);
        assert_eq!(ambiguous.choice_state(&blue), ChoiceState::Unselected);
        assert!(!ambiguous.is_selected(&red));
    }
}
