//! The built-in handler for choice lists and free-text fields.

use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::model::{AttributeValue, ItemRef};
use crate::value_spec::ValueSpec;

use super::{
    AttributeHandler, AttributeValueSet, ChoiceView, FieldView, HandlerView, ShortcutTarget, Slot,
    assign,
};

/// Handler backed by an [`AttributeValueSet`].
///
/// Choice selection is exclusive: selecting a value writes it to every bound
/// item, so every other choice shows unselected afterwards. Deselecting a
/// value some bound item holds clears the attribute on every bound item.
#[derive(Debug)]
pub struct DefaultAttributeHandler {
    attribute: String,
    values: AttributeValueSet,
    items: Vec<ItemRef>,
    show_classes: bool,
}

impl DefaultAttributeHandler {
    /// Create a handler for `attribute` from its first declaration.
    pub fn new(attribute: &str, spec: &ValueSpec) -> Result<Self, ConfigError> {
        let mut handler = Self {
            attribute: attribute.to_string(),
            values: AttributeValueSet::new(),
            items: Vec::new(),
            show_classes: false,
        };
        handler.update(spec)?;
        Ok(handler)
    }

    /// Get the value set.
    pub fn values(&self) -> &AttributeValueSet {
        &self.values
    }

    /// Toggle a choice the way a checkable button does: deselect it when it is
    /// the current unique selection, select it otherwise.
    pub fn toggle_choice(&mut self, value: &AttributeValue) -> bool {
        let selected = self.display_state().is_selected(value);
        self.apply_choice(value, !selected)
    }

    fn title(&self) -> String {
        if !self.show_classes {
            return self.attribute.clone();
        }
        let classes: BTreeSet<String> = self
            .items
            .iter()
            .filter_map(|item| item.borrow().class().map(str::to_string))
            .collect();
        format!(
            "{} ({})",
            self.attribute,
            classes.into_iter().collect::<Vec<_>>().join(", ")
        )
    }
}

impl AttributeHandler for DefaultAttributeHandler {
    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn update(&mut self, spec: &ValueSpec) -> Result<(), ConfigError> {
        self.values.merge(&self.attribute, spec)
    }

    fn bind(&mut self, items: Vec<ItemRef>, show_classes: bool) {
        self.items = items;
        self.show_classes = show_classes;
    }

    fn items(&self) -> &[ItemRef] {
        &self.items
    }

    fn apply_choice(&mut self, value: &AttributeValue, selected: bool) -> bool {
        log::debug!(
            "Choice {}: {} {}",
            self.attribute,
            value,
            if selected { "selected" } else { "deselected" }
        );
        if !self.values.contains(value) {
            log::warn!("Ignoring unknown choice '{}' for '{}'", value, self.attribute);
            return false;
        }
        if !selected && !self.selected_values().contains(value) {
            return false;
        }
        let value = selected.then_some(value);
        assign(&self.attribute, &self.items, value)
    }

    fn commit_text(&mut self, text: &str) -> bool {
        let Some(kind) = self.values.field_kind() else {
            log::warn!("Attribute '{}' has no input field", self.attribute);
            return false;
        };

        if text.trim().is_empty() {
            return assign(&self.attribute, &self.items, None);
        }

        let Some(value) = kind.coerce(text) else {
            log::debug!("Ignoring '{}' for {} field '{}'", text, kind, self.attribute);
            return false;
        };

        if self.values.insert_at_marker(value.clone()) {
            log::debug!("Added new value '{}' to '{}'", value, self.attribute);
        }
        assign(&self.attribute, &self.items, Some(&value))
    }

    fn shortcut(&self, key: &str) -> Option<ShortcutTarget> {
        self.values.shortcut(key).cloned()
    }

    fn view(&self) -> HandlerView {
        let state = self.display_state();
        let mut choices = Vec::new();
        let mut field = None;

        for slot in self.values.slots() {
            match slot {
                Slot::Choice(value) => choices.push(ChoiceView {
                    value: value.clone(),
                    shortcuts: self
                        .values
                        .shortcuts_for(&ShortcutTarget::Choice(value.clone())),
                    state: state.choice_state(value),
                }),
                Slot::Field(kind) => {
                    field = Some(FieldView {
                        kind: *kind,
                        text: state.text(),
                        placeholder: state.placeholder(),
                        position: choices.len(),
                    })
                }
                Slot::InsertMarker => {}
            }
        }

        HandlerView {
            attribute: self.attribute.clone(),
            title: self.title(),
            choices,
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ChoiceState, DisplayState};
    use crate::model::{AnnotationItem, FieldKind};
    use crate::value_spec::ChoiceEntry;

    fn color_handler() -> DefaultAttributeHandler {
        DefaultAttributeHandler::new(
            "color",
            &ValueSpec::Choices(vec![
                ChoiceEntry::value("red").with_shortcut("r"),
                ChoiceEntry::value("green"),
                ChoiceEntry::insert_marker(),
                ChoiceEntry::field(FieldKind::Text),
            ]),
        )
        .unwrap()
    }

    fn item(class: &str, color: Option<&str>) -> ItemRef {
        let mut item = AnnotationItem::new(class);
        if let Some(color) = color {
            item.set("color", Some(color.into()));
        }
        item.into_ref()
    }

    #[test]
    fn test_select_and_deselect() {
        let mut handler = color_handler();
        let items = vec![item("rect", None), item("rect", Some("green"))];
        handler.bind(items.clone(), true);

        assert!(handler.apply_choice(&AttributeValue::from("red"), true));
        for item in &items {
            assert_eq!(item.borrow().get("color"), Some(&AttributeValue::from("red")));
        }
        let view = handler.view();
        assert_eq!(view.choices[0].state, ChoiceState::Selected);
        assert_eq!(view.choices[1].state, ChoiceState::Unselected);

        assert!(handler.apply_choice(&AttributeValue::from("red"), false));
        for item in &items {
            assert!(item.borrow().contains("color"));
            assert_eq!(item.borrow().get("color"), None);
        }
        assert_eq!(handler.display_state(), DisplayState::Empty);
    }

    #[test]
    fn test_deselecting_unheld_value_keeps_items() {
        let mut handler = color_handler();
        let items = vec![item("rect", Some("green"))];
        handler.bind(items.clone(), false);

        assert!(!handler.apply_choice(&AttributeValue::from("red"), false));
        assert_eq!(items[0].borrow().get("color"), Some(&AttributeValue::from("green")));

        assert!(handler.apply_choice(&AttributeValue::from("green"), false));
        assert_eq!(items[0].borrow().get("color"), None);
    }

    #[test]
    fn test_unknown_choice_is_ignored() {
        let mut handler = color_handler();
        let items = vec![item("rect", Some("red"))];
        handler.bind(items.clone(), false);
        assert!(!handler.apply_choice(&AttributeValue::from("purple"), true));
        assert_eq!(items[0].borrow().get("color"), Some(&AttributeValue::from("red")));
    }

    #[test]
    fn test_ambiguous_selection() {
        let mut handler = color_handler();
        handler.bind(
            vec![item("rect", Some("red")), item("circle", Some("green")), item("rect", None)],
            true,
        );

        let view = handler.view();
        assert_eq!(view.title, "color (circle, rect)");
        assert_eq!(view.choices[0].state, ChoiceState::InUse);
        assert_eq!(view.choices[1].state, ChoiceState::InUse);
        let field = view.field.unwrap();
        assert_eq!(field.text, "");
        assert_eq!(field.placeholder.as_deref(), Some("green, red"));
        assert_eq!(field.position, 2);
    }

    #[test]
    fn test_commit_text_collapses_disagreement() {
        let mut handler = color_handler();
        let items = vec![item("rect", Some("red")), item("rect", Some("green"))];
        handler.bind(items.clone(), true);

        assert!(handler.commit_text("blue"));
        assert_eq!(handler.display_state(), DisplayState::Single(AttributeValue::from("blue")));
        let labels: Vec<String> = handler.values().choices().map(ToString::to_string).collect();
        assert_eq!(labels, ["red", "green", "blue"]);

        // Known values are reused, not added again.
        assert!(handler.commit_text("red"));
        assert_eq!(handler.values().choices().count(), 3);
    }

    #[test]
    fn test_commit_text_coerces_to_field_type() {
        let mut handler =
            DefaultAttributeHandler::new("count", &ValueSpec::Field(FieldKind::Integer)).unwrap();
        let items = vec![AnnotationItem::new("rect").into_ref()];
        handler.bind(items.clone(), false);

        assert!(!handler.commit_text("many"));
        assert!(!items[0].borrow().contains("count"));

        assert!(handler.commit_text("4"));
        assert_eq!(
            items[0].borrow().get("count"),
            Some(&AttributeValue::Integer(4))
        );

        assert!(handler.commit_text(""));
        assert_eq!(items[0].borrow().get("count"), None);
    }

    #[test]
    fn test_toggle_choice() {
        let mut handler = color_handler();
        let items = vec![item("rect", None)];
        handler.bind(items.clone(), false);

        assert!(handler.toggle_choice(&AttributeValue::from("green")));
        assert_eq!(items[0].borrow().get("color"), Some(&AttributeValue::from("green")));
        assert!(handler.toggle_choice(&AttributeValue::from("green")));
        assert_eq!(items[0].borrow().get("color"), None);
    }

    #[test]
    fn test_rebind_resets_state() {
        let mut handler = color_handler();
        handler.bind(vec![item("rect", Some("red"))], false);
        handler.bind(vec![item("rect", None)], false);
        assert_eq!(handler.display_state(), DisplayState::Empty);
        handler.unbind();
        assert!(handler.items().is_empty());
    }
}
