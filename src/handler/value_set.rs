//! Allowed values of a single attribute.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::model::{AttributeValue, FieldKind};
use crate::value_spec::{ChoiceEntry, EntryKind, ValueSpec};

/// What a shortcut key activates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutTarget {
    /// Select a choice value
    Choice(AttributeValue),
    /// Focus the free-text field
    Field,
}

/// Position of a widget in the value set's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A selectable choice value
    Choice(AttributeValue),
    /// The free-text field
    Field(FieldKind),
    /// Where newly typed values get inserted
    InsertMarker,
}

/// Ordered choice values plus at most one typed free-text field.
///
/// The value set is independent of any label class; it accumulates the
/// declarations of every class that uses the attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeValueSet {
    slots: Vec<Slot>,
    field: Option<FieldKind>,
    shortcuts: BTreeMap<String, ShortcutTarget>,
}

impl AttributeValueSet {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a value spec into this set.
    ///
    /// Known literal values are skipped. Fails on a field type conflict, a
    /// duplicate shortcut, or a spec that cannot be merged.
    pub fn merge(&mut self, attribute: &str, spec: &ValueSpec) -> Result<(), ConfigError> {
        match spec {
            ValueSpec::Field(kind) => self.add_field(attribute, *kind),
            ValueSpec::Choices(entries) => entries
                .iter()
                .try_for_each(|entry| self.merge_entry(attribute, entry)),
            ValueSpec::Literal(value) => Err(ConfigError::unsupported_value(attribute, value)),
            ValueSpec::Custom(_) => Err(ConfigError::HandlerConflict {
                attribute: attribute.to_string(),
            }),
        }
    }

    fn merge_entry(&mut self, attribute: &str, entry: &ChoiceEntry) -> Result<(), ConfigError> {
        let target = match &entry.kind {
            EntryKind::Value(value) => {
                self.add_choice(value.clone());
                ShortcutTarget::Choice(value.clone())
            }
            EntryKind::Field(kind) => {
                self.add_field(attribute, *kind)?;
                ShortcutTarget::Field
            }
            EntryKind::InsertMarker => {
                if let Some(shortcut) = &entry.shortcut {
                    return Err(ConfigError::HiddenShortcut {
                        attribute: attribute.to_string(),
                        shortcut: shortcut.clone(),
                        value: crate::value_spec::INSERT_MARKER.to_string(),
                    });
                }
                if !self.has_insert_marker() {
                    self.slots.push(Slot::InsertMarker);
                }
                return Ok(());
            }
        };

        match &entry.shortcut {
            Some(shortcut) => self.add_shortcut(attribute, shortcut, target),
            None => Ok(()),
        }
    }

    fn add_field(&mut self, attribute: &str, kind: FieldKind) -> Result<(), ConfigError> {
        match self.field {
            None => {
                self.field = Some(kind);
                self.slots.push(Slot::Field(kind));
                Ok(())
            }
            Some(existing) if existing == kind => Ok(()),
            Some(existing) => Err(ConfigError::FieldTypeConflict {
                attribute: attribute.to_string(),
                existing,
                requested: kind,
            }),
        }
    }

    fn add_shortcut(
        &mut self,
        attribute: &str,
        shortcut: &str,
        target: ShortcutTarget,
    ) -> Result<(), ConfigError> {
        if self.shortcuts.contains_key(shortcut) {
            return Err(ConfigError::DuplicateShortcut {
                attribute: attribute.to_string(),
                shortcut: shortcut.to_string(),
            });
        }
        self.shortcuts.insert(shortcut.to_string(), target);
        Ok(())
    }

    /// Append a choice value. Returns false if the value was already known.
    pub fn add_choice(&mut self, value: AttributeValue) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.slots.push(Slot::Choice(value));
        true
    }

    /// Insert a newly typed value at the insert marker.
    ///
    /// Returns false if there is no marker or the value is already a choice.
    pub fn insert_at_marker(&mut self, value: AttributeValue) -> bool {
        if self.contains(&value) {
            return false;
        }
        let Some(pos) = self.slots.iter().position(|s| *s == Slot::InsertMarker) else {
            return false;
        };
        self.slots.insert(pos, Slot::Choice(value));
        true
    }

    /// Check whether a value is a known choice.
    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.choices().any(|choice| choice == value)
    }

    /// Iterate over choice values in layout order.
    pub fn choices(&self) -> impl Iterator<Item = &AttributeValue> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Choice(value) => Some(value),
            _ => None,
        })
    }

    /// Get all slots in layout order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get the free-text field type, if any.
    pub fn field_kind(&self) -> Option<FieldKind> {
        self.field
    }

    /// Check whether an insert marker was declared.
    pub fn has_insert_marker(&self) -> bool {
        self.slots.contains(&Slot::InsertMarker)
    }

    /// Look up what a shortcut key activates.
    pub fn shortcut(&self, key: &str) -> Option<&ShortcutTarget> {
        self.shortcuts.get(key)
    }

    /// Get all shortcut keys bound to a target, in key order.
    pub fn shortcuts_for(&self, target: &ShortcutTarget) -> Vec<String> {
        self.shortcuts
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(key, _)| key.clone())
            .collect()
    }
}
