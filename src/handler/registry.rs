//! Registry mapping attribute names to their shared handlers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ConfigError;
use crate::model::CLASS_ATTRIBUTE;
use crate::value_spec::ValueSpec;

use super::{DefaultAttributeHandler, HandlerRef};

/// Table of attribute handlers, one per attribute name.
///
/// Each catalog owns its own registry. Two label classes declaring the same
/// attribute name share one handler and therefore one value set.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerRef>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the handler for one attribute declaration.
    ///
    /// Returns None for the `class` attribute and for literal values, which
    /// are stored on the class prototype and never edited. A custom handler
    /// is registered and returned as-is. Otherwise the existing handler for
    /// `attribute` is extended with `spec`, or a new default handler is
    /// created.
    pub fn resolve(
        &mut self,
        attribute: &str,
        spec: &ValueSpec,
    ) -> Result<Option<HandlerRef>, ConfigError> {
        if attribute == CLASS_ATTRIBUTE {
            return Ok(None);
        }

        match spec {
            ValueSpec::Literal(_) => Ok(None),
            ValueSpec::Custom(handler) => match self.handlers.get(attribute) {
                Some(existing) if Rc::ptr_eq(existing, handler) => Ok(Some(handler.clone())),
                Some(_) => Err(ConfigError::HandlerConflict {
                    attribute: attribute.to_string(),
                }),
                None => {
                    log::debug!("Registering custom handler for '{}'", attribute);
                    self.handlers.insert(attribute.to_string(), handler.clone());
                    Ok(Some(handler.clone()))
                }
            },
            _ => match self.handlers.get(attribute) {
                Some(existing) => {
                    log::debug!("Extending handler for '{}'", attribute);
                    existing.borrow_mut().update(spec)?;
                    Ok(Some(existing.clone()))
                }
                None => {
                    log::debug!("Creating handler for '{}'", attribute);
                    let handler: HandlerRef =
                        Rc::new(RefCell::new(DefaultAttributeHandler::new(attribute, spec)?));
                    self.handlers.insert(attribute.to_string(), handler.clone());
                    Ok(Some(handler))
                }
            },
        }
    }

    /// Get the handler for an attribute, if one was registered.
    pub fn get(&self, attribute: &str) -> Option<HandlerRef> {
        self.handlers.get(attribute).cloned()
    }

    /// Get all attribute names with a handler, sorted.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all registered handlers.
    pub fn handlers(&self) -> impl Iterator<Item = &HandlerRef> {
        self.handlers.values()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check whether no handler was registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::AttributeHandler;
    use crate::model::{AttributeValue, FieldKind, ItemRef};

    #[derive(Debug, Default)]
    struct FixedHandler {
        items: Vec<ItemRef>,
    }

    impl AttributeHandler for FixedHandler {
        fn attribute(&self) -> &str {
            "score"
        }

        fn update(&mut self, _spec: &ValueSpec) -> Result<(), ConfigError> {
            Ok(())
        }

        fn bind(&mut self, items: Vec<ItemRef>, _show_classes: bool) {
            self.items = items;
        }

        fn items(&self) -> &[ItemRef] {
            &self.items
        }
    }

    #[test]
    fn test_class_and_literals_have_no_handler() {
        let mut registry = HandlerRegistry::new();
        assert!(
            registry
                .resolve("class", &ValueSpec::choices(["a", "b"]))
                .unwrap()
                .is_none()
        );
        assert!(
            registry
                .resolve("id", &ValueSpec::literal(3_i64))
                .unwrap()
                .is_none()
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_name_shares_handler() {
        let mut registry = HandlerRegistry::new();
        let first = registry
            .resolve("color", &ValueSpec::choices(["red"]))
            .unwrap()
            .unwrap();
        let second = registry
            .resolve("color", &ValueSpec::choices(["blue"]))
            .unwrap()
            .unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        let mut view_choices = first.borrow().view().choices.into_iter().map(|c| c.value);
        assert_eq!(view_choices.next(), Some(AttributeValue::from("red")));
        assert_eq!(view_choices.next(), Some(AttributeValue::from("blue")));
    }

    #[test]
    fn test_conflicting_field_type() {
        let mut registry = HandlerRegistry::new();
        registry
            .resolve("label", &ValueSpec::Field(FieldKind::Text))
            .unwrap();
        assert!(matches!(
            registry.resolve("label", &ValueSpec::Field(FieldKind::Real)),
            Err(ConfigError::FieldTypeConflict { .. })
        ));
    }

    #[test]
    fn test_custom_handler_pass_through() {
        let mut registry = HandlerRegistry::new();
        let custom: HandlerRef = Rc::new(RefCell::new(FixedHandler::default()));
        let spec = ValueSpec::Custom(custom.clone());

        let resolved = registry.resolve("score", &spec).unwrap().unwrap();
        assert!(Rc::ptr_eq(&resolved, &custom));
        // Declaring the same instance again is fine.
        assert!(registry.resolve("score", &spec).unwrap().is_some());

        let other: HandlerRef = Rc::new(RefCell::new(FixedHandler::default()));
        assert!(matches!(
            registry.resolve("score", &ValueSpec::Custom(other)),
            Err(ConfigError::HandlerConflict { .. })
        ));
        assert_eq!(registry.attributes(), ["score"]);
    }
}
