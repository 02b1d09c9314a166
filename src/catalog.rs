//! Label class catalog.
//!
//! The catalog turns label class declarations into a prototype item per
//! class plus the shared attribute handlers those classes reference.

use serde_json::Value;

use crate::error::ConfigError;
use crate::handler::{HandlerRef, HandlerRegistry};
use crate::model::{AnnotationItem, AttributeValue, CLASS_ATTRIBUTE, ItemRef};
use crate::value_spec::ValueSpec;

/// Key of the attribute declarations in a label class descriptor.
const ATTRIBUTES_KEY: &str = "attributes";

/// Declaration of one label class: its ordered attribute specs.
#[derive(Debug, Clone, Default)]
pub struct LabelClassConfig {
    attributes: Vec<(String, ValueSpec)>,
}

impl LabelClassConfig {
    /// Start a declaration for the given class name.
    pub fn new(class: &str) -> Self {
        Self::default().attribute(CLASS_ATTRIBUTE, ValueSpec::literal(class))
    }

    /// Declare an attribute. A later declaration of the same name replaces
    /// the earlier one.
    pub fn attribute(mut self, name: &str, spec: ValueSpec) -> Self {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = spec,
            None => self.attributes.push((name.to_string(), spec)),
        }
        self
    }

    /// Get the declared attributes in order.
    pub fn attributes(&self) -> &[(String, ValueSpec)] {
        &self.attributes
    }

    /// Parse a `{ "attributes": { ... } }` descriptor.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let attributes = value
            .get(ATTRIBUTES_KEY)
            .and_then(Value::as_object)
            .ok_or(ConfigError::MissingAttributes)?;

        attributes
            .iter()
            .try_fold(Self::default(), |config, (name, spec)| {
                Ok(config.attribute(name, ValueSpec::from_json(name, spec)?))
            })
    }

    fn class_name(&self) -> Result<String, ConfigError> {
        let (_, spec) = self
            .attributes
            .iter()
            .find(|(name, _)| name == CLASS_ATTRIBUTE)
            .ok_or(ConfigError::MissingClass)?;
        match spec {
            ValueSpec::Literal(AttributeValue::Text(name)) => Ok(name.clone()),
            ValueSpec::Literal(value) => Err(ConfigError::invalid_class_name(value)),
            other => Err(ConfigError::invalid_class_name(format!("{other:?}"))),
        }
    }
}

/// A registered label class.
#[derive(Debug)]
pub struct LabelClassEntry {
    name: String,
    attributes: Vec<String>,
    editable: Vec<String>,
    prototype: ItemRef,
}

impl LabelClassEntry {
    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attribute names, in declaration order (including `class`).
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Declared attributes that resolved to a handler.
    pub fn editable_attributes(&self) -> &[String] {
        &self.editable
    }

    /// Check whether this class edits `attribute` through a handler.
    pub fn is_editable(&self, attribute: &str) -> bool {
        self.editable.iter().any(|a| a == attribute)
    }

    /// Prototype item used when inserting a new item of this class.
    pub fn prototype(&self) -> &ItemRef {
        &self.prototype
    }
}

/// The configured label classes and their shared handlers.
#[derive(Debug, Default)]
pub struct LabelClassCatalog {
    registry: HandlerRegistry,
    classes: Vec<LabelClassEntry>,
}

impl LabelClassCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a sequence of class declarations.
    pub fn from_configs(
        configs: impl IntoIterator<Item = LabelClassConfig>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for config in configs {
            catalog.register(config)?;
        }
        Ok(catalog)
    }

    /// Register a label class.
    ///
    /// Literal attributes are written into the class prototype. All other
    /// attributes are resolved through the handler registry; once every
    /// attribute is resolved, the handlers' defaults are merged into the
    /// prototype.
    pub fn register(&mut self, config: LabelClassConfig) -> Result<(), ConfigError> {
        let name = config.class_name()?;
        if self.get(&name).is_some() {
            return Err(ConfigError::DuplicateClass { class: name });
        }

        let mut prototype = AnnotationItem::new(&name);
        let mut handlers: Vec<(String, HandlerRef)> = Vec::new();

        for (attribute, spec) in config.attributes() {
            match self.registry.resolve(attribute, spec)? {
                Some(handler) => handlers.push((attribute.clone(), handler)),
                None => {
                    if let ValueSpec::Literal(value) = spec {
                        prototype.set(attribute, Some(value.clone()));
                    }
                }
            }
        }

        for (_, handler) in &handlers {
            prototype.update(handler.borrow().defaults());
        }

        log::info!(
            "Registered label class '{}' with {} editable attribute(s)",
            name,
            handlers.len()
        );

        self.classes.push(LabelClassEntry {
            attributes: config.attributes().iter().map(|(a, _)| a.clone()).collect(),
            editable: handlers.into_iter().map(|(a, _)| a).collect(),
            prototype: prototype.into_ref(),
            name,
        });
        Ok(())
    }

    /// Get a registered class.
    pub fn get(&self, class: &str) -> Option<&LabelClassEntry> {
        self.classes.iter().find(|entry| entry.name == class)
    }

    /// Attribute names declared for a class, in declaration order.
    pub fn attributes_of(&self, class: &str) -> Option<&[String]> {
        self.get(class).map(LabelClassEntry::attributes)
    }

    /// Get the handler for an attribute.
    pub fn handler(&self, attribute: &str) -> Option<HandlerRef> {
        self.registry.get(attribute)
    }

    /// Get the handler registry.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Iterate over registered classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &LabelClassEntry> {
        self.classes.iter()
    }

    /// Registered class names in registration order.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|entry| entry.name.as_str()).collect()
    }
}
