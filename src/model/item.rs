//! Annotation items as seen by the attribute editor.
//!
//! Items are owned by the caller (the annotation store). The editor only reads
//! and writes attribute entries on the items it is handed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::AttributeValue;

/// Name of the reserved attribute holding an item's label class.
pub const CLASS_ATTRIBUTE: &str = "class";

/// Attribute name to value mapping. A `None` value means the attribute is
/// present but unset.
pub type AttributeMap = BTreeMap<String, Option<AttributeValue>>;

/// Shared handle to an annotation item.
pub type ItemRef = Rc<RefCell<AnnotationItem>>;

/// A mutable mapping from attribute name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationItem {
    properties: AttributeMap,
}

impl AnnotationItem {
    /// Create an item of the given label class.
    pub fn new(class: &str) -> Self {
        let mut item = Self::default();
        item.set(CLASS_ATTRIBUTE, Some(AttributeValue::text(class)));
        item
    }

    /// Create an item from an existing attribute mapping.
    pub fn from_properties(properties: AttributeMap) -> Self {
        Self { properties }
    }

    /// Wrap this item into a shared handle.
    pub fn into_ref(self) -> ItemRef {
        Rc::new(RefCell::new(self))
    }

    /// Get the label class of this item.
    pub fn class(&self) -> Option<&str> {
        self.get(CLASS_ATTRIBUTE).and_then(AttributeValue::as_text)
    }

    /// Get the value of an attribute. Returns None when the attribute is
    /// absent or unset.
    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.properties.get(attribute).and_then(Option::as_ref)
    }

    /// Check whether the attribute is present (set or unset).
    pub fn contains(&self, attribute: &str) -> bool {
        self.properties.contains_key(attribute)
    }

    /// Set an attribute. `None` marks it unset.
    pub fn set(&mut self, attribute: &str, value: Option<AttributeValue>) {
        self.properties.insert(attribute.to_string(), value);
    }

    /// Mark an attribute unset, keeping it present in the mapping.
    pub fn clear(&mut self, attribute: &str) {
        self.set(attribute, None);
    }

    /// Merge several attribute values into this item.
    pub fn update(&mut self, values: impl IntoIterator<Item = (String, Option<AttributeValue>)>) {
        self.properties.extend(values);
    }

    /// Get the full attribute mapping.
    pub fn properties(&self) -> &AttributeMap {
        &self.properties
    }
}
