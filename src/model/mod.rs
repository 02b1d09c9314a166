//! Data models for the attribute editor.

mod item;
mod value;

pub use item::{AnnotationItem, AttributeMap, CLASS_ATTRIBUTE, ItemRef};
pub use value::{AttributeValue, FieldKind};
