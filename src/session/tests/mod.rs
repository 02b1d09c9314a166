//! Scenario tests for the editing session.


use serde_json::json;

use crate::catalog::{LabelClassCatalog, LabelClassConfig};
use crate::model::{AnnotationItem, AttributeValue, ItemRef};

use super::EditingSession;

/// Catalog with three classes. `rect` and `circle` share `color`;
/// `point` has no `color` and a literal `kind`.
fn catalog() -> LabelClassCatalog {
    let classes = json!([
        {"attributes": {
            "class": "rect",
            "color": [["red", "r"], ["green", "g"], "*", [{"type": "text"}, "t"]],
            "label": {"type": "text"}
        }},
        {"attributes": {
            "class": "circle",
            "color": ["blue"],
            "radius": {"type": "real"}
        }},
        {"attributes": {
            "class": "point",
            "kind": "keypoint",
            "visible": [1, 0]
        }}
    ]);
    let configs = classes
        .as_array()
        .unwrap()
        .iter()
        .map(|c| LabelClassConfig::from_json(c).unwrap());
    LabelClassCatalog::from_configs(configs).unwrap()
}

fn session() -> EditingSession {
    EditingSession::new(catalog())
}

fn item(class: &str, attributes: &[(&str, AttributeValue)]) -> ItemRef {
    let mut item = AnnotationItem::new(class);
    for (name, value) in attributes {
        item.set(name, Some(value.clone()));
    }
    item.into_ref()
}

fn text(value: &str) -> AttributeValue {
    AttributeValue::from(value)
}
