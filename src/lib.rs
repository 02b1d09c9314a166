//! HVAT attribute editor
//!
//! The attribute-editing engine of the annotation tool. A declarative list of
//! label classes is turned into shared attribute handlers that let the user
//! configure the attributes of a new annotation (insertion mode) or bulk-edit
//! the attributes of a selection of existing annotations (edit mode).
//!
//! ```rust,ignore
//! use hvat_attributes::{EditingSession, EditorConfig};
//!
//! let config = EditorConfig::load("labels.json")?;
//! let mut session = EditingSession::new(config.build_catalog()?);
//! session.enter_insertion("rect")?;
//! session.apply_choice("color", &"red".into(), true);
//! session.commit_text("label", "door");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod session;
pub mod value_spec;

pub use catalog::{LabelClassCatalog, LabelClassConfig, LabelClassEntry};
pub use config::{EditorConfig, LogLevel};
pub use error::{ConfigError, SessionError};
pub use handler::{AttributeHandler, DefaultAttributeHandler, HandlerRef, HandlerRegistry};
pub use model::{AnnotationItem, AttributeMap, AttributeValue, FieldKind, ItemRef};
pub use session::{EditingSession, SessionEvent, SessionMode};
pub use value_spec::{ChoiceEntry, ValueSpec};
