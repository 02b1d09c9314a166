//! Editing session: the Insertion/Edit state machine.
//!
//! The session owns the catalog and at most one live editor. An editor is the
//! set of handlers bound for the current mode. Entering a mode always releases
//! the previous editor first, so no handler ever stays bound to items from an
//! earlier selection.
//!
//! ```text
//! Idle ──enter_insertion──▶ Insertion(class) ──exit_insertion──▶ Idle
//!   │                            │
//!   └──────enter_edit────────────┴──▶ Edit(items) ──exit_edit──▶ Idle
//! ```

mod event;
#[cfg(test)]
mod tests;

pub use event::{SessionEvent, ShortcutAction};

use crate::catalog::LabelClassCatalog;
use crate::error::SessionError;
use crate::handler::{HandlerRef, HandlerView, ShortcutTarget};
use crate::model::{AttributeMap, AttributeValue, ItemRef};

/// Current mode of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// No editor bound
    Idle,
    /// Configuring the prototype of a class
    Insertion(String),
    /// Bulk-editing existing items
    Edit,
}

/// How a class button should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassState {
    /// Not involved in the current mode
    Inactive,
    /// Insertion mode is active for this class
    Inserting,
    /// Some edited item belongs to this class
    Editing,
}

/// Handlers bound for the current mode.
#[derive(Debug)]
struct LabelEditor {
    items: Vec<ItemRef>,
    classes: Vec<String>,
    handlers: Vec<(String, HandlerRef)>,
}

impl LabelEditor {
    /// Bind `items` to the handlers of every attribute their classes edit.
    ///
    /// Each handler only receives the items whose class declares its attribute.
    fn open(catalog: &LabelClassCatalog, items: Vec<ItemRef>) -> Self {
        let mut classes: Vec<String> = Vec::new();
        for item in &items {
            let class = item.borrow().class().map(str::to_string);
            match class {
                Some(class) if catalog.get(&class).is_some() => {
                    if !classes.contains(&class) {
                        classes.push(class);
                    }
                }
                Some(class) => log::warn!("Item of unknown class '{}' ignored", class),
                None => log::warn!("Item without a class ignored"),
            }
        }
        log::debug!(
            "Creating editor for {} item class(es): {}",
            classes.len(),
            classes.join(", ")
        );

        let mut attributes: Vec<&str> = Vec::new();
        for entry in classes.iter().filter_map(|class| catalog.get(class)) {
            for attribute in entry.editable_attributes() {
                if !attributes.contains(&attribute.as_str()) {
                    attributes.push(attribute.as_str());
                }
            }
        }

        let mut handlers = Vec::new();
        for attribute in attributes {
            let Some(handler) = catalog.handler(attribute) else {
                continue;
            };
            let bound: Vec<ItemRef> = items
                .iter()
                .filter(|item| {
                    item.borrow()
                        .class()
                        .and_then(|class| catalog.get(class))
                        .is_some_and(|entry| entry.is_editable(attribute))
                })
                .cloned()
                .collect();
            let show_classes = bound.len() > 1;
            handler.borrow_mut().bind(bound, show_classes);
            handlers.push((attribute.to_string(), handler));
        }

        Self {
            items,
            classes,
            handlers,
        }
    }

    /// Unbind every handler of this editor.
    fn release(self) {
        for (_, handler) in self.handlers {
            handler.borrow_mut().unbind();
        }
    }

    fn handler(&self, attribute: &str) -> Option<&HandlerRef> {
        self.handlers
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, handler)| handler)
    }
}

/// Top-level controller for inserting and editing annotation attributes.
#[derive(Debug)]
pub struct EditingSession {
    catalog: LabelClassCatalog,
    mode: SessionMode,
    editor: Option<LabelEditor>,
    events: Vec<SessionEvent>,
}

impl EditingSession {
    /// Create an idle session over a catalog.
    pub fn new(catalog: LabelClassCatalog) -> Self {
        Self {
            catalog,
            mode: SessionMode::Idle,
            editor: None,
            events: Vec::new(),
        }
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &LabelClassCatalog {
        &self.catalog
    }

    /// Get the current mode.
    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    /// Class being inserted, if insertion mode is active.
    pub fn insertion_class(&self) -> Option<&str> {
        match &self.mode {
            SessionMode::Insertion(class) => Some(class),
            _ => None,
        }
    }

    /// Start insertion mode for `class`, leaving any active mode first.
    pub fn enter_insertion(&mut self, class: &str) -> Result<(), SessionError> {
        let prototype = self
            .catalog
            .get(class)
            .map(|entry| entry.prototype().clone())
            .ok_or_else(|| SessionError::UnknownClass(class.to_string()))?;

        self.close_editor();
        log::debug!("Starting insertion mode for {}", class);
        self.editor = Some(LabelEditor::open(&self.catalog, vec![prototype]));
        self.mode = SessionMode::Insertion(class.to_string());
        self.events
            .push(SessionEvent::InsertionStarted(class.to_string()));
        Ok(())
    }

    /// Leave insertion mode. Does nothing in any other mode.
    pub fn exit_insertion(&mut self) {
        if matches!(self.mode, SessionMode::Insertion(_)) {
            self.close_editor();
        }
    }

    /// Start editing `items`, leaving any active mode first.
    ///
    /// An empty selection leaves the session idle.
    pub fn enter_edit(&mut self, items: Vec<ItemRef>) {
        self.close_editor();
        if items.is_empty() {
            return;
        }
        log::debug!("Starting edit mode for {} item(s)", items.len());
        self.editor = Some(LabelEditor::open(&self.catalog, items));
        self.mode = SessionMode::Edit;
    }

    /// Leave edit mode. Does nothing in any other mode.
    pub fn exit_edit(&mut self) {
        if self.mode == SessionMode::Edit {
            self.close_editor();
        }
    }

    fn close_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            editor.release();
        }
        if let SessionMode::Insertion(_) = std::mem::replace(&mut self.mode, SessionMode::Idle) {
            log::debug!("Ending insertion mode");
            self.events.push(SessionEvent::InsertionEnded);
        }
    }

    /// Items bound by the live editor.
    pub fn items(&self) -> &[ItemRef] {
        match &self.editor {
            Some(editor) => &editor.items,
            None => &[],
        }
    }

    /// Properties of the single item being inserted or edited.
    ///
    /// Empty when idle or when more than one item is being edited.
    pub fn current_properties(&self) -> AttributeMap {
        match self.items() {
            [item] => item.borrow().properties().clone(),
            _ => AttributeMap::new(),
        }
    }

    /// Attributes shown by the live editor, in display order.
    pub fn visible_attributes(&self) -> Vec<&str> {
        self.editor
            .iter()
            .flat_map(|editor| editor.handlers.iter().map(|(name, _)| name.as_str()))
            .collect()
    }

    /// Handler of a visible attribute.
    pub fn handler(&self, attribute: &str) -> Option<HandlerRef> {
        self.editor.as_ref()?.handler(attribute).cloned()
    }

    /// Render snapshots of the visible handlers.
    pub fn handler_views(&self) -> Vec<HandlerView> {
        self.editor
            .iter()
            .flat_map(|editor| editor.handlers.iter())
            .map(|(_, handler)| handler.borrow().view())
            .collect()
    }

    /// Display state of every class button.
    pub fn class_states(&self) -> Vec<(String, ClassState)> {
        self.catalog
            .classes()
            .map(|entry| {
                let state = match (&self.mode, &self.editor) {
                    (SessionMode::Insertion(class), _) if class == entry.name() => {
                        ClassState::Inserting
                    }
                    (SessionMode::Edit, Some(editor))
                        if editor.classes.iter().any(|c| c == entry.name()) =>
                    {
                        ClassState::Editing
                    }
                    _ => ClassState::Inactive,
                };
                (entry.name().to_string(), state)
            })
            .collect()
    }

    /// Select or deselect a choice of a visible attribute.
    ///
    /// Returns true if any bound item changed.
    pub fn apply_choice(&mut self, attribute: &str, value: &AttributeValue, selected: bool) -> bool {
        let Some(handler) = self.handler(attribute) else {
            return false;
        };
        let changed = handler.borrow_mut().apply_choice(value, selected);
        self.notify(changed)
    }

    /// Toggle a choice of a visible attribute like a checkable button.
    pub fn toggle_choice(&mut self, attribute: &str, value: &AttributeValue) -> bool {
        let Some(handler) = self.handler(attribute) else {
            return false;
        };
        let selected = handler.borrow().display_state().is_selected(value);
        self.apply_choice(attribute, value, !selected)
    }

    /// Commit text typed into a visible attribute's free-text field.
    pub fn commit_text(&mut self, attribute: &str, text: &str) -> bool {
        let Some(handler) = self.handler(attribute) else {
            return false;
        };
        let changed = handler.borrow_mut().commit_text(text);
        self.notify(changed)
    }

    /// Dispatch a shortcut key to the visible handlers.
    ///
    /// A choice shortcut selects the choice unless it already is the unique
    /// selection. A field shortcut asks the renderer to focus the field.
    pub fn trigger_shortcut(&mut self, key: &str) -> Option<ShortcutAction> {
        let (attribute, target) = self.editor.as_ref()?.handlers.iter().find_map(|(name, handler)| {
            let target = handler.borrow().shortcut(key);
            target.map(|target| (name.clone(), target))
        })?;

        match target {
            ShortcutTarget::Field => Some(ShortcutAction::FocusField { attribute }),
            ShortcutTarget::Choice(value) => {
                let handler = self.handler(&attribute)?;
                let already = handler.borrow().display_state().is_selected(&value);
                if already {
                    return Some(ShortcutAction::AlreadySelected { attribute });
                }
                self.apply_choice(&attribute, &value, true);
                Some(ShortcutAction::Selected { attribute, value })
            }
        }
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn notify(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        let event = match &self.mode {
            SessionMode::Insertion(_) => {
                SessionEvent::InsertionPropertiesChanged(self.current_properties())
            }
            SessionMode::Edit => SessionEvent::EditPropertiesChanged(self.items().to_vec()),
            SessionMode::Idle => return true,
        };
        self.events.push(event);
        true
    }
}
