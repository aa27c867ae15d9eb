//! Editor session. Owns the document and wires user intents to the
//! controller, history, and clipboard.
//!
//! DESIGN
//! ======
//! The session is the single owner of the element list. Controllers borrow it
//! per call; nothing else holds a copy. Each completed mutation records
//! exactly one history snapshot. While a gesture is active the document
//! belongs to that gesture: commands, undo/redo, and template application are
//! ignored until it ends or is cancelled. Loading a document cancels it.
//!
//! Saving is split in two so editing never waits on I/O: `begin_save` hands
//! out a detached snapshot and raises the `saving` flag, `finish_save` clears
//! it and surfaces the collaborator's result.
//!
//! ERROR HANDLING
//! ==============
//! Only persistence failures (and saving from a read-only or unbound session)
//! are reported. Everything else degrades to a logged no-op.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::controller::{AlignMode, Controller};
use crate::doc::Document;
use crate::element::{Content, Element, ElementId, ElementKind, StylePatch};
use crate::geometry::{Point, Size, SnapLine};
use crate::hit::{HitPart, hit_test};
use crate::history::History;
use crate::input::{InputState, Key, Modifiers, ResizeHandle};
use crate::intent::Intent;
use crate::store::{DocumentId, DocumentStore, Principal, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is read-only")]
    ReadOnly,
    #[error("session is not bound to a document")]
    Unbound,
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Authorization fact supplied by the host before the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub can_edit: bool,
}

impl Access {
    #[must_use]
    pub fn editor() -> Self {
        Self { can_edit: true }
    }

    #[must_use]
    pub fn viewer() -> Self {
        Self { can_edit: false }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Transient frame (drag, resize, marquee) needs repainting.
    RenderNeeded,
    /// The selection changed; carries the new selection.
    SelectionChanged(Vec<ElementId>),
    /// A mutation was committed and recorded in history.
    DocumentChanged,
    /// The user asked to save (Ctrl/Cmd+S).
    SaveRequested,
}

/// Detached snapshot handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub document_id: DocumentId,
    pub elements: Vec<Element>,
}

pub struct EditorSession {
    document_id: Option<DocumentId>,
    doc: Document,
    controller: Controller,
    history: History,
    clipboard: Clipboard,
    config: EditorConfig,
    access: Access,
    saving: bool,
}

impl EditorSession {
    /// Session over an empty, unbound document.
    #[must_use]
    pub fn new(config: EditorConfig, access: Access) -> Self {
        Self::with_elements(config, access, Vec::new())
    }

    /// Session over `elements`; history starts with them as the only entry.
    #[must_use]
    pub fn with_elements(config: EditorConfig, access: Access, mut elements: Vec<Element>) -> Self {
        let controller = Controller::new(&config);
        controller.fit_all(&mut elements);
        let doc = Document::from_elements(elements);
        Self {
            document_id: None,
            history: History::with_capacity(doc.clone(), config.history_capacity),
            doc,
            controller,
            clipboard: Clipboard::new(),
            config,
            access,
            saving: false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn set_document_id(&mut self, id: DocumentId) {
        self.document_id = Some(id);
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.controller.selection()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        self.controller.input()
    }

    #[must_use]
    pub fn active_guides(&self) -> &[SnapLine] {
        self.controller.active_guides()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.access.can_edit
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Change the page size for the rest of the session.
    pub fn set_canvas(&mut self, canvas: Size) {
        self.config.canvas = canvas;
        self.controller.set_canvas(canvas);
    }

    // --- Internals ---

    /// Whether a discrete mutating command may run now.
    fn may_mutate(&self, op: &'static str) -> bool {
        if !self.access.can_edit {
            warn!(op, "mutation refused: session is read-only");
            return false;
        }
        if !self.controller.input().is_idle() {
            debug!(op, "mutation ignored: gesture in progress");
            return false;
        }
        true
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.history.record(&self.doc);
        }
        changed
    }

    // --- Selection ---

    pub fn select(&mut self, id: ElementId, additive: bool) -> bool {
        self.controller.input().is_idle() && self.controller.select(&self.doc, id, additive)
    }

    pub fn select_all(&mut self) -> bool {
        self.controller.input().is_idle() && self.controller.select_all(&self.doc)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.controller.input().is_idle() && self.controller.clear_selection()
    }

    // --- Gestures ---

    pub fn begin_drag(&mut self, pointer: Point, hit: Option<ElementId>) -> bool {
        self.access.can_edit && self.controller.begin_drag(&self.doc, pointer, hit)
    }

    pub fn update_drag(&mut self, pointer: Point) -> bool {
        self.controller.update_drag(&mut self.doc, pointer)
    }

    /// Commit the drag; records once if anything moved.
    pub fn end_drag(&mut self) -> bool {
        let moved = self.controller.end_drag(&self.doc);
        self.commit(moved)
    }

    pub fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle, pointer: Point) -> bool {
        self.access.can_edit && self.controller.begin_resize(&self.doc, id, handle, pointer)
    }

    pub fn update_resize(&mut self, pointer: Point) -> bool {
        self.controller.update_resize(&mut self.doc, pointer)
    }

    /// Commit the resize; records once if the rectangle changed.
    pub fn end_resize(&mut self) -> bool {
        let resized = self.controller.end_resize(&self.doc);
        self.commit(resized)
    }

    pub fn begin_marquee(&mut self, pointer: Point) -> bool {
        self.controller.begin_marquee(pointer, false)
    }

    pub fn update_marquee(&mut self, pointer: Point) -> bool {
        self.controller.update_marquee(&self.doc, pointer)
    }

    pub fn end_marquee(&mut self) -> bool {
        self.controller.end_marquee()
    }

    /// Abort the active gesture without recording.
    pub fn cancel_gesture(&mut self) -> bool {
        self.controller.cancel_gesture(&mut self.doc)
    }

    /// Drag the current selection by `delta` as one complete gesture.
    pub fn move_selection(&mut self, delta: Point) -> bool {
        if !self.may_mutate("move_selection") {
            return false;
        }
        let origin = Point::default();
        if !self.controller.begin_drag(&self.doc, origin, None) {
            return false;
        }
        self.controller.update_drag(&mut self.doc, delta);
        self.end_drag()
    }

    /// Drag `handle` of `id` by `delta` as one complete gesture.
    pub fn resize(&mut self, id: ElementId, handle: ResizeHandle, delta: Point) -> bool {
        if !self.may_mutate("resize") {
            return false;
        }
        let origin = Point::default();
        if !self.controller.begin_resize(&self.doc, id, handle, origin) {
            return false;
        }
        self.controller.update_resize(&mut self.doc, delta);
        self.end_resize()
    }

    /// Rubber-band select between two points as one complete gesture.
    pub fn marquee(&mut self, start: Point, end: Point) -> bool {
        if !self.controller.begin_marquee(start, false) {
            return false;
        }
        let changed = self.controller.update_marquee(&self.doc, end);
        self.controller.end_marquee();
        changed
    }

    // --- Commands ---

    /// Create an element of `kind` at `position` and select it.
    pub fn add_element(&mut self, kind: ElementKind, position: Point) -> Option<ElementId> {
        if !self.may_mutate("add_element") {
            return None;
        }
        let ids = self.controller.insert(&mut self.doc, vec![Element::create(kind, position)]);
        let id = ids.first().copied()?;
        self.commit(true);
        debug!(%id, %kind, "element added");
        Some(id)
    }

    pub fn align(&mut self, mode: AlignMode) -> bool {
        if !self.may_mutate("align") {
            return false;
        }
        let changed = self.controller.align(&mut self.doc, mode);
        self.commit(changed)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        if !self.may_mutate("bring_to_front") {
            return false;
        }
        let changed = self.controller.bring_to_front(&mut self.doc, id);
        self.commit(changed)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        if !self.may_mutate("send_to_back") {
            return false;
        }
        let changed = self.controller.send_to_back(&mut self.doc, id);
        self.commit(changed)
    }

    pub fn delete_selected(&mut self) -> bool {
        if !self.may_mutate("delete_selected") {
            return false;
        }
        let changed = self.controller.delete_selected(&mut self.doc);
        self.commit(changed)
    }

    pub fn duplicate_selected(&mut self) -> bool {
        if !self.may_mutate("duplicate_selected") {
            return false;
        }
        let changed = self.controller.duplicate_selected(&mut self.doc);
        self.commit(changed)
    }

    pub fn set_locked(&mut self, id: ElementId, locked: bool) -> bool {
        if !self.may_mutate("set_locked") {
            return false;
        }
        let changed = self.controller.set_locked(&mut self.doc, id, locked);
        self.commit(changed)
    }

    pub fn rotate(&mut self, id: ElementId) -> bool {
        if !self.may_mutate("rotate") {
            return false;
        }
        let changed = self.controller.rotate(&mut self.doc, id);
        self.commit(changed)
    }

    pub fn update_style(&mut self, id: ElementId, patch: &StylePatch) -> bool {
        if !self.may_mutate("update_style") {
            return false;
        }
        let changed = self.controller.update_style(&mut self.doc, id, patch);
        self.commit(changed)
    }

    pub fn update_content(&mut self, id: ElementId, content: Content) -> bool {
        if !self.may_mutate("update_content") {
            return false;
        }
        let changed = self.controller.update_content(&mut self.doc, id, content);
        self.commit(changed)
    }

    /// Copy the selected elements, in document order, to the clipboard.
    /// Returns how many were copied; an empty selection leaves the clipboard as is.
    pub fn copy(&mut self) -> usize {
        let selected: Vec<Element> = self
            .doc
            .elements()
            .iter()
            .filter(|el| self.controller.is_selected(&el.id))
            .cloned()
            .collect();
        if selected.is_empty() {
            return 0;
        }
        self.clipboard.copy(&selected);
        selected.len()
    }

    /// Paste the clipboard and select the pasted elements.
    pub fn paste(&mut self) -> Vec<ElementId> {
        if !self.may_mutate("paste") || !self.clipboard.has_content() {
            return Vec::new();
        }
        let offset = Point::new(self.config.paste_offset, self.config.paste_offset);
        let pasted = self.clipboard.paste_with_offset(offset);
        let ids = self.controller.insert(&mut self.doc, pasted);
        self.commit(!ids.is_empty());
        ids
    }

    pub fn undo(&mut self) -> bool {
        if !self.may_mutate("undo") {
            return false;
        }
        let Some(doc) = self.history.undo() else {
            return false;
        };
        self.doc = doc;
        self.controller.prune_selection(&self.doc);
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.may_mutate("redo") {
            return false;
        }
        let Some(doc) = self.history.redo() else {
            return false;
        };
        self.doc = doc;
        self.controller.prune_selection(&self.doc);
        true
    }

    /// Replace the page with a template's elements as one undoable step.
    /// Template elements get fresh ids and are fitted to the page.
    pub fn apply_template(&mut self, elements: &[Element]) -> bool {
        if !self.may_mutate("apply_template") {
            return false;
        }
        let origin = Point::default();
        let fresh: Vec<Element> = elements.iter().map(|el| el.copy_with_offset(origin)).collect();
        self.doc = Document::new();
        self.controller.insert(&mut self.doc, fresh);
        self.controller.clear_selection();
        info!(count = self.doc.len(), "template applied");
        self.commit(true)
    }

    /// Replace the document wholesale and restart history from it.
    /// Elements are fitted to the page first.
    pub fn replace_document(&mut self, mut elements: Vec<Element>) {
        self.controller.cancel_gesture(&mut self.doc);
        self.controller.fit_all(&mut elements);
        self.doc = Document::from_elements(elements);
        self.history.reset(self.doc.clone());
        self.controller.clear_selection();
    }

    // --- Persistence boundary ---

    /// Load `id` from `store` as the new document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] when the store fails; the current
    /// document and history are left untouched.
    pub async fn load(
        &mut self,
        store: &dyn DocumentStore,
        principal: &Principal,
        id: DocumentId,
    ) -> Result<(), SessionError> {
        let elements = store.load(principal, id).await.inspect_err(|e| {
            warn!(%id, error = %e, "document load failed");
        })?;
        self.replace_document(elements);
        self.document_id = Some(id);
        info!(%id, count = self.doc.len(), "document loaded");
        Ok(())
    }

    /// Snapshot the document for saving and raise the `saving` flag.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ReadOnly`] for viewers and
    /// [`SessionError::Unbound`] when no document id is set.
    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        if !self.access.can_edit {
            return Err(SessionError::ReadOnly);
        }
        let document_id = self.document_id.ok_or(SessionError::Unbound)?;
        self.saving = true;
        Ok(SaveRequest { document_id, elements: self.doc.elements().to_vec() })
    }

    /// Clear the `saving` flag and surface the collaborator's result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] when the save failed.
    pub fn finish_save(&mut self, result: Result<(), StoreError>) -> Result<(), SessionError> {
        self.saving = false;
        match result {
            Ok(()) => {
                info!(id = ?self.document_id, "document saved");
                Ok(())
            }
            Err(e) => {
                warn!(id = ?self.document_id, error = %e, "document save failed");
                Err(SessionError::Persistence(e))
            }
        }
    }

    /// `begin_save`, await the store, then `finish_save`.
    ///
    /// # Errors
    ///
    /// See [`EditorSession::begin_save`] and [`EditorSession::finish_save`].
    pub async fn save(&mut self, store: &dyn DocumentStore, principal: &Principal) -> Result<(), SessionError> {
        let request = self.begin_save()?;
        let result = store.save(principal, request.document_id, request.elements).await;
        self.finish_save(result)
    }

    // --- Input events ---

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged(self.controller.selection().to_vec())
    }

    pub fn on_pointer_down(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.controller.input().is_idle() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let handles_for = match self.controller.selection() {
            [only] if self.access.can_edit => Some(*only),
            _ => None,
        };

        match hit_test(pt, &self.doc, handles_for) {
            Some(hit) => match hit.part {
                HitPart::ResizeHandle(handle) => {
                    if self.controller.begin_resize(&self.doc, hit.element_id, handle, pt) {
                        actions.push(Action::RenderNeeded);
                    }
                }
                HitPart::Body => {
                    let id = hit.element_id;
                    if modifiers.additive() && self.controller.capabilities().multi_select {
                        if self.controller.select(&self.doc, id, true) {
                            actions.push(self.selection_changed());
                        }
                    } else {
                        if !self.controller.is_selected(&id) && self.controller.select(&self.doc, id, false) {
                            actions.push(self.selection_changed());
                        }
                        if self.begin_drag(pt, Some(id)) {
                            actions.push(Action::RenderNeeded);
                        }
                    }
                }
            },
            None => {
                if !modifiers.additive() && self.controller.clear_selection() {
                    actions.push(self.selection_changed());
                }
                if self.controller.begin_marquee(pt, modifiers.additive()) {
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.controller.input() {
            InputState::Idle => Vec::new(),
            InputState::Dragging { .. } => {
                if self.update_drag(pt) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            InputState::Resizing { .. } => {
                if self.update_resize(pt) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            InputState::MarqueeSelecting { .. } => {
                let changed = self.update_marquee(pt);
                let mut actions = vec![Action::RenderNeeded];
                if changed {
                    actions.push(self.selection_changed());
                }
                actions
            }
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = self.on_pointer_move(pt);
        actions.retain(|a| *a != Action::RenderNeeded);
        let committed = match self.controller.input() {
            InputState::Idle => return actions,
            InputState::Dragging { .. } => self.end_drag(),
            InputState::Resizing { .. } => self.end_resize(),
            InputState::MarqueeSelecting { .. } => {
                self.end_marquee();
                false
            }
        };
        if committed {
            actions.push(Action::DocumentChanged);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Keyboard shortcuts. Ctrl and Cmd are interchangeable.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            if self.cancel_gesture() {
                return vec![Action::RenderNeeded];
            }
            return if self.clear_selection() { vec![self.selection_changed()] } else { Vec::new() };
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.changed_with_selection(|s| s.delete_selected());
        }
        if !modifiers.command() {
            return Vec::new();
        }

        if key.is("c") {
            self.copy();
            Vec::new()
        } else if key.is("v") {
            let pasted = self.paste();
            if pasted.is_empty() { Vec::new() } else { vec![Action::DocumentChanged, self.selection_changed()] }
        } else if key.is("d") {
            self.changed_with_selection(|s| s.duplicate_selected())
        } else if key.is("a") {
            if self.select_all() { vec![self.selection_changed()] } else { Vec::new() }
        } else if (key.is("z") && modifiers.shift) || key.is("y") {
            self.changed_with_selection(|s| s.redo())
        } else if key.is("z") {
            self.changed_with_selection(|s| s.undo())
        } else if key.is("s") {
            vec![Action::SaveRequested]
        } else {
            Vec::new()
        }
    }

    fn changed_with_selection(&mut self, op: impl FnOnce(&mut Self) -> bool) -> Vec<Action> {
        if op(self) { vec![Action::DocumentChanged, self.selection_changed()] } else { Vec::new() }
    }

    /// Dispatch one intent.
    pub fn apply(&mut self, intent: Intent) -> Vec<Action> {
        let changed = |c: bool| if c { vec![Action::DocumentChanged] } else { Vec::new() };
        match intent {
            Intent::Add { kind, x, y } => match self.add_element(kind, Point::new(x, y)) {
                Some(_) => vec![Action::DocumentChanged, self.selection_changed()],
                None => Vec::new(),
            },
            Intent::Select { id, additive } => {
                if self.select(id, additive) { vec![self.selection_changed()] } else { Vec::new() }
            }
            Intent::SelectAll => {
                if self.select_all() { vec![self.selection_changed()] } else { Vec::new() }
            }
            Intent::ClearSelection => {
                if self.clear_selection() { vec![self.selection_changed()] } else { Vec::new() }
            }
            Intent::PointerDown { x, y, modifiers } => self.on_pointer_down(Point::new(x, y), modifiers),
            Intent::PointerMove { x, y } => self.on_pointer_move(Point::new(x, y)),
            Intent::PointerUp { x, y } => self.on_pointer_up(Point::new(x, y)),
            Intent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
            Intent::MoveSelection { dx, dy } => changed(self.move_selection(Point::new(dx, dy))),
            Intent::Resize { id, handle, dx, dy } => changed(self.resize(id, handle, Point::new(dx, dy))),
            Intent::Marquee { x1, y1, x2, y2 } => {
                if self.marquee(Point::new(x1, y1), Point::new(x2, y2)) {
                    vec![self.selection_changed()]
                } else {
                    Vec::new()
                }
            }
            Intent::Align { mode } => changed(self.align(mode)),
            Intent::BringToFront { id } => changed(self.bring_to_front(id)),
            Intent::SendToBack { id } => changed(self.send_to_back(id)),
            Intent::DeleteSelected => self.changed_with_selection(Self::delete_selected),
            Intent::DuplicateSelected => self.changed_with_selection(Self::duplicate_selected),
            Intent::Copy => {
                self.copy();
                Vec::new()
            }
            Intent::Paste => {
                if self.paste().is_empty() { Vec::new() } else { vec![Action::DocumentChanged, self.selection_changed()] }
            }
            Intent::Undo => self.changed_with_selection(Self::undo),
            Intent::Redo => self.changed_with_selection(Self::redo),
            Intent::Cancel => {
                if self.cancel_gesture() { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            Intent::SetLocked { id, locked } => changed(self.set_locked(id, locked)),
            Intent::Rotate { id } => changed(self.rotate(id)),
            Intent::UpdateStyle { id, patch } => changed(self.update_style(id, &patch)),
            Intent::UpdateContent { id, content } => changed(self.update_content(id, content)),
            Intent::ApplyTemplate { elements } => self.changed_with_selection(|s| s.apply_template(&elements)),
        }
    }
}
