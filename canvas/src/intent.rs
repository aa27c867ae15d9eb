//! Serializable user intents.
//!
//! Every toolbar command, pointer event, and shortcut the session understands
//! has a variant here, so a host (or a script) can drive the editor with
//! plain JSON such as `{"type": "align", "mode": "right"}`.

#[cfg(test)]
#[path = "intent_test.rs"]
mod intent_test;

use serde::{Deserialize, Serialize};

use crate::controller::AlignMode;
use crate::element::{Content, Element, ElementId, ElementKind, StylePatch};
use crate::input::{Key, Modifiers, ResizeHandle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Add {
        kind: ElementKind,
        x: f64,
        y: f64,
    },
    Select {
        id: ElementId,
        #[serde(default)]
        additive: bool,
    },
    SelectAll,
    ClearSelection,
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Drag the selection by a fixed delta as one gesture.
    MoveSelection {
        dx: f64,
        dy: f64,
    },
    /// Drag one handle of `id` by a fixed delta as one gesture.
    Resize {
        id: ElementId,
        handle: ResizeHandle,
        dx: f64,
        dy: f64,
    },
    Marquee {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Align {
        mode: AlignMode,
    },
    BringToFront {
        id: ElementId,
    },
    SendToBack {
        id: ElementId,
    },
    DeleteSelected,
    DuplicateSelected,
    Copy,
    Paste,
    Undo,
    Redo,
    Cancel,
    SetLocked {
        id: ElementId,
        locked: bool,
    },
    Rotate {
        id: ElementId,
    },
    UpdateStyle {
        id: ElementId,
        patch: StylePatch,
    },
    UpdateContent {
        id: ElementId,
        content: Content,
    },
    ApplyTemplate {
        elements: Vec<Element>,
    },
}
