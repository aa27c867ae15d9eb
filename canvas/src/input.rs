//! Input model: modifier keys, keys, resize handles, and the gesture state machine.
//!
//! `Modifiers` and `Key` capture the user's intent at the time of an event.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying everything needed to recompute positions from the
//! gesture's start (never frame-to-frame) and to restore them on cancel.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::geometry::{Point, Rect};

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    /// Meta / Command key.
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a click should toggle membership instead of replacing the selection.
    #[must_use]
    pub fn additive(self) -> bool {
        self.shift || self.command()
    }
}

/// A keyboard key name as reported by the host (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive match for single-character keys, exact otherwise.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        if self.0.chars().count() == 1 { self.0.eq_ignore_ascii_case(name) } else { self.0 == name }
    }
}

/// One of the eight compass handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Handle drags the left edge (right edge is the anchor).
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Handle drags the right edge (left edge is the anchor).
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Handle drags the top edge (bottom edge is the anchor).
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Handle drags the bottom edge (top edge is the anchor).
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Where this handle sits on `rect`.
    #[must_use]
    pub fn anchor_point(self, rect: &Rect) -> Point {
        let x = if self.moves_left() {
            rect.x
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.center().x
        };
        let y = if self.moves_top() {
            rect.y
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.center().y
        };
        Point::new(x, y)
    }
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to recompute the document
/// from the gesture's starting point and to revert on cancel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving one or more elements.
    Dragging {
        /// Element under the pointer at drag start; the one that snaps.
        primary: ElementId,
        /// Pointer position at drag start.
        start_pointer: Point,
        /// `(id, position)` of every dragged element at drag start.
        start_positions: Vec<(ElementId, Point)>,
    },
    /// Resizing one element from one of its eight handles.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start_pointer: Point,
        /// Element rectangle at resize start.
        start_rect: Rect,
    },
    /// Rubber-band selection on empty canvas.
    MarqueeSelecting {
        start: Point,
        current: Point,
        /// Selection kept alongside the marquee hits (additive marquee).
        kept: Vec<ElementId>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
