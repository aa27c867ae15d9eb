//! Copy/paste buffer.
//!
//! The buffer is an immutable snapshot; every paste hands out fresh copies
//! with new ids, so the same buffer can be pasted any number of times.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use tracing::debug;

use crate::consts::PASTE_OFFSET_PX;
use crate::element::Element;
use crate::geometry::Point;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Vec<Element>,
}

impl Clipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with deep copies of `elements`.
    pub fn copy(&mut self, elements: &[Element]) {
        self.buffer = elements.to_vec();
        debug!(count = self.buffer.len(), "copied elements to clipboard");
    }

    /// Fresh copies of the buffer shifted by the default paste offset.
    #[must_use]
    pub fn paste(&self) -> Vec<Element> {
        self.paste_with_offset(Point::new(PASTE_OFFSET_PX, PASTE_OFFSET_PX))
    }

    /// Fresh copies of the buffer shifted by `offset`. Empty buffer yields an
    /// empty list.
    #[must_use]
    pub fn paste_with_offset(&self, offset: Point) -> Vec<Element> {
        self.buffer.iter().map(|el| el.copy_with_offset(offset)).collect()
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Number of buffered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
