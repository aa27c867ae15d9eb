//! Undo/redo over whole-document snapshots.
//!
//! DESIGN
//! ======
//! Linear history: a bounded list of snapshots plus a cursor. Recording while
//! the cursor is behind the end discards the redo branch. When the list grows
//! past capacity the oldest snapshot is evicted, so the very first document
//! eventually becomes unreachable.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::consts::HISTORY_CAPACITY;
use crate::doc::Document;

/// One immutable snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub document: Document,
    /// Milliseconds since the Unix epoch when the snapshot was taken.
    pub timestamp_ms: i64,
}

/// Bounded snapshot stack with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl History {
    /// History holding only `initial`, with the default capacity.
    #[must_use]
    pub fn new(initial: Document) -> Self {
        Self::with_capacity(initial, HISTORY_CAPACITY)
    }

    /// History holding only `initial`. A capacity of zero is treated as one.
    #[must_use]
    pub fn with_capacity(initial: Document, capacity: usize) -> Self {
        Self {
            entries: vec![HistoryEntry { document: initial, timestamp_ms: now_ms() }],
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Push a snapshot of `document` as the newest entry.
    pub fn record(&mut self, document: &Document) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry { document: document.clone(), timestamp_ms: now_ms() });
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        debug!(entries = self.entries.len(), cursor = self.cursor, "history recorded");
    }

    /// Step back one entry, returning the snapshot now current.
    pub fn undo(&mut self) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].document.clone())
    }

    /// Step forward one entry, returning the snapshot now current.
    pub fn redo(&mut self) -> Option<Document> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].document.clone())
    }

    /// Drop every entry and start over from `document`.
    pub fn reset(&mut self, document: Document) {
        self.entries.clear();
        self.entries.push(HistoryEntry { document, timestamp_ms: now_ms() });
        self.cursor = 0;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: history holds at least the initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
