//! Bounded undo/redo history
//!
//! Entries are pre-mutation snapshots of the [`Diagram`]. Because tables are
//! shared through `Arc`, recording a snapshot copies only the table vector;
//! the live diagram detaches the tables it later edits.

use crate::core::schema::Diagram;

// ============================================================================
// Constants
// ============================================================================

/// Default number of snapshots kept
pub const HISTORY_LIMIT: usize = 50;

/// Smallest capacity a history accepts
pub const MIN_HISTORY_LIMIT: usize = 1;

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Diagram>,
    /// Position of the last undoable entry, `-1` when nothing can be undone
    cursor: isize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            capacity: capacity.max(MIN_HISTORY_LIMIT),
        }
    }

    /// Record the state a mutation is about to replace.
    ///
    /// Drops every redo entry past the cursor, then evicts the oldest entry
    /// when the capacity is exceeded.
    pub fn record(&mut self, snapshot: Diagram) {
        self.entries.truncate((self.cursor + 1) as usize);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() as isize - 1;
        tracing::trace!("History recorded, {} entries", self.entries.len());
    }

    /// Step back: the live diagram takes the entry at the cursor and the
    /// entry keeps the state being left, so redo can restore it
    pub fn undo(&mut self, live: &mut Diagram) -> bool {
        if !self.can_undo() {
            return false;
        }
        std::mem::swap(&mut self.entries[self.cursor as usize], live);
        self.cursor -= 1;
        tracing::debug!("Undo, cursor at {}", self.cursor);
        true
    }

    pub fn redo(&mut self, live: &mut Diagram) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        std::mem::swap(&mut self.entries[self.cursor as usize], live);
        tracing::debug!("Redo, cursor at {}", self.cursor);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len() as isize - 1
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = -1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position in `[-1, len - 1]`
    pub fn index(&self) -> isize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
