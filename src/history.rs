use crate::config::MAX_UNDO;
use crate::map::{visible_gid, CellStack, Gid};
use log::{debug, trace};
use std::collections::VecDeque;

/// Before/after stacks of one edited cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Stack before the edit.
    pub old: CellStack,
    /// Stack after the edit.
    pub new: CellStack,
}

impl CellChange {
    /// Change of the cell at `(x, y)`.
    pub fn new(x: u32, y: u32, old: CellStack, new: CellStack) -> Self {
        CellChange { x, y, old, new }
    }

    /// Visible GID before the edit.
    #[inline]
    pub fn old_value(&self) -> Gid {
        visible_gid(&self.old)
    }

    /// Visible GID after the edit.
    #[inline]
    pub fn new_value(&self) -> Gid {
        visible_gid(&self.new)
    }
}

/// All cells touched by one edit on one layer. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDelta {
    layer_index: usize,
    changes: Vec<CellChange>,
}

impl HistoryDelta {
    /// Bundle `changes` made on `layer_index`.
    pub fn new(layer_index: usize, changes: Vec<CellChange>) -> Self {
        HistoryDelta {
            layer_index,
            changes,
        }
    }

    /// Layer every change belongs to.
    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    /// Cell changes in the order they were made.
    pub fn changes(&self) -> &[CellChange] {
        &self.changes
    }
}

/// Bounded undo/redo log.
///
/// Past `capacity` entries the oldest undo step is dropped for good. A fresh
/// push always discards the redo stack, so there are no branching timelines.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<HistoryDelta>,
    redo: Vec<HistoryDelta>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO)
    }
}

impl History {
    /// History holding up to [`MAX_UNDO`] steps.
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `capacity` undo steps.
    pub fn with_capacity(capacity: usize) -> Self {
        History {
            undo: VecDeque::with_capacity(capacity.min(MAX_UNDO) + 1),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Maximum number of undo steps kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new edit. Evicts the oldest step when full and clears redo.
    pub fn push(&mut self, delta: HistoryDelta) {
        trace!(
            "history push: layer {} with {} changes",
            delta.layer_index,
            delta.changes.len()
        );
        self.undo.push_back(delta);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
            debug!("history full, evicted oldest undo step");
        }
        self.redo.clear();
    }

    /// Move the newest step to the redo stack and return it. The caller
    /// restores its old values onto the map.
    pub fn undo(&mut self) -> Option<&HistoryDelta> {
        let Some(delta) = self.undo.pop_back() else {
            debug!("nothing to undo");
            return None;
        };
        self.redo.push(delta);
        self.redo.last()
    }

    /// Move the newest undone step back and return it. The caller
    /// re-applies its new values.
    pub fn redo(&mut self) -> Option<&HistoryDelta> {
        let Some(delta) = self.redo.pop() else {
            debug!("nothing to redo");
            return None;
        };
        self.undo.push_back(delta);
        self.undo.back()
    }

    /// Whether an undo step exists.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step exists.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps held.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps held.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Oldest-first view of the undo stack.
    pub fn undo_steps(&self) -> impl Iterator<Item = &HistoryDelta> {
        self.undo.iter()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
