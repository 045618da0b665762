//! Bounded undo/redo history over markup snapshots.
//!
//! The history stores whole-document snapshots and a cursor. It holds no
//! tree state: callers feed the text returned by [`UndoRedoHistory::undo`]
//! and [`UndoRedoHistory::redo`] back through the markup parser.
//!
//! Recording after an undo does not truncate the entries beyond the cursor;
//! the new snapshot is appended after them and becomes current.

use std::collections::VecDeque;
use std::sync::Arc;

use horizon_designer_core::logging::targets;

use crate::config::HistoryDedupe;

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// Undo/redo availability, emitted whenever it may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Snapshot ring with a cursor.
#[derive(Debug, Clone)]
pub struct UndoRedoHistory {
    entries: VecDeque<Arc<str>>,
    cursor: usize,
    capacity: usize,
    dedupe: HistoryDedupe,
}

impl Default for UndoRedoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, HistoryDedupe::default())
    }
}

impl UndoRedoHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize, dedupe: HistoryDedupe) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity,
            dedupe,
        }
    }

    fn repeats_last(&self, snapshot: &Arc<str>) -> bool {
        let Some(last) = self.entries.back() else {
            return false;
        };
        match self.dedupe {
            HistoryDedupe::Identity => Arc::ptr_eq(last, snapshot),
            HistoryDedupe::Value => last == snapshot,
        }
    }

    /// Record a snapshot. Returns `false` if it repeated the last entry and
    /// was skipped.
    pub fn record(&mut self, snapshot: Arc<str>) -> bool {
        if self.repeats_last(&snapshot) {
            tracing::trace!(target: targets::HISTORY, "snapshot repeats last entry, skipped");
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
        self.cursor = self.entries.len() - 1;
        tracing::debug!(target: targets::HISTORY, len = self.entries.len(), cursor = self.cursor, "recorded snapshot");
        true
    }

    /// Step back one snapshot and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Arc<str>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!(target: targets::HISTORY, cursor = self.cursor, "undo");
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward one snapshot and return it, or `None` at the newest
    /// entry.
    pub fn redo(&mut self) -> Option<Arc<str>> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!(target: targets::HISTORY, cursor = self.cursor, "redo");
        self.entries.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&Arc<str>> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    #[test]
    fn test_empty_history_degrades_to_noop() {
        let mut history = UndoRedoHistory::default();
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = UndoRedoHistory::default();
        for i in 0..25 {
            assert!(history.record(snap(&format!("s{i}"))));
        }
        assert_eq!(history.len(), 20);
        assert_eq!(history.entries().next().map(|s| &**s), Some("s5"));
        assert_eq!(history.cursor(), 19);

        let mut undone = 0;
        while history.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, 19);
        assert_eq!(history.current().map(|s| &**s), Some("s5"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = UndoRedoHistory::default();
        history.record(snap("a"));
        history.record(snap("b"));
        history.record(snap("c"));

        assert_eq!(history.undo().as_deref(), Some("b"));
        assert_eq!(history.undo().as_deref(), Some("a"));
        assert_eq!(history.state(), HistoryState { can_undo: false, can_redo: true });
        assert_eq!(history.redo().as_deref(), Some("b"));
        assert_eq!(history.redo().as_deref(), Some("c"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_identity_dedupe_only_skips_same_allocation() {
        let mut history = UndoRedoHistory::new(20, HistoryDedupe::Identity);
        let s = snap("<View/>");
        assert!(history.record(s.clone()));
        assert!(!history.record(s));
        assert!(history.record(snap("<View/>")));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_value_dedupe_skips_equal_text() {
        let mut history = UndoRedoHistory::new(20, HistoryDedupe::Value);
        assert!(history.record(snap("<View/>")));
        assert!(!history.record(snap("<View/>")));
        assert!(history.record(snap("<Button/>")));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_record_after_undo_appends() {
        let mut history = UndoRedoHistory::default();
        history.record(snap("a"));
        history.record(snap("b"));
        history.undo();
        history.record(snap("c"));
        let all: Vec<&str> = history.entries().map(|s| &**s).collect();
        assert_eq!(all, vec!["a", "b", "c"]);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = UndoRedoHistory::new(0, HistoryDedupe::Value);
        history.record(snap("a"));
        history.record(snap("b"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().map(|s| &**s), Some("b"));
    }
}
