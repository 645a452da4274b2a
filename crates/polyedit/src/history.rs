//! Bounded linear undo/redo over immutable snapshots.
//!
//! Invariants
//! - `entries` is never empty once constructed; `index < entries.len()`.
//! - Undo is available iff `index > 0`, redo iff `index < len - 1`.
//! - A push after undo drops every entry past `index`.
//! - Depth is capped at `limit` (≥ 1); the oldest entries are dropped first.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    index: usize,
    limit: usize,
}

impl<T: Clone> History<T> {
    /// Start with `initial` as the only (current) entry.
    pub fn new(initial: T, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.clamp(1, 64));
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.index = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_and_branch_truncation() {
        let mut h = History::new("init", 10);
        assert!(!h.can_undo() && !h.can_redo());
        h.push("A");
        h.push("B");
        assert_eq!(h.undo(), Some(&"A"));
        assert_eq!(h.redo(), Some(&"B"));
        assert_eq!(h.redo(), None);
        h.undo();
        h.push("C");
        assert!(!h.can_redo());
        assert_eq!(h.redo(), None);
        assert_eq!(*h.current(), "C");
        assert_eq!(h.undo(), Some(&"A"));
        assert_eq!(h.undo(), Some(&"init"));
        assert_eq!(h.undo(), None);
        assert_eq!(*h.current(), "init");
    }

    #[test]
    fn depth_is_capped() {
        let mut h = History::new(0, 3);
        for v in 1..=5 {
            h.push(v);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(*h.current(), 5);
        assert_eq!(h.undo(), Some(&4));
        assert_eq!(h.undo(), Some(&3));
        assert_eq!(h.undo(), None);
    }

    #[test]
    fn zero_limit_keeps_current() {
        let mut h = History::new(1, 0);
        h.push(2);
        assert_eq!(h.len(), 1);
        assert_eq!(*h.current(), 2);
        h.reset(9);
        assert_eq!((*h.current(), h.index()), (9, 0));
    }
}
