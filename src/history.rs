//! Linear undo/redo over immutable snapshots.
//!
//! The history is a single timeline: pushing after an undo discards the redo
//! tail. Snapshots are whole tree values, so no inverse operation is needed
//! for any edit. Workflow snapshots share unchanged subtrees with each other,
//! which keeps a full timeline cheap.

use std::collections::VecDeque;

/// Default bound on the number of retained snapshots.
pub const MAX_HISTORY: usize = 50;

/// Bounded snapshot timeline with a cursor on the current snapshot.
#[derive(Debug, Clone)]
pub struct History<S> {
    snapshots: VecDeque<S>,
    /// Index of the current snapshot
    cursor: usize,
    /// Maximum number of snapshots to keep
    max_snapshots: usize,
}

impl<S> History<S> {
    /// Starts a timeline holding only `initial`.
    pub fn new(initial: S) -> Self {
        Self::with_capacity(initial, MAX_HISTORY)
    }

    /// Starts a timeline holding only `initial`, keeping at most
    /// `max_snapshots` entries (at least one).
    pub fn with_capacity(initial: S, max_snapshots: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            max_snapshots: max_snapshots.max(1),
        }
    }

    /// Makes `snapshot` current.
    ///
    /// Drops every snapshot after the cursor, appends, and evicts the oldest
    /// entry when over the bound. The cursor keeps pointing at `snapshot`.
    pub fn push(&mut self, snapshot: S) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);
        self.cursor = self.snapshots.len() - 1;

        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
        log::trace!(
            "History push: cursor {} of {} snapshot(s)",
            self.cursor,
            self.snapshots.len()
        );
    }

    /// Moves back one snapshot. Returns `false` at the beginning.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Moves forward one snapshot. Returns `false` at the end.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &S {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained snapshots; never zero.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_snapshots
    }

    /// Drops every snapshot and starts over from `initial`.
    pub fn reset(&mut self, initial: S) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.cursor = 0;
    }
}
