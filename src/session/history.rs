//! Bounded undo/redo history of transforms.

use std::collections::VecDeque;

use crate::foundation::core::Transform;

/// Snapshots of every committed transform plus a cursor.
///
/// The cursor always points at a valid entry; the entry under it is the current transform.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformHistory {
    entries: VecDeque<Transform>,
    index: usize,
}

impl Default for TransformHistory {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl TransformHistory {
    pub const MAX_LEN: usize = 50;

    pub fn new(initial: Transform) -> Self {
        Self {
            entries: VecDeque::from([initial]),
            index: 0,
        }
    }

    pub fn current(&self) -> Transform {
        self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Transform> {
        self.entries.iter()
    }

    /// Commit `transform` after the cursor. Returns `false` when it equals the current entry.
    pub fn push(&mut self, transform: Transform) -> bool {
        if transform == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push_back(transform);
        while self.entries.len() > Self::MAX_LEN {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        true
    }

    pub fn undo(&mut self) -> Option<Transform> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<Transform> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/history.rs"]
mod tests;
