// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Snapshot-based undo/redo stacks.
//!
//! Each entry is a full copy of the state taken *before* an edit. Undo
//! swaps the caller's current state onto the redo stack and hands back the
//! previous snapshot; redo does the mirror image. Recording a new edit
//! discards the redo stack.

use std::collections::VecDeque;

/// Default number of undo groups kept before the oldest is dropped
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Undo/redo history for a cloneable state
#[derive(Debug, Clone)]
pub struct UndoState<T> {
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    max_depth: usize,
}

impl<T> UndoState<T> {
    /// Create an empty history with the default depth
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create an empty history keeping at most `max_depth` undo groups
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state from before an edit as a new undo group
    pub fn add_undo_group(&mut self, snapshot: T) {
        if self.undo_stack.len() == self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
    }

    /// Step back: returns the previous state, stashing `current` for redo
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward: returns the next state, stashing `current` for undo
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T> Default for UndoState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_cycle() {
        let mut undo = UndoState::new();
        let mut state = 1;

        undo.add_undo_group(state);
        state = 2;
        undo.add_undo_group(state);
        state = 3;

        state = undo.undo(state).unwrap();
        assert_eq!(state, 2);
        state = undo.undo(state).unwrap();
        assert_eq!(state, 1);
        assert!(undo.undo(state).is_none());

        state = undo.redo(state).unwrap();
        assert_eq!(state, 2);
        state = undo.redo(state).unwrap();
        assert_eq!(state, 3);
        assert!(!undo.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut undo = UndoState::new();
        undo.add_undo_group("a");
        let restored = undo.undo("b").unwrap();
        assert_eq!(restored, "a");
        assert!(undo.can_redo());

        undo.add_undo_group("a");
        assert!(!undo.can_redo());
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut undo = UndoState::with_max_depth(2);
        undo.add_undo_group(1);
        undo.add_undo_group(2);
        undo.add_undo_group(3);

        assert_eq!(undo.undo(4), Some(3));
        assert_eq!(undo.undo(3), Some(2));
        assert_eq!(undo.undo(2), None);
    }
}
