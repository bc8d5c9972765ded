// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid selection: the set of glyph indices highlighted in the viewer.
//!
//! `GlyphSelection` wraps an `Arc<BTreeSet<usize>>` so snapshots are cheap
//! to clone and iteration is always ascending, which is the order every
//! multi-glyph operation (move, paste, renumber) expects.

use std::collections::BTreeSet;
use std::sync::Arc;

/// A set of selected glyph indices, iterated in ascending order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphSelection {
    inner: Arc<BTreeSet<usize>>,
}

impl GlyphSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from any list of indices (duplicates collapse)
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self {
            inner: Arc::new(indices.into_iter().collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.inner.contains(&index)
    }

    /// Lowest selected index
    pub fn first(&self) -> Option<usize> {
        self.inner.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.inner.iter().copied()
    }

    /// Selected indices in ascending order
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    pub fn insert(&mut self, index: usize) {
        Arc::make_mut(&mut self.inner).insert(index);
    }

    pub fn remove(&mut self, index: usize) {
        Arc::make_mut(&mut self.inner).remove(&index);
    }

    /// Toggle an index in or out (shift-click)
    pub fn toggle(&mut self, index: usize) {
        if self.contains(index) {
            self.remove(index);
        } else {
            self.insert(index);
        }
    }

    /// Drop indices that no longer exist in a list of `len` glyphs
    pub fn retain_below(&mut self, len: usize) {
        if self.inner.iter().any(|&i| i >= len) {
            Arc::make_mut(&mut self.inner).retain(|&i| i < len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_selection_is_empty() {
        let sel = GlyphSelection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert_eq!(sel.first(), None);
    }

    #[test]
    fn from_indices_sorts_and_dedups() {
        let sel = GlyphSelection::from_indices([5, 1, 3, 1]);
        assert_eq!(sel.to_vec(), vec![1, 3, 5]);
        assert_eq!(sel.first(), Some(1));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = GlyphSelection::new();
        sel.toggle(4);
        assert!(sel.contains(4));
        sel.toggle(4);
        assert!(!sel.contains(4));
    }

    #[test]
    fn clone_is_independent() {
        let mut sel = GlyphSelection::from_indices([1]);
        let mut clone = sel.clone();
        clone.insert(2);
        sel.remove(1);

        assert!(sel.is_empty());
        assert_eq!(clone.to_vec(), vec![1, 2]);
    }

    #[test]
    fn retain_below_drops_stale_indices() {
        let mut sel = GlyphSelection::from_indices([0, 2, 9]);
        sel.retain_below(3);
        assert_eq!(sel.to_vec(), vec![0, 2]);
    }
}
