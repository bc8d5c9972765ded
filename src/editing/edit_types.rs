// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit types for undo grouping

/// Type of edit being recorded in the font history
///
/// Used to decide whether an edit opens a new undo group or folds into
/// the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// Normal edit (always creates a new undo group)
    Normal,

    /// Glyph reorder from the arrow keys. Reorders arriving within the
    /// history debounce window share one undo group.
    Reorder,
}

impl EditType {
    /// Whether two consecutive edits of these types may share a group
    pub fn coalesces_with(self, previous: EditType) -> bool {
        self == EditType::Reorder && previous == EditType::Reorder
    }
}
