// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing primitives: selection, reordering and undo history

pub mod edit_types;
pub mod selection;
pub mod shift;
pub mod undo;

pub use edit_types::EditType;
pub use selection::GlyphSelection;
pub use shift::{ShiftDirection, ShiftOutcome, shift_selection};
pub use undo::UndoState;
