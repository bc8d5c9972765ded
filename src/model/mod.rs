// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Font data model

pub mod font_manager;
pub mod glyph_ops;
pub mod workspace;

pub use font_manager::{ChangeKind, FontError, FontEvent, FontManager};
pub use workspace::{Glyph, Workspace};
