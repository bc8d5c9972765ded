// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Events the view layer sends to the controller.
//!
//! There are three sources: the glyph grid (`ViewerEvent`), the project
//! list (`ProjectEvent`) and application-wide shortcuts and diagnostics
//! (`ProgramEvent`). Font document events come from `FontManager` itself.

use crate::model::FontError;
use crate::project::ProjectId;

/// Events raised by the glyph grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Replace the grid selection
    Select(Vec<usize>),
    Delete(Vec<usize>),
    /// Open a glyph in the editor
    Edit(usize),
    Copy(Vec<usize>),
    Cut(Vec<usize>),
    /// Paste the clipboard onto the selection
    Paste,
    Undo,
    Redo,
    /// Set side bearings of the selection
    AdjustPos,
    /// Transform the selected outlines
    AdjustGlyph,
    /// Edit name, codepoints and bearings of the first selected glyph
    SettingFont,
    FindGlyph,
    DownloadGlyph(Vec<usize>),
    SettingUnicode,
    SettingOsGame,
    /// Edit the open project's sync configuration
    SettingSync,
    Refresh,
    MoveLeft,
    MoveRight,
    /// Show a page (1-based)
    PageChange(usize),
}

/// Events raised by the project list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    Open(ProjectId),
    /// Save the open font as a new project
    SaveAs,
    Sync(ProjectId),
    Delete(ProjectId),
}

/// How a save request should be routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveType {
    /// Save the editing glyph (if any) and then the project
    Force,
    /// Save only the editing glyph
    Editor,
    /// Save the project, or the editing glyph while the editor is active
    Normal,
}

/// Function keys handled by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKey {
    /// Toggle the editor panel
    F2,
    /// TrueType preview
    F3,
    /// WOFF preview
    F4,
}

/// Application-wide events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramEvent {
    Save(SaveType),
    Paste,
    Function(FunctionKey),
    FontError(FontError),
}
