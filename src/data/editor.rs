// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor panel management for AppState

use super::{AppState, Focus, ViewerMode};
use crate::dialogs::Prompt;
use crate::editing::ShiftDirection;
use crate::host::Host;
use crate::model::glyph_ops;
use crate::model::workspace::{Contour, Glyph};

/// A glyph loaded in the editor panel.
///
/// The editor works on a clone; edits reach the font only when the glyph
/// is saved back.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    pub glyph: Glyph,
    /// Edited since it was loaded or last saved
    pub changed: bool,
}

impl EditorSession {
    pub fn new(glyph: Glyph) -> Self {
        Self {
            glyph,
            changed: false,
        }
    }

    /// Replace the edited glyph
    pub fn set_glyph(&mut self, glyph: Glyph) {
        self.glyph = glyph;
        self.changed = true;
    }

    pub fn set_width(&mut self, width: f64) {
        self.glyph.width = width;
        self.changed = true;
    }

    /// Add outlines to the edited glyph
    pub fn add_contours(&mut self, contours: impl IntoIterator<Item = Contour>) {
        self.glyph.contours.extend(contours);
        self.changed = true;
    }
}

impl AppState {
    /// Show the editor panel, loading the glyph at `index` if given.
    ///
    /// Compound glyphs are decomposed into the editor after confirmation;
    /// the glyph in the font keeps its components.
    pub fn show_editor(&mut self, host: &mut dyn Host, index: Option<usize>) {
        let Some(font) = self.font.get() else {
            return;
        };
        self.viewer.mode = ViewerMode::Editor;
        if !self.editor.visible {
            self.editor.visible = true;
            self.splitter.enabled = true;
            tracing::debug!("Editor shown");
        }
        self.editor.options = Some(font.editing_options());

        let Some(glyph) = index.and_then(|i| font.get_glyph(i)) else {
            return;
        };
        let glyph = if glyph.is_compound() {
            if !host.confirm(Prompt::DecomposeCompound) {
                return;
            }
            glyph_ops::decompose(glyph, font)
        } else {
            glyph.clone()
        };
        tracing::info!("Editing glyph '{}'", glyph.name);
        self.editor.session = Some(EditorSession::new(glyph));
    }

    /// Hide the editor panel and return to the plain grid
    pub fn hide_editor(&mut self) {
        self.editor.visible = false;
        self.splitter.enabled = false;
        self.viewer.editing = None;
        self.viewer.mode = ViewerMode::List;
        self.focus = Focus::Viewer;
        tracing::debug!("Editor hidden");
    }

    /// Open a glyph from the grid
    pub(super) fn edit_glyph(&mut self, host: &mut dyn Host, index: usize) {
        if self.viewer.editing == Some(index) {
            self.show_editor(host, None);
            return;
        }
        if self.editor.is_changed() && !host.confirm(Prompt::DiscardGlyphChanges) {
            return;
        }
        self.viewer.editing = Some(index);
        self.show_editor(host, Some(index));
    }

    /// Open the previous or next glyph, wrapping around at either end
    pub(super) fn step_editing_glyph(&mut self, host: &mut dyn Host, direction: ShiftDirection) {
        let count = self.font.glyph_count();
        if count == 0 {
            return;
        }
        let target = match (direction, self.viewer.editing) {
            (ShiftDirection::Left, Some(i)) if i > 0 => i - 1,
            (ShiftDirection::Left, _) => count - 1,
            (ShiftDirection::Right, Some(i)) if i + 1 < count => i + 1,
            (ShiftDirection::Right, _) => 0,
        };
        if self.editor.is_changed() && !host.confirm(Prompt::DiscardGlyphChanges) {
            return;
        }
        self.viewer.editing = Some(target);
        self.show_editor(host, Some(target));
    }

    /// Write the editor's glyph back to the font.
    ///
    /// Without an editing index the glyph is added as a new glyph, which
    /// then becomes the editing glyph.
    pub(super) fn save_editing_glyph(&mut self) {
        let Some(session) = &mut self.editor.session else {
            return;
        };
        let glyph = session.glyph.clone();
        session.changed = false;

        let replaced = match self.viewer.editing {
            Some(index) => self.font.replace_glyph(glyph.clone(), index),
            None => false,
        };
        if !replaced {
            self.viewer.editing = self.font.insert_glyph(glyph);
        }
    }

    /// Drag the splitter by `delta`. The editor never gets narrower than
    /// the configured minimum.
    pub fn resize_editor(&mut self, delta: f64) -> bool {
        if !self.splitter.enabled {
            return false;
        }
        let width = self.editor.width + delta;
        if width > self.settings.editor.min_width {
            self.editor.width = width;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::app_with;
    use super::*;
    use crate::events::{ProgramEvent, SaveType, ViewerEvent};
    use crate::host::testing::ScriptedHost;
    use crate::model::workspace::Component;

    #[test]
    fn test_edit_loads_clone_and_shows_editor() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(2));
        assert!(app.editor.is_editing());
        assert_eq!(app.viewer.editing, Some(2));
        assert_eq!(app.viewer.mode, ViewerMode::Editor);
        assert_eq!(app.editor.session.as_ref().unwrap().glyph.name, "b");
        let options = app.editor.options.as_ref().unwrap();
        assert_eq!(options.units_per_em, 1000.0);
    }

    #[test]
    fn test_switching_glyph_asks_to_discard() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(1));
        app.editor.session.as_mut().unwrap().set_width(1.0);

        host.confirms.push_back(false);
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(2));
        assert_eq!(host.prompts, vec![Prompt::DiscardGlyphChanges]);
        assert_eq!(app.viewer.editing, Some(1));

        // Same glyph again only re-shows the editor
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(1));
        assert_eq!(host.prompts.len(), 1);
        assert!(app.editor.is_changed());
    }

    #[test]
    fn test_navigation_wraps_around() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(0));

        app.handle_viewer_event(&mut host, ViewerEvent::MoveLeft);
        assert_eq!(app.viewer.editing, Some(2));
        app.handle_viewer_event(&mut host, ViewerEvent::MoveRight);
        assert_eq!(app.viewer.editing, Some(0));
        app.handle_viewer_event(&mut host, ViewerEvent::MoveRight);
        assert_eq!(app.viewer.editing, Some(1));
        assert_eq!(app.editor.session.as_ref().unwrap().glyph.name, "a");

        // Navigation never reorders glyphs
        assert!(!app.font.is_changed());
    }

    #[test]
    fn test_compound_glyph_needs_confirmation() {
        let mut app = app_with("a");
        let mut font = app.font.get().unwrap().clone();
        let mut compound = Glyph::new("a.alt", 500.0);
        compound.components.push(Component {
            base: "a".to_string(),
            transform: kurbo::Affine::translate((10.0, 0.0)),
        });
        font.glyphs.push(compound);
        app.font.set(font);
        app.process_font_events();

        let mut host = ScriptedHost::default();
        host.confirms.push_back(false);
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(2));
        assert!(app.editor.session.is_none());

        app.handle_viewer_event(&mut host, ViewerEvent::MoveRight);
        let session = app.editor.session.as_ref().unwrap();
        // Wrapped to .notdef; go back to the compound and accept
        assert_eq!(session.glyph.name, ".notdef");
        app.handle_viewer_event(&mut host, ViewerEvent::MoveLeft);
        let session = app.editor.session.as_ref().unwrap();
        assert!(!session.glyph.is_compound());
        assert_eq!(session.glyph.contours.len(), 1);
        assert!(app.font.get().unwrap().glyphs[2].is_compound());
    }

    #[test]
    fn test_hidden_editor_glyph_saves_as_new() {
        let mut app = app_with("a");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(1));
        app.hide_editor();
        assert_eq!(app.viewer.editing, None);

        app.show_editor(&mut host, None);
        app.handle_program_event(&mut host, ProgramEvent::Save(SaveType::Editor));
        let names = app.font.get().unwrap().glyph_names();
        assert_eq!(names, vec![".notdef", "a", "a.1"]);
        assert_eq!(app.viewer.editing, Some(2));
    }

    #[test]
    fn test_splitter_respects_minimum_width() {
        let mut app = app_with("a");
        let mut host = ScriptedHost::default();
        assert!(!app.resize_editor(50.0));

        app.show_editor(&mut host, None);
        assert!(app.resize_editor(-150.0));
        assert_eq!(app.editor.width, 450.0);
        assert!(!app.resize_editor(-50.0));
        assert_eq!(app.editor.width, 450.0);
        assert!(app.resize_editor(100.0));
        assert_eq!(app.editor.width, 550.0);
    }
}
