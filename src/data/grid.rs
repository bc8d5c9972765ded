// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph grid operations for AppState: paging, selection, moves and search

use super::{AppState, Focus, Redraw};
use crate::dialogs::Warning;
use crate::editing::{GlyphSelection, ShiftDirection};
use crate::host::Host;
use crate::model::FontError;

impl AppState {
    /// Total number of grid pages for the current font (at least one)
    pub fn total_pages(&self) -> usize {
        self.font.glyph_count().div_ceil(self.page_size()).max(1)
    }

    /// Page (1-based) that holds the glyph at `index`
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size() + 1
    }

    /// Show a page of the grid, optionally replacing the selection.
    ///
    /// The page is clamped to the valid range. The pager is only shown
    /// when the font has more glyphs than fit on one page.
    pub fn show_page(&mut self, page: usize, selection: Option<Vec<usize>>) {
        let count = self.font.glyph_count();
        let page_size = self.page_size();
        let total = self.total_pages();
        let page = page.clamp(1, total);

        self.viewer.page = page;
        let start = (page - 1) * page_size;
        self.viewer.shown = start.min(count)..(start + page_size).min(count);

        if let Some(selection) = selection {
            self.viewer.selection = GlyphSelection::from_indices(selection);
        }
        self.viewer.selection.retain_below(count);
        self.viewer.redraw = Some(Redraw::Page);
        self.focus = Focus::Viewer;

        self.pager.visible = count > page_size;
        self.pager.page = page;
        self.pager.total_pages = total;
    }

    /// Replace the grid selection, ignoring indices past the end
    pub(super) fn select(&mut self, list: Vec<usize>) {
        let count = self.font.glyph_count();
        self.viewer.selection =
            GlyphSelection::from_indices(list.into_iter().filter(|&i| i < count));
    }

    pub(super) fn delete_glyphs(&mut self, list: &[usize]) {
        if list.is_empty() {
            return;
        }
        self.font.remove_glyphs(list);
    }

    /// Arrow keys: cycle the editing glyph while the editor is shown,
    /// otherwise move the selected glyphs.
    pub(super) fn move_left_right(&mut self, host: &mut dyn Host, direction: ShiftDirection) {
        if self.editor.visible {
            self.step_editing_glyph(host, direction);
            return;
        }
        if self.viewer.selection.is_empty() {
            return;
        }
        let outcome = self
            .font
            .move_glyphs(&self.viewer.selection.to_vec(), direction);
        if outcome.moved() {
            self.viewer.selection = GlyphSelection::from_indices(outcome.selection);
        }
    }

    pub(super) fn find_glyph(&mut self, host: &mut dyn Host) {
        let Some(query) = host.find_glyph_dialog() else {
            return;
        };
        let found = self.font.find_glyphs(&query);
        match found.first() {
            Some(&first) => {
                tracing::debug!("Found {} glyphs", found.len());
                let page = self.page_of(first);
                self.show_page(page, Some(found));
            }
            None => host.warn(Warning::NoMatchingGlyph),
        }
    }

    /// Show the glyphs a font error refers to, selected
    pub(super) fn notify_error(&mut self, error: &FontError) {
        tracing::warn!("Font error: {}", error);
        let glyphs = error.glyphs();
        if let Some(&first) = glyphs.first() {
            let page = self.page_of(first);
            self.show_page(page, Some(glyphs.to_vec()));
        }
    }

    /// Check the document after a codepoint edit and surface problems
    pub(super) fn check_font(&mut self) {
        if let Err(error) = self.font.check_codepoints() {
            self.notify_error(&error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{app_with, names};
    use super::*;
    use crate::dialogs::FindQuery;
    use crate::events::{ProgramEvent, ViewerEvent};
    use crate::host::testing::ScriptedHost;

    fn small_pages(letters: &str, page_size: usize) -> AppState {
        let mut app = app_with(letters);
        app.settings.viewer.page_size = page_size;
        app.show_page(1, None);
        app
    }

    #[test]
    fn test_paging_clamps_and_toggles_pager() {
        let mut app = small_pages("abcdefg", 3);
        assert!(app.pager.visible);
        assert_eq!(app.pager.total_pages, 3);

        app.show_page(9, None);
        assert_eq!(app.viewer.page, 3);
        assert_eq!(app.viewer.shown, 6..8);

        app.show_page(0, None);
        assert_eq!(app.viewer.page, 1);
        assert_eq!(app.viewer.shown, 0..3);

        app.settings.viewer.page_size = 100;
        app.show_page(1, None);
        assert!(!app.pager.visible);
    }

    #[test]
    fn test_move_selection_right_and_back() {
        let mut app = app_with("abcde");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Select(vec![2, 4]));
        app.handle_viewer_event(&mut host, ViewerEvent::MoveLeft);
        assert_eq!(names(&app), vec![".notdef", "b", "a", "d", "c", "e"]);
        assert_eq!(app.viewer.selection.to_vec(), vec![1, 3]);
        assert_eq!(app.viewer.redraw, Some(Redraw::Ranges(vec![1..3, 3..5])));

        app.handle_viewer_event(&mut host, ViewerEvent::MoveRight);
        assert_eq!(names(&app), vec![".notdef", "a", "b", "c", "d", "e"]);
        assert_eq!(app.viewer.selection.to_vec(), vec![2, 4]);
    }

    #[test]
    fn test_blocked_move_keeps_selection() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Select(vec![1, 2]));
        app.handle_viewer_event(&mut host, ViewerEvent::MoveRight);
        assert_eq!(app.viewer.selection.to_vec(), vec![1, 2]);
        assert!(!app.font.is_changed());
    }

    #[test]
    fn test_select_drops_out_of_range() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Select(vec![2, 7]));
        assert_eq!(app.viewer.selection.to_vec(), vec![2]);
    }

    #[test]
    fn test_find_shows_page_of_first_match() {
        let mut app = small_pages("abcdefg", 3);
        let mut host = ScriptedHost {
            find: Some(FindQuery::Unicode(vec!['g', 'e'])),
            ..ScriptedHost::default()
        };
        app.handle_viewer_event(&mut host, ViewerEvent::FindGlyph);
        // 'e' is at index 5, the last slot of page 2
        assert_eq!(app.viewer.page, 2);
        assert_eq!(app.viewer.selection.to_vec(), vec![5, 7]);
    }

    #[test]
    fn test_find_first_glyph_of_page() {
        let mut app = small_pages("abcdefg", 3);
        let mut host = ScriptedHost {
            find: Some(FindQuery::Name("c".to_string())),
            ..ScriptedHost::default()
        };
        app.handle_viewer_event(&mut host, ViewerEvent::FindGlyph);
        assert_eq!(app.viewer.page, 2);
    }

    #[test]
    fn test_find_without_match_warns() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost {
            find: Some(FindQuery::Name("zz".to_string())),
            ..ScriptedHost::default()
        };
        app.handle_viewer_event(&mut host, ViewerEvent::FindGlyph);
        assert_eq!(host.warnings, vec![Warning::NoMatchingGlyph]);
    }

    #[test]
    fn test_font_error_selects_duplicates() {
        let mut app = small_pages("abcdefg", 3);
        let mut host = ScriptedHost::default();
        app.handle_program_event(
            &mut host,
            ProgramEvent::FontError(FontError::DuplicateCodepoint {
                glyphs: vec![4, 7],
            }),
        );
        assert_eq!(app.viewer.page, 2);
        assert_eq!(app.viewer.selection.to_vec(), vec![4, 7]);
    }

    #[test]
    fn test_delete_clears_stale_selection() {
        let mut app = app_with("abc");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Select(vec![3]));
        app.handle_viewer_event(&mut host, ViewerEvent::Delete(vec![1, 2]));
        assert_eq!(names(&app), vec![".notdef", "c"]);
        assert!(app.viewer.selection.is_empty());
    }
}
