// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Central application state (`AppState`), the controller of the editor.
//!
//! `AppState` owns the font manager, the project store and the state of
//! every view surface (grid viewer, pager, editor panel, splitter). Hosts
//! feed it events; each handler mutates the document through
//! `FontManager` and then `process_font_events` brings the views up to
//! date. Sub-modules split the methods by domain: grid paging and moves,
//! editor lifecycle, clipboard, dialog-driven glyph settings, and file and
//! project I/O.

mod clipboard;
mod editor;
mod file_io;
mod glyph_settings;
mod grid;

pub use clipboard::GlyphClipboard;
pub use editor::EditorSession;

use std::ops::Range;

use crate::dialogs::Prompt;
use crate::editing::{GlyphSelection, ShiftDirection};
use crate::events::{FunctionKey, ProgramEvent, ProjectEvent, SaveType, ViewerEvent};
use crate::host::{Host, PreviewFormat};
use crate::model::workspace::EditingOptions;
use crate::model::{ChangeKind, FontEvent, FontManager};
use crate::project::{ProjectId, ProjectStore, ProjectSummary};
use crate::settings::Settings;

/// How the grid viewer is presenting glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerMode {
    /// Plain glyph list
    List,
    /// Side panel next to an open editor
    Editor,
}

/// Which surface receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Viewer,
    Editor,
}

/// What the grid has to redraw after the last event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redraw {
    /// The whole current page
    Page,
    /// Only these glyph index ranges
    Ranges(Vec<Range<usize>>),
}

/// Glyph grid state
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub mode: ViewerMode,
    pub selection: GlyphSelection,
    /// Index of the glyph open in the editor
    pub editing: Option<usize>,
    /// Current page, 1-based
    pub page: usize,
    /// Glyph indices visible on the current page
    pub shown: Range<usize>,
    /// Set on the first font load
    pub inited: bool,
    pub redraw: Option<Redraw>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            mode: ViewerMode::List,
            selection: GlyphSelection::new(),
            editing: None,
            page: 1,
            shown: 0..0,
            inited: false,
            redraw: None,
        }
    }
}

/// Page navigation under the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagerState {
    pub visible: bool,
    pub page: usize,
    pub total_pages: usize,
}

/// Glyph editor panel
#[derive(Debug, Clone)]
pub struct EditorState {
    pub visible: bool,
    /// Glyph loaded in the editor; kept when the panel is hidden
    pub session: Option<EditorSession>,
    /// Guide lines derived from the font metrics
    pub options: Option<EditingOptions>,
    pub width: f64,
}

impl EditorState {
    /// The editor is showing a glyph
    pub fn is_editing(&self) -> bool {
        self.visible && self.session.is_some()
    }

    /// The loaded glyph has edits that were not written back
    pub fn is_changed(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.changed)
    }
}

/// Divider between the editor panel and the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitterState {
    /// Only live while the editor is shown
    pub enabled: bool,
}

/// Main application state
pub struct AppState {
    pub settings: Settings,

    /// The open font, its history and change events
    pub font: FontManager,

    pub viewer: ViewerState,
    pub pager: PagerState,
    pub editor: EditorState,
    pub splitter: SplitterState,
    pub focus: Focus,

    pub projects: Box<dyn ProjectStore>,
    /// Cached project list for display
    pub project_list: Vec<ProjectSummary>,
    /// Project the open font was loaded from or saved to
    pub project_id: Option<ProjectId>,

    /// Internal glyph clipboard
    pub clipboard: Option<GlyphClipboard>,

    /// Menu actions are disabled until a font is loaded
    pub menu_enabled: bool,

    /// When the project was last saved (formatted time string for display)
    pub last_saved: Option<String>,

    /// Error message to display, if any
    pub error_message: Option<String>,

    /// Whether the app should keep running
    pub running: bool,
}

impl AppState {
    pub fn new(settings: Settings, projects: Box<dyn ProjectStore>) -> Self {
        let project_list = projects.items();
        Self {
            font: FontManager::from_settings(&settings),
            viewer: ViewerState::default(),
            pager: PagerState::default(),
            editor: EditorState {
                visible: false,
                session: None,
                options: None,
                width: settings.editor.initial_width,
            },
            splitter: SplitterState::default(),
            focus: Focus::Viewer,
            projects,
            project_list,
            project_id: None,
            clipboard: None,
            menu_enabled: false,
            last_saved: None,
            error_message: None,
            running: true,
            settings,
        }
    }

    fn page_size(&self) -> usize {
        self.settings.viewer.page_size.max(1)
    }

    /// Prompt to show before quitting, if anything is unsaved
    pub fn confirm_exit(&self) -> Option<Prompt> {
        self.font
            .is_changed()
            .then_some(Prompt::DiscardProjectChanges)
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    pub fn handle_viewer_event(&mut self, host: &mut dyn Host, event: ViewerEvent) {
        tracing::debug!("Viewer event: {:?}", event);
        match event {
            ViewerEvent::Select(list) => self.select(list),
            ViewerEvent::Delete(list) => self.delete_glyphs(&list),
            ViewerEvent::Edit(index) => self.edit_glyph(host, index),
            ViewerEvent::Copy(list) => self.copy_glyphs(&list),
            ViewerEvent::Cut(list) => self.cut_glyphs(&list),
            ViewerEvent::Paste => self.paste_glyphs(),
            ViewerEvent::Undo => {
                self.font.undo();
            }
            ViewerEvent::Redo => {
                self.font.redo();
            }
            ViewerEvent::AdjustPos => self.adjust_pos(host),
            ViewerEvent::AdjustGlyph => self.adjust_glyph(host),
            ViewerEvent::SettingFont => self.setting_font(host),
            ViewerEvent::FindGlyph => self.find_glyph(host),
            ViewerEvent::DownloadGlyph(list) => self.download_glyph(host, &list),
            ViewerEvent::SettingUnicode => self.setting_unicode(host),
            ViewerEvent::SettingOsGame => self.setting_osgame(host),
            ViewerEvent::SettingSync => self.setting_sync(host),
            ViewerEvent::Refresh => {
                if self.font.is_loaded() {
                    self.show_page(1, None);
                }
            }
            ViewerEvent::MoveLeft => self.move_left_right(host, ShiftDirection::Left),
            ViewerEvent::MoveRight => self.move_left_right(host, ShiftDirection::Right),
            ViewerEvent::PageChange(page) => {
                if self.font.is_loaded() {
                    self.show_page(page, None);
                }
            }
        }
        self.process_font_events();
    }

    pub fn handle_project_event(&mut self, host: &mut dyn Host, event: ProjectEvent) {
        tracing::debug!("Project event: {:?}", event);
        match event {
            ProjectEvent::Open(id) => self.open_project(host, id),
            ProjectEvent::SaveAs => {
                self.project_id = None;
                self.save_project(host);
                self.focus = Focus::Viewer;
            }
            ProjectEvent::Sync(id) => self.sync_project(host, &id),
            ProjectEvent::Delete(id) => self.delete_project(host, &id),
        }
        self.process_font_events();
    }

    pub fn handle_program_event(&mut self, host: &mut dyn Host, event: ProgramEvent) {
        tracing::debug!("Program event: {:?}", event);
        match event {
            ProgramEvent::Save(save_type) => self.save(host, save_type),
            ProgramEvent::Paste => self.program_paste(),
            ProgramEvent::Function(FunctionKey::F2) => {
                if self.editor.visible {
                    self.hide_editor();
                } else {
                    self.show_editor(host, None);
                }
            }
            ProgramEvent::Function(key @ (FunctionKey::F3 | FunctionKey::F4)) => {
                let format = if key == FunctionKey::F3 {
                    PreviewFormat::Ttf
                } else {
                    PreviewFormat::Woff
                };
                if let Some(font) = self.font.get() {
                    host.preview(font, format);
                }
            }
            ProgramEvent::FontError(error) => self.notify_error(&error),
        }
        self.process_font_events();
    }

    /// Route a save request
    fn save(&mut self, host: &mut dyn Host, save_type: SaveType) {
        if !self.font.is_loaded() {
            return;
        }
        match save_type {
            SaveType::Force => {
                if self.editor.is_editing() {
                    self.save_editing_glyph();
                }
                self.save_project(host);
            }
            SaveType::Editor => {
                self.save_editing_glyph();
                self.focus = Focus::Editor;
            }
            SaveType::Normal if self.editor.is_editing() => {
                self.save_editing_glyph();
                self.focus = Focus::Editor;
            }
            SaveType::Normal => {
                self.save_project(host);
                self.focus = Focus::Viewer;
            }
        }
    }

    /// Bring the views up to date with queued font events
    pub fn process_font_events(&mut self) {
        for event in self.font.take_events() {
            match event {
                FontEvent::Set => {
                    if !self.viewer.inited {
                        self.viewer.mode = ViewerMode::List;
                        self.viewer.inited = true;
                    }
                    if !self.menu_enabled {
                        self.menu_enabled = true;
                    }
                    self.viewer.editing = None;
                    self.show_page(1, Some(Vec::new()));
                }
                FontEvent::Changed(ChangeKind::Update(_))
                    if self.editor.is_editing() && self.viewer.editing.is_some() =>
                {
                    let editing = self.viewer.editing.map(|i| i..i + 1);
                    self.viewer.redraw = Some(Redraw::Ranges(editing.into_iter().collect()));
                }
                FontEvent::Changed(ChangeKind::Reorder(ranges)) => {
                    self.viewer.redraw = Some(Redraw::Ranges(ranges));
                }
                FontEvent::Changed(_) => {
                    self.show_page(self.viewer.page, None);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::host::testing::ScriptedHost;
    use crate::model::workspace::tests::sample_workspace;
    use crate::project::MemoryProjectStore;

    /// App state with a sample font loaded and no pending events
    pub(crate) fn app_with(letters: &str) -> AppState {
        let mut app = AppState::new(Settings::default(), Box::new(MemoryProjectStore::new()));
        app.font.set(sample_workspace(letters));
        app.process_font_events();
        app
    }

    pub(crate) fn names(app: &AppState) -> Vec<String> {
        app.font.get().map(|f| f.glyph_names()).unwrap_or_default()
    }

    #[test]
    fn test_font_set_initialises_views() {
        let mut app = AppState::new(Settings::default(), Box::new(MemoryProjectStore::new()));
        assert!(!app.menu_enabled);
        app.font.set(sample_workspace("ab"));
        app.process_font_events();

        assert!(app.viewer.inited);
        assert!(app.menu_enabled);
        assert_eq!(app.viewer.page, 1);
        assert_eq!(app.viewer.shown, 0..3);
        assert!(app.viewer.selection.is_empty());
        assert!(!app.pager.visible);
    }

    #[test]
    fn test_delete_and_undo() {
        let mut app = app_with("abc");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Delete(vec![2]));
        assert_eq!(names(&app), vec![".notdef", "a", "c"]);
        assert_eq!(app.viewer.shown, 0..3);

        app.handle_viewer_event(&mut host, ViewerEvent::Undo);
        assert_eq!(names(&app), vec![".notdef", "a", "b", "c"]);
        app.handle_viewer_event(&mut host, ViewerEvent::Redo);
        assert_eq!(names(&app), vec![".notdef", "a", "c"]);
    }

    #[test]
    fn test_confirm_exit_only_when_changed() {
        let mut app = app_with("ab");
        assert_eq!(app.confirm_exit(), None);
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Delete(vec![1]));
        assert_eq!(app.confirm_exit(), Some(Prompt::DiscardProjectChanges));
    }

    #[test]
    fn test_save_routing() {
        let mut host = ScriptedHost::default();

        // Normal save with the editor closed saves the project
        let mut app = app_with("ab");
        app.handle_program_event(&mut host, ProgramEvent::Save(SaveType::Normal));
        assert!(app.project_id.is_some());
        assert_eq!(app.focus, Focus::Viewer);
        assert!(app.last_saved.is_some());

        // Normal save while editing writes the glyph back only
        let mut app = app_with("ab");
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(1));
        app.editor.session.as_mut().unwrap().set_width(999.0);
        app.handle_program_event(&mut host, ProgramEvent::Save(SaveType::Normal));
        assert_eq!(app.font.get().unwrap().glyphs[1].width, 999.0);
        assert!(app.project_id.is_none());
        assert!(!app.editor.is_changed());
        assert_eq!(app.focus, Focus::Editor);

        // Force saves both
        app.editor.session.as_mut().unwrap().set_width(777.0);
        app.handle_program_event(&mut host, ProgramEvent::Save(SaveType::Force));
        assert_eq!(app.font.get().unwrap().glyphs[1].width, 777.0);
        assert!(app.project_id.is_some());
        assert!(!app.font.is_changed());
    }

    #[test]
    fn test_function_keys() {
        let mut app = app_with("ab");
        let mut host = ScriptedHost::default();
        app.handle_program_event(&mut host, ProgramEvent::Function(FunctionKey::F2));
        assert!(app.editor.visible);
        assert!(app.splitter.enabled);
        assert_eq!(app.viewer.mode, ViewerMode::Editor);

        app.handle_program_event(&mut host, ProgramEvent::Function(FunctionKey::F2));
        assert!(!app.editor.visible);
        assert!(!app.splitter.enabled);

        app.handle_program_event(&mut host, ProgramEvent::Function(FunctionKey::F3));
        app.handle_program_event(&mut host, ProgramEvent::Function(FunctionKey::F4));
        assert_eq!(host.previews, vec![PreviewFormat::Ttf, PreviewFormat::Woff]);
    }

    #[test]
    fn test_update_refreshes_only_editing_glyph() {
        let mut app = app_with("abc");
        let mut host = ScriptedHost::default();
        app.handle_viewer_event(&mut host, ViewerEvent::Edit(2));
        app.editor.session.as_mut().unwrap().set_width(10.0);
        app.handle_program_event(&mut host, ProgramEvent::Save(SaveType::Editor));
        assert_eq!(app.viewer.redraw, Some(Redraw::Ranges(vec![2..3])));
    }
}
