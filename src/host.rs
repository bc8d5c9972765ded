// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! The seam between the controller and whatever presents it.
//!
//! The controller never opens windows or reads input itself. When it needs
//! a decision (confirm a discard, fill in a dialog) or has to hand work to
//! an outside service (preview, export, sync) it calls the `Host`. Dialog
//! methods are request/response: `None` means the user cancelled.

use crate::dialogs::{
    AdjustGlyphSetting, AdjustPosSetting, FindQuery, GlyphSetting, OsGameSetting, Prompt,
    SyncChoice, SyncConfig, UnicodeSetting, Warning,
};
use crate::model::workspace::{Glyph, Workspace};
use crate::project::ProjectId;

/// Binary font format requested for a preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewFormat {
    Ttf,
    Woff,
}

/// View-layer services used by the controller
pub trait Host {
    /// Ask a yes/no question
    fn confirm(&mut self, prompt: Prompt) -> bool;

    /// Show a transient notice
    fn warn(&mut self, warning: Warning);

    fn adjust_pos_dialog(&mut self, prefill: &AdjustPosSetting) -> Option<AdjustPosSetting>;

    fn adjust_glyph_dialog(&mut self) -> Option<AdjustGlyphSetting>;

    fn glyph_dialog(&mut self, prefill: &GlyphSetting) -> Option<GlyphSetting>;

    fn find_glyph_dialog(&mut self) -> Option<FindQuery>;

    fn unicode_dialog(&mut self) -> Option<UnicodeSetting>;

    fn osgame_dialog(&mut self) -> Option<OsGameSetting>;

    fn sync_dialog(&mut self, prefill: &SyncConfig) -> Option<SyncChoice>;

    /// Ask for a name when saving a font that is not a project yet
    fn project_name_dialog(&mut self, suggested: &str) -> Option<String>;

    /// Offer a glyph for export
    fn download_glyph(&mut self, font: &Workspace, glyph: &Glyph);

    /// Compile and show the font in a binary format
    fn preview(&mut self, font: &Workspace, format: PreviewFormat);

    /// Push a project to its remote
    fn sync_project(
        &mut self,
        id: &ProjectId,
        font: &Workspace,
        config: &SyncConfig,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted host that answers from queues and records what it saw.

    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedHost {
        pub confirms: VecDeque<bool>,
        pub adjust_pos: Option<AdjustPosSetting>,
        pub adjust_glyph: Option<AdjustGlyphSetting>,
        pub glyph: Option<GlyphSetting>,
        pub find: Option<FindQuery>,
        pub unicode: Option<UnicodeSetting>,
        pub sync: Option<SyncChoice>,
        pub project_name: Option<String>,
        /// Make `sync_project` fail
        pub sync_error: bool,

        pub prompts: Vec<Prompt>,
        pub warnings: Vec<Warning>,
        pub glyph_prefill: Option<GlyphSetting>,
        pub adjust_pos_prefill: Option<AdjustPosSetting>,
        pub sync_prefill: Option<SyncConfig>,
        pub downloads: Vec<String>,
        pub previews: Vec<PreviewFormat>,
        pub synced: Vec<ProjectId>,
    }

    impl Host for ScriptedHost {
        fn confirm(&mut self, prompt: Prompt) -> bool {
            self.prompts.push(prompt);
            self.confirms.pop_front().unwrap_or(true)
        }

        fn warn(&mut self, warning: Warning) {
            self.warnings.push(warning);
        }

        fn adjust_pos_dialog(&mut self, prefill: &AdjustPosSetting) -> Option<AdjustPosSetting> {
            self.adjust_pos_prefill = Some(prefill.clone());
            self.adjust_pos.take()
        }

        fn adjust_glyph_dialog(&mut self) -> Option<AdjustGlyphSetting> {
            self.adjust_glyph.take()
        }

        fn glyph_dialog(&mut self, prefill: &GlyphSetting) -> Option<GlyphSetting> {
            self.glyph_prefill = Some(prefill.clone());
            self.glyph.take()
        }

        fn find_glyph_dialog(&mut self) -> Option<FindQuery> {
            self.find.take()
        }

        fn unicode_dialog(&mut self) -> Option<UnicodeSetting> {
            self.unicode.take()
        }

        fn osgame_dialog(&mut self) -> Option<OsGameSetting> {
            self.unicode.take()
        }

        fn sync_dialog(&mut self, prefill: &SyncConfig) -> Option<SyncChoice> {
            self.sync_prefill = Some(prefill.clone());
            self.sync.take()
        }

        fn project_name_dialog(&mut self, suggested: &str) -> Option<String> {
            self.project_name.take().or_else(|| Some(suggested.to_string()))
        }

        fn download_glyph(&mut self, _font: &Workspace, glyph: &Glyph) {
            self.downloads.push(glyph.name.clone());
        }

        fn preview(&mut self, _font: &Workspace, format: PreviewFormat) {
            self.previews.push(format);
        }

        fn sync_project(
            &mut self,
            id: &ProjectId,
            _font: &Workspace,
            _config: &SyncConfig,
        ) -> anyhow::Result<()> {
            if self.sync_error {
                anyhow::bail!("remote rejected {id}");
            }
            self.synced.push(id.clone());
            Ok(())
        }
    }
}
