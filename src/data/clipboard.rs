// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph copy, cut and paste for AppState

use serde::{Deserialize, Serialize};

use super::AppState;
use crate::model::glyph_ops;
use crate::model::workspace::Glyph;
use crate::settings;

/// Clipboard contents for glyph copy/paste.
///
/// Records the units per em of the source font so glyphs pasted into a
/// font with a different em size can be scaled to match. Serializes to
/// JSON for exchange through a system clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphClipboard {
    /// Units per em of the font the glyphs came from; 0 when unknown
    #[serde(default)]
    pub units_per_em: f64,
    pub glyphs: Vec<Glyph>,
}

impl GlyphClipboard {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Glyphs scaled to a font with `units_per_em`
    pub fn glyphs_for(&self, units_per_em: f64) -> Vec<Glyph> {
        let mut glyphs = self.glyphs.clone();
        if self.units_per_em != units_per_em {
            let source = if self.units_per_em > 0.0 {
                self.units_per_em
            } else {
                settings::clipboard::FALLBACK_UNITS_PER_EM
            };
            let scale = units_per_em / source;
            for glyph in &mut glyphs {
                glyph_ops::scale_glyph(glyph, scale, scale);
            }
        }
        glyphs
    }
}

impl AppState {
    /// Copy glyphs; compound glyphs are decomposed so the clipboard does
    /// not depend on the source font.
    pub(super) fn copy_glyphs(&mut self, list: &[usize]) {
        let glyphs = self.font.copied_glyphs(list);
        self.set_clipboard(glyphs);
    }

    /// Move glyphs to the clipboard as they are
    pub(super) fn cut_glyphs(&mut self, list: &[usize]) {
        let glyphs = self.font.glyphs(list);
        self.set_clipboard(glyphs);
        self.font.remove_glyphs(list);
    }

    fn set_clipboard(&mut self, glyphs: Vec<Glyph>) {
        let Some(font) = self.font.get() else {
            return;
        };
        tracing::debug!("Clipboard holds {} glyphs", glyphs.len());
        self.clipboard = Some(GlyphClipboard {
            units_per_em: font.units_per_em,
            glyphs,
        });
    }

    /// Paste onto the grid selection: selected slots are overwritten and
    /// the remaining glyphs are appended.
    pub(super) fn paste_glyphs(&mut self) {
        let Some(clip) = self.clipboard.as_ref().filter(|c| !c.glyphs.is_empty()) else {
            return;
        };
        let Some(font) = self.font.get() else {
            return;
        };
        let glyphs = clip.glyphs_for(font.units_per_em);
        let written = self
            .font
            .append_glyphs(glyphs, &self.viewer.selection.to_vec());
        tracing::info!("Pasted {} glyphs", written.len());
        self.select(written);
    }

    /// Application paste: into the editor while it is editing, otherwise
    /// onto the grid.
    pub(super) fn program_paste(&mut self) {
        let Some(clip) = self.clipboard.as_ref().filter(|c| !c.glyphs.is_empty()) else {
            return;
        };
        if !self.editor.is_editing() {
            self.paste_glyphs();
            return;
        }
        let contours = clip.glyphs[0].contours.clone();
        if let Some(session) = &mut self.editor.session {
            session.add_contours(contours);
        }
    }
}
