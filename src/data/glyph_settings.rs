// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Dialog-driven glyph edits for AppState

use super::AppState;
use crate::dialogs::{AdjustPosSetting, GlyphSetting};
use crate::host::Host;

impl AppState {
    /// Side bearings for the selection, prefilled when one glyph is selected
    pub(super) fn adjust_pos(&mut self, host: &mut dyn Host) {
        let selected = self.viewer.selection.to_vec();
        let prefill = match selected.as_slice() {
            [only] => self
                .font
                .glyphs(&[*only])
                .first()
                .map(|glyph| AdjustPosSetting {
                    left_side_bearing: Some(glyph.left_side_bearing()),
                    right_side_bearing: Some(glyph.right_side_bearing()),
                })
                .unwrap_or_default(),
            _ => AdjustPosSetting::default(),
        };
        if let Some(setting) = host.adjust_pos_dialog(&prefill) {
            self.font.adjust_glyph_pos(&selected, &setting);
        }
    }

    pub(super) fn adjust_glyph(&mut self, host: &mut dyn Host) {
        if let Some(setting) = host.adjust_glyph_dialog() {
            self.font
                .adjust_glyph(&self.viewer.selection.to_vec(), &setting);
        }
    }

    /// Name, codepoints and bearings of the first selected glyph
    pub(super) fn setting_font(&mut self, host: &mut dyn Host) {
        let Some(index) = self.viewer.selection.first() else {
            return;
        };
        let Some(glyph) = self.font.glyphs(&[index]).into_iter().next() else {
            return;
        };
        let prefill = GlyphSetting {
            name: glyph.name.clone(),
            codepoints: glyph.codepoints.clone(),
            left_side_bearing: Some(glyph.left_side_bearing()),
            right_side_bearing: Some(glyph.right_side_bearing()),
        };
        if let Some(setting) = host.glyph_dialog(&prefill) {
            self.font.update_glyph(&setting, index);
            self.check_font();
        }
    }

    /// Hand the first listed glyph, decomposed, to the host for export
    pub(super) fn download_glyph(&mut self, host: &mut dyn Host, list: &[usize]) {
        let glyphs = self.font.copied_glyphs(list);
        if let (Some(font), Some(glyph)) = (self.font.get(), glyphs.first()) {
            host.download_glyph(font, glyph);
        }
    }

    pub(super) fn setting_unicode(&mut self, host: &mut dyn Host) {
        let Some(setting) = host.unicode_dialog() else {
            return;
        };
        if self.font.is_loaded() {
            self.font.set_unicode(
                setting.start,
                &self.viewer.selection.to_vec(),
                setting.generate_names,
            );
            self.check_font();
        }
    }

    pub(super) fn setting_osgame(&mut self, host: &mut dyn Host) {
        let Some(setting) = host.osgame_dialog() else {
            return;
        };
        if self.font.is_loaded() {
            self.font.set_osgame(
                setting.start,
                &self.viewer.selection.to_vec(),
                setting.generate_names,
            );
            self.check_font();
        }
    }
}
