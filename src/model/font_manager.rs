// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! The font document manager.
//!
//! `FontManager` owns the open `Workspace` and is the only thing that
//! mutates it. Every mutation records an undo snapshot first, marks the
//! document changed and queues a `FontEvent`; the controller drains the
//! queue after each handler and refreshes the views from it.

use std::collections::HashMap;
use std::ops::Range;
use std::time::{Duration, Instant};
use thiserror::Error;

use super::glyph_ops;
use super::workspace::{Glyph, Workspace};
use crate::dialogs::{AdjustGlyphSetting, AdjustPosSetting, FindQuery, GlyphSetting, StartCode};
use crate::editing::{EditType, ShiftDirection, ShiftOutcome, UndoState, shift_selection};
use crate::settings::Settings;

/// What kind of change a `FontEvent::Changed` reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Anything that may touch many glyphs
    Change,
    /// A single glyph was rewritten in place
    Update(usize),
    /// Glyphs were reordered; only these ranges differ
    Reorder(Vec<Range<usize>>),
}

/// Notifications queued by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontEvent {
    /// A new document was loaded
    Set,
    Changed(ChangeKind),
}

/// Problems found in the document that the user should look at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("{} glyphs share a codepoint with another glyph", glyphs.len())]
    DuplicateCodepoint { glyphs: Vec<usize> },
}

impl FontError {
    /// Glyphs the error refers to
    pub fn glyphs(&self) -> &[usize] {
        match self {
            FontError::DuplicateCodepoint { glyphs } => glyphs,
        }
    }
}

/// Owner of the open font, its history and change notifications
#[derive(Debug)]
pub struct FontManager {
    font: Option<Workspace>,
    history: UndoState<Workspace>,
    /// Type and time of the last recorded edit, for coalescing
    last_edit: Option<(EditType, Instant)>,
    debounce: Duration,
    changed: bool,
    events: Vec<FontEvent>,
}

impl FontManager {
    pub fn new(history_depth: usize, debounce: Duration) -> Self {
        Self {
            font: None,
            history: UndoState::with_max_depth(history_depth),
            last_edit: None,
            debounce,
            changed: false,
            events: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.history.depth, settings.history_debounce())
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    /// Replace the open document and forget its history
    pub fn set(&mut self, font: Workspace) {
        tracing::info!(
            "Font set: {} ({} glyphs)",
            font.display_name(),
            font.glyph_count()
        );
        self.font = Some(font);
        self.history.clear();
        self.last_edit = None;
        self.changed = false;
        self.events.push(FontEvent::Set);
    }

    pub fn get(&self) -> Option<&Workspace> {
        self.font.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.font.is_some()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Mark the document as saved
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    pub fn glyph_count(&self) -> usize {
        self.font.as_ref().map_or(0, Workspace::glyph_count)
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<FontEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Record the current document as an undo point
    pub fn push_history(&mut self, kind: EditType) {
        if let Some(font) = &self.font {
            let snapshot = font.clone();
            self.record(kind, snapshot, Instant::now());
        }
    }

    fn record(&mut self, kind: EditType, snapshot: Workspace, now: Instant) {
        let coalesce = matches!(
            self.last_edit,
            Some((previous, at))
                if kind.coalesces_with(previous) && now.duration_since(at) < self.debounce
        );
        if !coalesce {
            self.history.add_undo_group(snapshot);
        }
        self.last_edit = Some((kind, now));
    }

    fn fire_change(&mut self, kind: ChangeKind) {
        self.changed = true;
        self.events.push(FontEvent::Changed(kind));
    }

    /// Run `edit` on the document after recording a normal undo point
    fn edit<R>(&mut self, edit: impl FnOnce(&mut Workspace) -> R) -> Option<R> {
        self.push_history(EditType::Normal);
        self.font.as_mut().map(edit)
    }

    pub fn undo(&mut self) -> bool {
        let Some(current) = &self.font else {
            return false;
        };
        match self.history.undo(current.clone()) {
            Some(previous) => {
                self.font = Some(previous);
                self.last_edit = None;
                self.fire_change(ChangeKind::Change);
                tracing::debug!("Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let Some(current) = &self.font else {
            return false;
        };
        match self.history.redo(current.clone()) {
            Some(next) => {
                self.font = Some(next);
                self.last_edit = None;
                self.fire_change(ChangeKind::Change);
                tracing::debug!("Redo");
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Clones of the listed glyphs (out-of-range indices are skipped)
    pub fn glyphs(&self, indices: &[usize]) -> Vec<Glyph> {
        let Some(font) = &self.font else {
            return Vec::new();
        };
        indices
            .iter()
            .filter_map(|&i| font.get_glyph(i).cloned())
            .collect()
    }

    /// Like `glyphs`, with compound glyphs decomposed to outlines
    pub fn copied_glyphs(&self, indices: &[usize]) -> Vec<Glyph> {
        let Some(font) = &self.font else {
            return Vec::new();
        };
        indices
            .iter()
            .filter_map(|&i| font.get_glyph(i))
            .map(|g| {
                if g.is_compound() {
                    glyph_ops::decompose(g, font)
                } else {
                    g.clone()
                }
            })
            .collect()
    }

    /// Indices of glyphs matching `query`, ascending
    pub fn find_glyphs(&self, query: &FindQuery) -> Vec<usize> {
        let Some(font) = &self.font else {
            return Vec::new();
        };
        font.glyphs
            .iter()
            .enumerate()
            .filter(|(_, g)| match query {
                FindQuery::Unicode(codepoints) => {
                    g.codepoints.iter().any(|c| codepoints.contains(c))
                }
                FindQuery::Name(name) => !name.is_empty() && g.name.contains(name.as_str()),
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Glyphs that share a codepoint with some other glyph, ascending
    pub fn duplicate_codepoints(&self) -> Vec<usize> {
        let Some(font) = &self.font else {
            return Vec::new();
        };
        let mut owners: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, glyph) in font.glyphs.iter().enumerate() {
            for &c in &glyph.codepoints {
                let list = owners.entry(c).or_default();
                if list.last() != Some(&i) {
                    list.push(i);
                }
            }
        }
        let mut dupes: Vec<usize> = owners
            .into_values()
            .filter(|list| list.len() > 1)
            .flatten()
            .collect();
        dupes.sort_unstable();
        dupes.dedup();
        dupes
    }

    /// Report duplicate codepoints as an error, if any
    pub fn check_codepoints(&self) -> Result<(), FontError> {
        let glyphs = self.duplicate_codepoints();
        if glyphs.is_empty() {
            Ok(())
        } else {
            Err(FontError::DuplicateCodepoint { glyphs })
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Remove glyphs. `.notdef` in the first slot is never removed.
    pub fn remove_glyphs(&mut self, indices: &[usize]) -> usize {
        let Some(font) = &self.font else {
            return 0;
        };
        let mut doomed: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < font.glyph_count())
            .filter(|&i| !(i == 0 && font.glyphs[0].name == ".notdef"))
            .collect();
        doomed.sort_unstable();
        doomed.dedup();
        if doomed.is_empty() {
            return 0;
        }

        self.edit(|font| {
            for &i in doomed.iter().rev() {
                font.glyphs.remove(i);
            }
        });
        tracing::info!("Removed {} glyphs", doomed.len());
        self.fire_change(ChangeKind::Change);
        doomed.len()
    }

    /// Paste glyphs: they overwrite the selected slots in ascending order
    /// and any surplus is appended. Returns the indices written.
    pub fn append_glyphs(&mut self, glyphs: Vec<Glyph>, selection: &[usize]) -> Vec<usize> {
        if glyphs.is_empty() || self.font.is_none() {
            return Vec::new();
        }
        let mut slots: Vec<usize> = selection.to_vec();
        slots.sort_unstable();
        slots.dedup();

        let written = self
            .edit(|font| {
                slots.retain(|&i| i < font.glyph_count());
                let mut written = Vec::with_capacity(glyphs.len());
                let mut slots = slots.into_iter();
                for mut glyph in glyphs {
                    match slots.next() {
                        Some(i) => {
                            glyph.name = font.unique_glyph_name(&glyph.name, Some(i));
                            font.glyphs[i] = glyph;
                            written.push(i);
                        }
                        None => {
                            glyph.name = font.unique_glyph_name(&glyph.name, None);
                            font.glyphs.push(glyph);
                            written.push(font.glyphs.len() - 1);
                        }
                    }
                }
                written
            })
            .unwrap_or_default();

        self.fire_change(ChangeKind::Change);
        written
    }

    /// Append a new glyph, returning its index
    pub fn insert_glyph(&mut self, mut glyph: Glyph) -> Option<usize> {
        let index = self.edit(|font| {
            glyph.name = font.unique_glyph_name(&glyph.name, None);
            font.glyphs.push(glyph);
            font.glyphs.len() - 1
        })?;
        self.fire_change(ChangeKind::Change);
        Some(index)
    }

    /// Overwrite the glyph at `index`
    pub fn replace_glyph(&mut self, mut glyph: Glyph, index: usize) -> bool {
        if index >= self.glyph_count() {
            return false;
        }
        self.edit(|font| {
            glyph.name = font.unique_glyph_name(&glyph.name, Some(index));
            font.glyphs[index] = glyph;
        });
        self.fire_change(ChangeKind::Update(index));
        true
    }

    /// Apply the glyph settings dialog to one glyph
    pub fn update_glyph(&mut self, setting: &GlyphSetting, index: usize) -> bool {
        if index >= self.glyph_count() {
            return false;
        }
        self.edit(|font| {
            let name = if setting.name.trim().is_empty() {
                None
            } else {
                Some(font.unique_glyph_name(setting.name.trim(), Some(index)))
            };
            let glyph = &mut font.glyphs[index];
            if let Some(name) = name {
                glyph.name = name;
            }
            glyph.codepoints = setting.codepoints.clone();
            glyph_ops::set_side_bearings(
                glyph,
                setting.left_side_bearing,
                setting.right_side_bearing,
            );
        });
        self.fire_change(ChangeKind::Update(index));
        true
    }

    /// Set side bearings on every listed glyph
    pub fn adjust_glyph_pos(&mut self, indices: &[usize], setting: &AdjustPosSetting) {
        if setting.left_side_bearing.is_none() && setting.right_side_bearing.is_none() {
            return;
        }
        self.edit_each(indices, |glyph, _| {
            glyph_ops::set_side_bearings(
                glyph,
                setting.left_side_bearing,
                setting.right_side_bearing,
            );
        });
    }

    /// Apply outline transforms to every listed glyph
    pub fn adjust_glyph(&mut self, indices: &[usize], setting: &AdjustGlyphSetting) {
        self.edit_each(indices, |glyph, font| {
            if setting.flip_vertical {
                glyph_ops::flip_vertical(glyph);
            }
            if setting.mirror {
                glyph_ops::mirror_horizontal(glyph);
            }
            if let Some(scale) = setting.scale.filter(|s| *s > 0.0 && *s != 1.0) {
                glyph_ops::scale_glyph(glyph, scale, scale);
            }
            if setting.fit_em_box {
                glyph_ops::fit_to_em_box(
                    glyph,
                    font.ascender,
                    font.descender,
                    setting.em_padding,
                );
            }
        });
    }

    /// Run `f` on each listed glyph (in range) as a single undo step.
    /// `f` also receives the font metrics.
    fn edit_each(&mut self, indices: &[usize], f: impl Fn(&mut Glyph, &FontMetrics)) {
        let count = self.glyph_count();
        let targets: Vec<usize> = indices.iter().copied().filter(|&i| i < count).collect();
        if targets.is_empty() {
            return;
        }
        self.edit(|font| {
            let metrics = FontMetrics {
                ascender: font.ascender,
                descender: font.descender,
            };
            for &i in &targets {
                f(&mut font.glyphs[i], &metrics);
            }
        });
        self.fire_change(ChangeKind::Change);
    }

    /// Number glyphs with sequential codepoints from `start`, naming them
    /// `uniXXXX` when `generate_names` is set.
    pub fn set_unicode(&mut self, start: StartCode, indices: &[usize], generate_names: bool) {
        self.assign_codepoints(start, indices, generate_names.then_some(unicode_glyph_name));
    }

    /// OSGame numbering: sequential codepoints like `set_unicode`, with
    /// generated names carrying the decimal character id (`char65`).
    pub fn set_osgame(&mut self, start: StartCode, indices: &[usize], generate_names: bool) {
        self.assign_codepoints(start, indices, generate_names.then_some(osgame_glyph_name));
    }

    fn assign_codepoints(
        &mut self,
        start: StartCode,
        indices: &[usize],
        namer: Option<fn(char) -> String>,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        // An empty selection numbers every glyph except .notdef
        let mut targets: Vec<usize> = if indices.is_empty() {
            (0..font.glyph_count())
                .filter(|&i| font.glyphs[i].name != ".notdef")
                .collect()
        } else {
            indices
                .iter()
                .copied()
                .filter(|&i| i < font.glyph_count())
                .collect()
        };
        targets.sort_unstable();
        targets.dedup();
        if targets.is_empty() {
            return;
        }

        self.edit(|font| {
            let mut next = start.0;
            for i in targets {
                // Skip surrogates and other non-scalar values
                let Some(c) = (next..=char::MAX as u32).find_map(char::from_u32) else {
                    break;
                };
                next = c as u32 + 1;
                if let Some(namer) = namer {
                    let name = font.unique_glyph_name(&namer(c), Some(i));
                    font.glyphs[i].name = name;
                }
                font.glyphs[i].codepoints = vec![c];
            }
        });
        self.fire_change(ChangeKind::Change);
    }

    /// Shift the selected glyphs one slot. Consecutive moves inside the
    /// debounce window share one undo step.
    pub fn move_glyphs(&mut self, selection: &[usize], direction: ShiftDirection) -> ShiftOutcome {
        let Some(font) = &mut self.font else {
            return ShiftOutcome {
                selection: selection.to_vec(),
                changed: Vec::new(),
            };
        };
        let snapshot = font.clone();
        let outcome = shift_selection(&mut font.glyphs, selection, direction);
        if outcome.moved() {
            self.record(EditType::Reorder, snapshot, Instant::now());
            self.fire_change(ChangeKind::Reorder(outcome.changed.clone()));
        }
        outcome
    }
}

/// Vertical metrics handed to per-glyph edits
struct FontMetrics {
    ascender: f64,
    descender: f64,
}

/// AGL-style name for a codepoint: `uniXXXX`, or `uXXXXX` above the BMP
fn unicode_glyph_name(c: char) -> String {
    let cp = c as u32;
    if cp <= 0xFFFF {
        format!("uni{:04X}", cp)
    } else {
        format!("u{:05X}", cp)
    }
}

/// Bitmap-font style name using the decimal character id
fn osgame_glyph_name(c: char) -> String {
    format!("char{}", c as u32)
}
