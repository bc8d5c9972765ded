// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Font document model wrapping `norad` UFO types.
//!
//! `Workspace` owns a font's metrics and its glyphs in *storage order*. The
//! order is meaningful (it is what the grid shows and what users rearrange),
//! so glyphs live in a `Vec` and the order round-trips through the UFO
//! `public.glyphOrder` lib key. Glyphs missing from that key are appended in
//! codepoint order, with unencoded glyphs last by name.

use anyhow::{Context, Result};
use kurbo::Affine;
use norad::{Font, Glyph as NoradGlyph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// UFO lib key holding the glyph storage order
const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

/// Units per em assumed when a UFO does not declare one
pub const DEFAULT_UNITS_PER_EM: f64 = 1000.0;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Internal representation of a glyph (owned data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub name: String,
    /// Advance width
    pub width: f64,
    pub codepoints: Vec<char>,
    pub contours: Vec<Contour>,
    /// Components referencing other glyphs by name
    #[serde(default)]
    pub components: Vec<Component>,
}

/// A contour is a closed path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<ContourPoint>,
}

/// A point in a contour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub x: f64,
    pub y: f64,
    pub point_type: PointType,
}

/// Point type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointType {
    Move,
    Line,
    OffCurve,
    Curve,
    QCurve,
}

/// A component reference to another glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Name of the referenced glyph (the "base" glyph)
    pub base: String,
    /// Affine transformation applied to the base outline
    pub transform: Affine,
}

impl Component {
    /// Create a component from norad's Component type
    pub fn from_norad(norad_comp: &norad::Component) -> Self {
        let t = &norad_comp.transform;
        let transform = Affine::new([
            t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset,
        ]);

        Self {
            base: norad_comp.base.to_string(),
            transform,
        }
    }

    /// Convert to norad's Component type for saving.
    ///
    /// Returns `None` when the base name is not a valid UFO name.
    pub fn to_norad(&self) -> Option<norad::Component> {
        let coeffs = self.transform.as_coeffs();
        let transform = norad::AffineTransform {
            x_scale: coeffs[0],
            xy_scale: coeffs[1],
            yx_scale: coeffs[2],
            y_scale: coeffs[3],
            x_offset: coeffs[4],
            y_offset: coeffs[5],
        };

        let base = norad::Name::new(&self.base).ok()?;
        Some(norad::Component::new(base, transform, None, None))
    }
}

impl Glyph {
    /// Create an empty glyph with the given name and advance width
    pub fn new(name: impl Into<String>, width: f64) -> Self {
        Self {
            name: name.into(),
            width,
            codepoints: Vec::new(),
            contours: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Whether this glyph is built from components
    pub fn is_compound(&self) -> bool {
        !self.components.is_empty()
    }

    /// Minimum x coordinate over all contour points
    pub fn x_min(&self) -> Option<f64> {
        self.points().map(|p| p.x).reduce(f64::min)
    }

    /// Maximum x coordinate over all contour points
    pub fn x_max(&self) -> Option<f64> {
        self.points().map(|p| p.x).reduce(f64::max)
    }

    /// Minimum y coordinate over all contour points
    pub fn y_min(&self) -> Option<f64> {
        self.points().map(|p| p.y).reduce(f64::min)
    }

    /// Maximum y coordinate over all contour points
    pub fn y_max(&self) -> Option<f64> {
        self.points().map(|p| p.y).reduce(f64::max)
    }

    /// Distance from x=0 to the leftmost point
    pub fn left_side_bearing(&self) -> f64 {
        self.x_min().unwrap_or(0.0)
    }

    /// Distance from the rightmost point to the advance width
    pub fn right_side_bearing(&self) -> f64 {
        match self.x_max() {
            Some(x_max) => self.width - x_max,
            None => self.width,
        }
    }

    fn points(&self) -> impl Iterator<Item = &ContourPoint> {
        self.contours.iter().flat_map(|c| c.points.iter())
    }
}

/// Metrics the glyph editor needs to lay out its guides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditingOptions {
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    pub cap_height: f64,
    pub x_height: f64,
}

// ============================================================================
// WORKSPACE
// ============================================================================

/// A loaded font: metadata plus glyphs in storage order
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Path to the UFO directory, if the font came from disk
    pub path: Option<PathBuf>,

    pub family_name: String,
    pub style_name: String,

    /// Font metrics
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    pub x_height: Option<f64>,
    pub cap_height: Option<f64>,

    /// Glyphs in storage order
    pub glyphs: Vec<Glyph>,
}

impl Workspace {
    /// Create an empty font holding only `.notdef`
    pub fn new(family_name: impl Into<String>) -> Self {
        Self {
            path: None,
            family_name: family_name.into(),
            style_name: "Regular".to_string(),
            units_per_em: DEFAULT_UNITS_PER_EM,
            ascender: 800.0,
            descender: -200.0,
            x_height: None,
            cap_height: None,
            glyphs: vec![Glyph::new(".notdef", 500.0)],
        }
    }

    /// Load a UFO from a directory path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let font =
            Font::load(path).with_context(|| format!("Failed to load UFO from {:?}", path))?;

        let family_name = font
            .font_info
            .family_name
            .clone()
            .unwrap_or_else(|| "Untitled Font".to_string());

        let style_name = font
            .font_info
            .style_name
            .clone()
            .unwrap_or_else(|| "Regular".to_string());

        let units_per_em = font
            .font_info
            .units_per_em
            .map(|n| n.as_f64())
            .unwrap_or(DEFAULT_UNITS_PER_EM);

        let mut glyphs: Vec<Glyph> = font
            .default_layer()
            .iter()
            .map(Self::convert_glyph)
            .collect();
        let order = Self::stored_glyph_order(&font);
        Self::apply_glyph_order(&mut glyphs, &order);

        Ok(Self {
            path: Some(path.to_path_buf()),
            family_name,
            style_name,
            units_per_em,
            ascender: font.font_info.ascender.unwrap_or(units_per_em * 0.8),
            descender: font.font_info.descender.unwrap_or(-units_per_em * 0.2),
            x_height: font.font_info.x_height,
            cap_height: font.font_info.cap_height,
            glyphs,
        })
    }

    /// Read `public.glyphOrder` from the font lib
    fn stored_glyph_order(font: &Font) -> Vec<String> {
        font.lib
            .get(GLYPH_ORDER_KEY)
            .and_then(|v| v.as_array())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_string())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sort glyphs by the stored order, then the rest by codepoint/name
    fn apply_glyph_order(glyphs: &mut [Glyph], order: &[String]) {
        let ranks: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .rev()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let rank = |name: &str| ranks.get(name).copied();
        glyphs.sort_by(|a, b| match (rank(&a.name), rank(&b.name)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => Self::compare_glyphs(a, b),
        });
    }

    /// Compare two glyphs that have no stored position
    fn compare_glyphs(a: &Glyph, b: &Glyph) -> std::cmp::Ordering {
        if a.name == ".notdef" || b.name == ".notdef" {
            return (b.name == ".notdef").cmp(&(a.name == ".notdef"));
        }
        match (a.codepoints.first(), b.codepoints.first()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    }

    /// Convert a norad Glyph to our internal Glyph
    fn convert_glyph(norad_glyph: &NoradGlyph) -> Glyph {
        let contours = norad_glyph
            .contours
            .iter()
            .map(Self::convert_contour)
            .collect();

        let components = norad_glyph
            .components
            .iter()
            .map(Component::from_norad)
            .collect();

        Glyph {
            name: norad_glyph.name().to_string(),
            width: norad_glyph.width,
            codepoints: norad_glyph.codepoints.iter().collect(),
            contours,
            components,
        }
    }

    fn convert_contour(norad_contour: &norad::Contour) -> Contour {
        let points = norad_contour
            .points
            .iter()
            .map(|pt| ContourPoint {
                x: pt.x,
                y: pt.y,
                point_type: Self::convert_point_type(&pt.typ),
            })
            .collect();
        Contour { points }
    }

    fn convert_point_type(typ: &norad::PointType) -> PointType {
        match typ {
            norad::PointType::Move => PointType::Move,
            norad::PointType::Line => PointType::Line,
            norad::PointType::OffCurve => PointType::OffCurve,
            norad::PointType::Curve => PointType::Curve,
            norad::PointType::QCurve => PointType::QCurve,
        }
    }

    /// Get the display name of the font (Family + Style)
    pub fn display_name(&self) -> String {
        format!("{} {}", self.family_name, self.style_name)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph names in storage order
    pub fn glyph_names(&self) -> Vec<String> {
        self.glyphs.iter().map(|g| g.name.clone()).collect()
    }

    pub fn get_glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn get_glyph_mut(&mut self, index: usize) -> Option<&mut Glyph> {
        self.glyphs.get_mut(index)
    }

    /// Storage index of the glyph with this name
    pub fn glyph_index(&self, name: &str) -> Option<usize> {
        self.glyphs.iter().position(|g| g.name == name)
    }

    pub fn glyph_by_name(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    /// Guide metrics for the glyph editor.
    ///
    /// Missing cap height falls back to 0.8 x ascender and missing x-height
    /// to 0.4 x units per em.
    pub fn editing_options(&self) -> EditingOptions {
        EditingOptions {
            units_per_em: self.units_per_em,
            ascender: self.ascender,
            descender: self.descender,
            cap_height: self
                .cap_height
                .filter(|h| *h != 0.0)
                .unwrap_or(self.ascender * 0.8),
            x_height: self
                .x_height
                .filter(|h| *h != 0.0)
                .unwrap_or(self.units_per_em * 0.4),
        }
    }

    /// Make `name` unique among the glyph names by appending a suffix.
    ///
    /// The glyph at `skip` (the slot being written) does not count as a clash.
    pub fn unique_glyph_name(&self, name: &str, skip: Option<usize>) -> String {
        let taken: HashSet<&str> = self
            .glyphs
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, g)| g.name.as_str())
            .collect();
        if !taken.contains(name) {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name}.{n}"))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_else(|| name.to_string())
    }

    /// Save back to the UFO this workspace was loaded from
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .context("Font has no file path; use save_to")?;
        self.save_to(path)
    }

    /// Save the workspace as a UFO at `path`.
    ///
    /// An existing UFO is loaded first so metadata we do not model
    /// survives; glyphs no longer in the document are removed.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut font = if path.exists() {
            Font::load(path)
                .with_context(|| format!("Failed to load UFO for saving: {:?}", path))?
        } else {
            Font::new()
        };

        font.font_info.family_name = Some(self.family_name.clone());
        font.font_info.style_name = Some(self.style_name.clone());
        font.font_info.units_per_em =
            norad::fontinfo::NonNegativeIntegerOrFloat::new(self.units_per_em);
        font.font_info.ascender = Some(self.ascender);
        font.font_info.descender = Some(self.descender);
        font.font_info.x_height = self.x_height;
        font.font_info.cap_height = self.cap_height;

        let default_layer = font.default_layer_mut();
        let stale: Vec<String> = default_layer
            .iter()
            .map(|g| g.name().to_string())
            .filter(|name| self.glyph_index(name).is_none())
            .collect();
        for name in &stale {
            default_layer.remove_glyph(name);
        }

        for glyph in &self.glyphs {
            if default_layer.contains_glyph(&glyph.name) {
                default_layer.remove_glyph(&glyph.name);
            }
            default_layer.insert_glyph(Self::to_norad_glyph(glyph));
        }

        let order = self
            .glyphs
            .iter()
            .map(|g| plist::Value::String(g.name.clone()))
            .collect();
        font.lib
            .insert(GLYPH_ORDER_KEY.to_string(), plist::Value::Array(order));

        font.save(path)
            .with_context(|| format!("Failed to save UFO to {:?}", path))?;

        tracing::debug!("Wrote {} glyphs to {}", self.glyphs.len(), path.display());
        Ok(())
    }

    /// Convert our internal Glyph to norad Glyph
    fn to_norad_glyph(glyph: &Glyph) -> NoradGlyph {
        let mut norad_glyph = NoradGlyph::new(&glyph.name);
        norad_glyph.width = glyph.width;

        for &cp in &glyph.codepoints {
            norad_glyph.codepoints.insert(cp);
        }

        norad_glyph.contours = glyph.contours.iter().map(Self::to_norad_contour).collect();
        norad_glyph.components = glyph
            .components
            .iter()
            .filter_map(Component::to_norad)
            .collect();

        norad_glyph
    }

    fn to_norad_contour(contour: &Contour) -> norad::Contour {
        let points = contour
            .points
            .iter()
            .map(|pt| {
                norad::ContourPoint::new(
                    pt.x,
                    pt.y,
                    Self::to_norad_point_type(pt.point_type),
                    false, // smooth
                    None,  // name
                    None,  // identifier
                    None,  // lib
                )
            })
            .collect();
        norad::Contour::new(points, None, None)
    }

    fn to_norad_point_type(typ: PointType) -> norad::PointType {
        match typ {
            PointType::Move => norad::PointType::Move,
            PointType::Line => norad::PointType::Line,
            PointType::OffCurve => norad::PointType::OffCurve,
            PointType::Curve => norad::PointType::Curve,
            PointType::QCurve => norad::PointType::QCurve,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small square glyph for tests
    pub(crate) fn square(name: &str, codepoint: Option<char>, x: f64, size: f64) -> Glyph {
        let corner = |x, y| ContourPoint {
            x,
            y,
            point_type: PointType::Line,
        };
        Glyph {
            name: name.to_string(),
            width: x + size + 50.0,
            codepoints: codepoint.into_iter().collect(),
            contours: vec![Contour {
                points: vec![
                    corner(x, 0.0),
                    corner(x + size, 0.0),
                    corner(x + size, size),
                    corner(x, size),
                ],
            }],
            components: Vec::new(),
        }
    }

    /// `.notdef` followed by squares for each letter
    pub(crate) fn sample_workspace(letters: &str) -> Workspace {
        let mut ws = Workspace::new("Test Sans");
        for c in letters.chars() {
            ws.glyphs.push(square(&c.to_string(), Some(c), 50.0, 400.0));
        }
        ws
    }

    #[test]
    fn test_bearings() {
        let glyph = square("a", Some('a'), 40.0, 300.0);
        assert_eq!(glyph.left_side_bearing(), 40.0);
        assert_eq!(glyph.right_side_bearing(), 50.0);

        let empty = Glyph::new("space", 250.0);
        assert_eq!(empty.left_side_bearing(), 0.0);
        assert_eq!(empty.right_side_bearing(), 250.0);
    }

    #[test]
    fn test_editing_options_fallbacks() {
        let ws = Workspace::new("Test");
        let opts = ws.editing_options();
        assert_eq!(opts.cap_height, 640.0);
        assert_eq!(opts.x_height, 400.0);
    }

    #[test]
    fn test_unique_glyph_name() {
        let ws = sample_workspace("ab");
        assert_eq!(ws.unique_glyph_name("c", None), "c");
        assert_eq!(ws.unique_glyph_name("a", None), "a.1");
        assert_eq!(ws.unique_glyph_name("a", Some(1)), "a");
    }

    #[test]
    fn test_apply_glyph_order() {
        let mut glyphs = vec![
            square("b", Some('b'), 0.0, 10.0),
            Glyph::new("zzz", 10.0),
            square("a", Some('a'), 0.0, 10.0),
            Glyph::new(".notdef", 10.0),
            square("c", Some('c'), 0.0, 10.0),
        ];
        Workspace::apply_glyph_order(&mut glyphs, &["c".to_string()]);
        let names: Vec<&str> = glyphs.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["c", ".notdef", "a", "b", "zzz"]);
    }

    #[test]
    fn test_glyph_order_first_entry_wins_on_large_fonts() {
        let mut glyphs: Vec<Glyph> = (0..5000)
            .map(|i| Glyph::new(format!("g{i:05}"), 10.0))
            .collect();
        let mut order: Vec<String> = glyphs.iter().rev().map(|g| g.name.clone()).collect();
        // A repeated name keeps its first position
        order.push("g04999".to_string());
        Workspace::apply_glyph_order(&mut glyphs, &order);
        assert_eq!(glyphs[0].name, "g04999");
        assert_eq!(glyphs[4999].name, "g00000");
    }

    #[test]
    fn test_save_and_load_keeps_glyph_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Order.ufo");

        let mut ws = sample_workspace("abc");
        ws.glyphs.swap(1, 3);
        ws.save_to(&path).unwrap();

        let loaded = Workspace::load(&path).unwrap();
        assert_eq!(loaded.glyph_names(), vec![".notdef", "c", "b", "a"]);
        assert_eq!(loaded.family_name, "Test Sans");
        assert_eq!(loaded.glyphs[1].codepoints, vec!['c']);

        // Removing a glyph removes it from disk too
        let mut shorter = loaded.clone();
        shorter.glyphs.remove(2);
        shorter.save().unwrap();
        let reloaded = Workspace::load(&path).unwrap();
        assert_eq!(reloaded.glyph_names(), vec![".notdef", "c", "a"]);
    }
}
