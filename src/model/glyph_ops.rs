// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry edits on glyphs: bearings, flips, scaling and decomposition.
//!
//! All operations work on the owned `Glyph` model. Transforms are applied
//! with `kurbo::Affine` so outlines and component placements stay in sync.

use kurbo::{Affine, Point};

use super::workspace::{Contour, ContourPoint, Glyph, PointType, Workspace};

/// Nesting limit when resolving components (guards against cycles)
const MAX_COMPONENT_DEPTH: usize = 16;

/// Apply an affine transform to every outline point and component.
pub fn transform_glyph(glyph: &mut Glyph, affine: Affine) {
    for contour in &mut glyph.contours {
        transform_contour(contour, affine);
    }
    for component in &mut glyph.components {
        component.transform = affine * component.transform;
    }
}

fn transform_contour(contour: &mut Contour, affine: Affine) {
    for pt in &mut contour.points {
        let p = affine * Point::new(pt.x, pt.y);
        pt.x = p.x;
        pt.y = p.y;
    }
}

/// Scale outlines and advance width (used when pasting between fonts with
/// different units per em).
pub fn scale_glyph(glyph: &mut Glyph, sx: f64, sy: f64) {
    transform_glyph(glyph, Affine::scale_non_uniform(sx, sy));
    glyph.width *= sx;
}

/// Set the left and/or right side bearing.
///
/// Changing the left bearing shifts the outline and grows the advance by
/// the same amount; the right bearing is measured from the shifted outline.
pub fn set_side_bearings(glyph: &mut Glyph, left: Option<f64>, right: Option<f64>) {
    if let (Some(lsb), Some(x_min)) = (left, glyph.x_min()) {
        let dx = lsb - x_min;
        transform_glyph(glyph, Affine::translate((dx, 0.0)));
        glyph.width += dx;
    }
    if let Some(rsb) = right {
        glyph.width = glyph.x_max().unwrap_or(0.0) + rsb;
    }
}

/// Flip the outline upside down within its own bounds.
pub fn flip_vertical(glyph: &mut Glyph) {
    let (Some(y_min), Some(y_max)) = (glyph.y_min(), glyph.y_max()) else {
        return;
    };
    transform_glyph(glyph, Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, y_min + y_max]));
    reverse_all(glyph);
}

/// Mirror the outline left-to-right within its own bounds.
pub fn mirror_horizontal(glyph: &mut Glyph) {
    let (Some(x_min), Some(x_max)) = (glyph.x_min(), glyph.x_max()) else {
        return;
    };
    transform_glyph(glyph, Affine::new([-1.0, 0.0, 0.0, 1.0, x_min + x_max, 0.0]));
    reverse_all(glyph);
}

/// Scale the outline uniformly so it fills the em box between `descender`
/// and `ascender`, inset by `padding` on every side.
pub fn fit_to_em_box(glyph: &mut Glyph, ascender: f64, descender: f64, padding: f64) {
    let (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) =
        (glyph.x_min(), glyph.x_max(), glyph.y_min(), glyph.y_max())
    else {
        return;
    };
    let height = y_max - y_min;
    if height <= 0.0 {
        return;
    }

    let target = (ascender - descender - 2.0 * padding).max(0.0);
    let scale = target / height;
    let affine = Affine::translate((padding, descender + padding))
        * Affine::scale(scale)
        * Affine::translate((-x_min, -y_min));
    transform_glyph(glyph, affine);
    glyph.width = (x_max - x_min) * scale + 2.0 * padding;
}

/// Flipping one axis inverts winding; restore it.
fn reverse_all(glyph: &mut Glyph) {
    for contour in &mut glyph.contours {
        reverse_contour(contour);
    }
}

/// Reverse a closed contour's direction.
///
/// A UFO segment type lives on the point that ends the segment, so after
/// reversal each on-curve point takes the type of the next on-curve point
/// in the original order. Open contours (starting with a move) are left
/// untouched.
pub fn reverse_contour(contour: &mut Contour) {
    let points = &contour.points;
    if points.is_empty() || points.iter().any(|p| p.point_type == PointType::Move) {
        return;
    }
    let on_curve: Vec<usize> = (0..points.len())
        .filter(|&i| points[i].point_type != PointType::OffCurve)
        .collect();
    if on_curve.is_empty() {
        contour.points.reverse();
        return;
    }

    let mut retyped: Vec<ContourPoint> = points.clone();
    for (n, &i) in on_curve.iter().enumerate() {
        let next = on_curve[(n + 1) % on_curve.len()];
        retyped[i].point_type = points[next].point_type;
    }
    retyped.reverse();
    contour.points = retyped;
}

/// Return a copy of `glyph` with every component resolved into contours.
///
/// Missing base glyphs are skipped with a warning.
pub fn decompose(glyph: &Glyph, font: &Workspace) -> Glyph {
    let mut simple = glyph.clone();
    simple.components.clear();
    append_component_contours(
        &mut simple.contours,
        glyph,
        Affine::IDENTITY,
        font,
        0,
    );
    simple
}

fn append_component_contours(
    out: &mut Vec<Contour>,
    glyph: &Glyph,
    parent: Affine,
    font: &Workspace,
    depth: usize,
) {
    if depth >= MAX_COMPONENT_DEPTH {
        tracing::warn!("Component nesting too deep in '{}', stopping", glyph.name);
        return;
    }
    for component in &glyph.components {
        let Some(base) = font.glyph_by_name(&component.base) else {
            tracing::warn!(
                "Glyph '{}' references missing component '{}'",
                glyph.name,
                component.base
            );
            continue;
        };
        let affine = parent * component.transform;
        for contour in &base.contours {
            let mut placed = contour.clone();
            transform_contour(&mut placed, affine);
            out.push(placed);
        }
        append_component_contours(out, base, affine, font, depth + 1);
    }
}
