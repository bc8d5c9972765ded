// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Moving a multi-selection one slot left or right inside an ordered list.
//!
//! The glyph grid lets the user select any set of cells and nudge them with
//! the arrow keys. Each maximal contiguous run of selected cells moves by
//! one slot; the unselected neighbour on the side of motion (the "carry")
//! is rotated to the far side of the run. If the outermost selected cell
//! would leave the list, nothing moves at all.

use std::ops::Range;

/// Direction of a selection shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    /// Offset applied to every selected index (-1 or +1)
    pub fn step(self) -> isize {
        match self {
            ShiftDirection::Left => -1,
            ShiftDirection::Right => 1,
        }
    }
}

/// Result of a shift: the new selection and what needs redrawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftOutcome {
    /// Selected indices after the shift, ascending
    pub selection: Vec<usize>,
    /// Index ranges whose contents changed (empty for a no-op)
    pub changed: Vec<Range<usize>>,
}

impl ShiftOutcome {
    fn unchanged(selection: Vec<usize>) -> Self {
        Self {
            selection,
            changed: Vec::new(),
        }
    }

    /// Whether anything actually moved
    pub fn moved(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Shift the selected elements of `items` one slot in `direction`.
///
/// The selection may be unsorted; duplicates are collapsed. A selection
/// containing an out-of-range index is treated as a no-op, as is any
/// shift that would push the outermost selected element past either end.
pub fn shift_selection<T>(
    items: &mut [T],
    selected: &[usize],
    direction: ShiftDirection,
) -> ShiftOutcome {
    let mut sorted = selected.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let len = items.len();
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return ShiftOutcome::unchanged(sorted);
    };
    if last >= len {
        return ShiftOutcome::unchanged(sorted);
    }
    let blocked = match direction {
        ShiftDirection::Left => first == 0,
        ShiftDirection::Right => last + 1 == len,
    };
    if blocked {
        return ShiftOutcome::unchanged(sorted);
    }

    let mut runs = contiguous_runs(&sorted);
    if direction == ShiftDirection::Right {
        runs.reverse();
    }

    let mut changed = Vec::with_capacity(runs.len());
    for run in runs {
        // `run` is inclusive-start, exclusive-end over selected indices
        match direction {
            ShiftDirection::Left => {
                let span = run.start - 1..run.end;
                items[span.clone()].rotate_left(1);
                changed.push(span);
            }
            ShiftDirection::Right => {
                let span = run.start..run.end + 1;
                items[span.clone()].rotate_right(1);
                changed.push(span);
            }
        }
    }
    if direction == ShiftDirection::Right {
        changed.reverse();
    }

    let selection = sorted
        .into_iter()
        .map(|index| index.saturating_add_signed(direction.step()))
        .collect();

    ShiftOutcome { selection, changed }
}

/// Split sorted, de-duplicated indices into maximal contiguous runs.
fn contiguous_runs(sorted: &[usize]) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    for &index in sorted {
        match runs.last_mut() {
            Some(run) if run.end == index => run.end += 1,
            _ => runs.push(index..index + 1),
        }
    }
    runs
}
