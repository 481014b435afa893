use std::fmt::Write as _;

use deduku_core::{Digit, DigitSet, Grid, Position};

use super::{BoxedTechnique, Technique, eliminations_string};
use crate::solver::is_unique;

const NAME: &str = "unique rectangle";

/// Unique rectangles: four cells at the corners of a row/column rectangle
/// spanning at most two boxes. If all four could hold the same candidate
/// pair, the solution could swap the pair along the rectangle, so a unique
/// puzzle must break the pattern.
///
/// The deduction is only sound on puzzles with a unique solution, so the
/// technique first checks [`is_unique`]; on a non-unique puzzle it logs a
/// warning and does nothing.
///
/// Implemented shapes:
///
/// - *Type 1*: three corners hold exactly the pair; the fourth loses both
///   pair values.
/// - *Types 2 and 5*: two corners hold exactly the pair and the other two
///   hold the pair plus one shared extra value, which is eliminated from
///   every cell seeing both extra corners (type 2 when the extra corners
///   share a line, type 5 when they are diagonal).
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueRectangle;

impl UniqueRectangle {
    /// Creates a new `UniqueRectangle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn corner_positions(rows: (u8, u8), cols: (u8, u8)) -> [Position; 4] {
    [
        Position::new(rows.0, cols.0),
        Position::new(rows.0, cols.1),
        Position::new(rows.1, cols.0),
        Position::new(rows.1, cols.1),
    ]
}

fn rectangle_header(rows: (u8, u8), cols: (u8, u8), pair: DigitSet) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "r{}{}c{}{}=",
        rows.0 + 1,
        rows.1 + 1,
        cols.0 + 1,
        cols.1 + 1
    );
    for value in pair {
        let _ = write!(out, "{value}");
    }
    out
}

/// Type 1: three corners hold exactly the pair, the fourth has extras.
fn type_1(grid: &mut Grid, rows: (u8, u8), cols: (u8, u8)) -> bool {
    let positions = corner_positions(rows, cols);
    let corners = positions.map(|pos| grid.cell(pos));

    let bivalue: Vec<usize> = (0..4)
        .filter(|&i| corners[i].num_candidates() == 2)
        .collect();
    if bivalue.len() != 3 {
        return false;
    }
    let pair = bivalue
        .iter()
        .fold(DigitSet::EMPTY, |acc, &i| acc | corners[i].candidates());
    if pair.len() != 2 {
        return false;
    }
    let odd_one = (0..4).find(|i| !bivalue.contains(i)).unwrap_or(0);

    let target = positions[odd_one];
    let mut changed = Vec::new();
    for value in pair {
        if grid.exclude_candidate(target, value) {
            changed.push((target, value));
        }
    }
    if changed.is_empty() {
        return false;
    }
    log::info!(
        "type-1 {NAME} {} ==> {}",
        rectangle_header(rows, cols, pair),
        eliminations_string(&changed)
    );
    true
}

/// Types 2 and 5: two pair corners, two corners with one shared extra.
fn type_2_or_5(grid: &mut Grid, rows: (u8, u8), cols: (u8, u8)) -> bool {
    let positions = corner_positions(rows, cols);
    let corners = positions.map(|pos| grid.cell(pos));

    let bivalue: Vec<usize> = (0..4)
        .filter(|&i| corners[i].num_candidates() == 2)
        .collect();
    let trivalue: Vec<usize> = (0..4)
        .filter(|&i| corners[i].num_candidates() == 3)
        .collect();
    if bivalue.len() != 2 || trivalue.len() != 2 {
        return false;
    }
    let pair = corners[bivalue[0]].candidates();
    if corners[bivalue[1]].candidates() != pair {
        return false;
    }
    let extras = corners[trivalue[0]].candidates();
    if corners[trivalue[1]].candidates() != extras || !pair.is_subset(extras) {
        return false;
    }
    let Some(extra) = extras.difference(pair).as_single() else {
        return false;
    };

    let (first, second) = (positions[trivalue[0]], positions[trivalue[1]]);
    let mut changed = Vec::new();
    for buddy in first.buddies() {
        if buddy != second && buddy.is_buddy(second) && grid.exclude_candidate(buddy, extra) {
            changed.push((buddy, extra));
        }
    }
    if changed.is_empty() {
        return false;
    }
    let rectangle_type = if first.row() == second.row() || first.col() == second.col() {
        2
    } else {
        5
    };
    log::info!(
        "type-{rectangle_type} {NAME} {} ==> {}",
        rectangle_header(rows, cols, pair),
        eliminations_string(&changed)
    );
    true
}

impl Technique for UniqueRectangle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        if !is_unique(grid) {
            log::warn!("puzzle is not unique, unique rectangles may not be applied here");
            return false;
        }
        log::trace!("searching for unique rectangles");
        for r1 in 0..9 {
            for r2 in r1 + 1..9 {
                let two_bands = r1 / 3 != r2 / 3;
                for c1 in 0..9 {
                    for c2 in c1 + 1..9 {
                        // A rectangle across two bands and two stacks spans
                        // four boxes and carries no uniqueness argument.
                        if two_bands && c1 / 3 != c2 / 3 {
                            continue;
                        }
                        if type_1(grid, (r1, r2), (c1, c2))
                            || type_2_or_5(grid, (r1, r2), (c1, c2))
                        {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}
