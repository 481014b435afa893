//! Generalised fish: finned, franken, and mutant patterns.
//!
//! A fish is a pair of *base* and *cover* sector sets for one value. For a
//! cell, `vertex = (#bases containing it) - (#covers containing it)`. Cells
//! with positive vertex holding the value are *fins*; cells with negative
//! vertex lose the value if they are buddies of every fin (vacuously, when
//! there are no fins). The three techniques differ only in which sectors may
//! participate:
//!
//! - **finned** (basic shape): bases are all rows and covers all columns, or
//!   vice versa;
//! - **franken**: boxes may join either side, but each side uses at most one
//!   line orientation and the cover must not reuse the base's orientation;
//! - **mutant**: any sectors, as long as no sector sits on both sides.
//!
//! Every base sector must intersect the cover and vice versa.

use std::{collections::BTreeSet, fmt::Write as _};

use deduku_core::{Digit, Grid, House, Position};

use super::{BoxedTechnique, Technique, basic_fish::order_to_string, eliminations_string};
use crate::combinations::{first_combination, next_combination};

/// Basic-shape fish with fins allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FinnedFish;

/// Row/column-plus-box fish (one line orientation per side).
#[derive(Debug, Default, Clone, Copy)]
pub struct FrankenFish;

/// Fish over arbitrary sector selections.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutantFish;

impl FinnedFish {
    /// Creates a new `FinnedFish` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FrankenFish {
    /// Creates a new `FrankenFish` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MutantFish {
    /// Creates a new `MutantFish` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Basic,
    Franken,
    Mutant,
}

/// Houses where the value has not been placed, rows then columns then boxes.
fn open_sectors(grid: &Grid, value: Digit, with_boxes: bool) -> Vec<House> {
    let open = |house: &House| {
        !grid
            .cells_in(*house)
            .iter()
            .any(|cell| cell.is_solved() && cell.value() == value)
    };
    let mut sectors: Vec<House> = House::ROWS
        .iter()
        .chain(House::COLS.iter())
        .copied()
        .filter(open)
        .collect();
    if with_boxes {
        sectors.extend(House::BOXES.iter().copied().filter(open));
    }
    sectors
}

fn is_line(house: House) -> bool {
    !matches!(house, House::Box(_))
}

/// The orientation of the first line sector in the set, if any.
fn line_orientation(sectors: &[House]) -> Option<bool> {
    sectors
        .iter()
        .find(|house| is_line(**house))
        .map(|house| matches!(house, House::Row(_)))
}

/// Per-side shape constraint.
fn sector_set_ok(sectors: &[House], shape: Shape) -> bool {
    match shape {
        // All sectors share one line orientation, no boxes.
        Shape::Basic => {
            let first_is_row = matches!(sectors[0], House::Row(_));
            sectors
                .iter()
                .all(|house| is_line(*house) && matches!(house, House::Row(_)) == first_is_row)
        }
        // Boxes are free, but the lines must agree on orientation.
        Shape::Franken => match line_orientation(sectors) {
            Some(is_row) => sectors
                .iter()
                .filter(|house| is_line(**house))
                .all(|house| matches!(house, House::Row(_)) == is_row),
            None => true,
        },
        Shape::Mutant => true,
    }
}

/// Cross-side shape constraint.
fn sectors_pair_ok(base: &[House], cover: &[House], shape: Shape) -> bool {
    match shape {
        Shape::Basic => {
            matches!(base[0], House::Row(_)) != matches!(cover[0], House::Row(_))
        }
        Shape::Franken => {
            if let Some(is_row) = line_orientation(base)
                && cover
                    .iter()
                    .any(|house| is_line(*house) && matches!(house, House::Row(_)) == is_row)
            {
                return false;
            }
            all_sectors_intersect(base, cover)
        }
        Shape::Mutant => {
            if base.iter().any(|sector| cover.contains(sector)) {
                return false;
            }
            all_sectors_intersect(base, cover)
        }
    }
}

/// Every base sector intersects the cover and vice versa.
fn all_sectors_intersect(base: &[House], cover: &[House]) -> bool {
    base.iter()
        .all(|b| cover.iter().any(|c| b.intersects(*c)))
        && cover
            .iter()
            .all(|c| base.iter().any(|b| b.intersects(*c)))
}

fn vertex(pos: Position, base: &[House], cover: &[House]) -> i32 {
    let bases = base.iter().filter(|house| house.contains(pos)).count();
    let covers = cover.iter().filter(|house| house.contains(pos)).count();
    i32::try_from(bases).unwrap_or(0) - i32::try_from(covers).unwrap_or(0)
}

fn build_fins(grid: &Grid, base: &[House], cover: &[House], value: Digit) -> BTreeSet<Position> {
    let mut fins = BTreeSet::new();
    for sector in base {
        for pos in sector.positions() {
            if grid.cell(pos).is_candidate(value) && vertex(pos, base, cover) > 0 {
                fins.insert(pos);
            }
        }
    }
    fins
}

/// Groups consecutive sectors of one type: `r12b58` for rows 1,2 + boxes 5,8.
fn sectors_string(sectors: &[House]) -> String {
    let mut out = String::new();
    let mut current = None;
    for sector in sectors {
        let (letter, index) = match sector {
            House::Row(i) => ('r', i),
            House::Col(i) => ('c', i),
            House::Box(i) => ('b', i),
        };
        if current != Some(letter) {
            out.push(letter);
            current = Some(letter);
        }
        let _ = write!(out, "{}", index + 1);
    }
    out
}

fn log_fish(
    shape: Shape,
    base: &[House],
    cover: &[House],
    value: Digit,
    order: usize,
    fins: &BTreeSet<Position>,
    changed: &[(Position, Digit)],
) {
    let mut shape_str = String::new();
    if !fins.is_empty() {
        shape_str.push_str("finned ");
    }
    match shape {
        Shape::Basic => {
            if fins.is_empty() {
                shape_str.push_str("basic ");
            }
        }
        Shape::Franken => shape_str.push_str("franken "),
        Shape::Mutant => shape_str.push_str("mutant "),
    }
    shape_str.push_str(order_to_string(order));

    let mut fish = sectors_string(base);
    fish.push('\\');
    fish.push_str(&sectors_string(cover));
    let _ = write!(fish, "={value}");
    if !fins.is_empty() {
        fish.push_str(",fins={");
        for (i, fin) in fins.iter().enumerate() {
            if i != 0 {
                fish.push(',');
            }
            let _ = write!(fish, "{fin}");
        }
        fish.push('}');
    }

    log::info!("{shape_str} {fish} ==> {}", eliminations_string(changed));
}

fn fish_with_sectors(
    grid: &mut Grid,
    base: &[House],
    cover: &[House],
    value: Digit,
    order: usize,
    shape: Shape,
) -> bool {
    let fins = build_fins(grid, base, cover, value);
    let mut changed = Vec::new();
    for sector in cover {
        for pos in sector.positions() {
            if vertex(pos, base, cover) < 0
                && fins.iter().all(|fin| pos.is_buddy(*fin))
                && grid.exclude_candidate(pos, value)
            {
                changed.push((pos, value));
            }
        }
    }
    if changed.is_empty() {
        return false;
    }
    log_fish(shape, base, cover, value, order, &fins, &changed);
    true
}

fn fish_for_value(grid: &mut Grid, value: Digit, shape: Shape) -> bool {
    let pool = open_sectors(grid, value, shape != Shape::Basic);
    let divisor = if shape == Shape::Basic { 2 } else { 3 };
    let mut max = pool.len() / divisor;
    if max >= 1 {
        max -= 1;
    }
    let max = max.min(6);

    for order in 2..=max {
        let Some(mut base_combo) = first_combination(order, pool.len()) else {
            break;
        };
        loop {
            let base: Vec<House> = base_combo.iter().map(|&i| pool[i]).collect();
            if shape == Shape::Mutant || sector_set_ok(&base, shape) {
                let Some(mut cover_combo) = first_combination(order, pool.len()) else {
                    break;
                };
                loop {
                    let cover: Vec<House> = cover_combo.iter().map(|&i| pool[i]).collect();
                    if (shape == Shape::Mutant || sector_set_ok(&cover, shape))
                        && sectors_pair_ok(&base, &cover, shape)
                        && fish_with_sectors(grid, &base, &cover, value, order, shape)
                    {
                        return true;
                    }
                    if !next_combination(&mut cover_combo, pool.len()) {
                        break;
                    }
                }
            }
            if !next_combination(&mut base_combo, pool.len()) {
                break;
            }
        }
    }
    false
}

fn general_fish(grid: &mut Grid, shape: Shape) -> bool {
    for value in Digit::ALL {
        if fish_for_value(grid, value, shape) {
            return true;
        }
    }
    false
}

impl Technique for FinnedFish {
    fn name(&self) -> &'static str {
        "finned fish"
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for finned fish");
        general_fish(grid, Shape::Basic)
    }
}

impl Technique for FrankenFish {
    fn name(&self) -> &'static str {
        "franken fish"
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for franken fish");
        general_fish(grid, Shape::Franken)
    }
}

impl Technique for MutantFish {
    fn name(&self) -> &'static str {
        "mutant fish"
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for mutant fish");
        general_fish(grid, Shape::Mutant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_vertex_counts_membership() {
        let base = [House::Row(2), House::Row(5)];
        let cover = [House::Col(3), House::Col(7)];
        // A corner sits in one base and one cover.
        assert_eq!(vertex(Position::new(2, 3), &base, &cover), 0);
        // A base cell outside the cover.
        assert_eq!(vertex(Position::new(2, 0), &base, &cover), 1);
        // A cover cell outside the base.
        assert_eq!(vertex(Position::new(0, 3), &base, &cover), -1);
        // Unrelated cell.
        assert_eq!(vertex(Position::new(0, 0), &base, &cover), 0);
    }

    #[test]
    fn test_sectors_string_groups_types() {
        let sectors = [House::Row(0), House::Row(1), House::Box(4), House::Box(7)];
        assert_eq!(sectors_string(&sectors), "r12b58");
        assert_eq!(sectors_string(&[House::Col(2)]), "c3");
    }

    #[test]
    fn test_finned_fish_matches_plain_x_wing() {
        // With no fins, the basic shape degenerates to an ordinary x-wing.
        let mut grid = Grid::new();
        for row in [2_u8, 5] {
            for col in 0..9 {
                if col != 3 && col != 7 {
                    grid.exclude_candidate(Position::new(row, col), Digit::D4);
                }
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&FinnedFish::new())
            .assert_removed_includes(Position::new(0, 3), [Digit::D4])
            .assert_removed_includes(Position::new(8, 7), [Digit::D4]);
    }

    #[test]
    fn test_finned_x_wing_restricts_eliminations_to_fin_buddies() {
        // Base rows {1, 5} hold value 1 in columns {3, 7} plus a fin at
        // r5c9 (1-based): the fin cell has vertex +1.
        let mut grid = Grid::new();
        for col in 0..9 {
            if col != 2 && col != 6 {
                grid.exclude_candidate(Position::new(0, col), Digit::D1);
            }
            if col != 2 && col != 6 && col != 8 {
                grid.exclude_candidate(Position::new(4, col), Digit::D1);
            }
        }

        let tester = TechniqueTester::new(grid).apply_once(&FinnedFish::new());
        // Only cover cells that see the fin r5c9 may lose the value: of
        // column 6's cells outside the base rows, those in box 5 (rows 3-5).
        tester
            .assert_removed_includes(Position::new(3, 6), [Digit::D1])
            .assert_removed_includes(Position::new(5, 6), [Digit::D1])
            .assert_no_change(Position::new(8, 6))
            .assert_no_change(Position::new(8, 2));
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new())
            .assert_stuck(&FinnedFish::new())
            .assert_stuck(&FrankenFish::new())
            .assert_stuck(&MutantFish::new());
    }
}
