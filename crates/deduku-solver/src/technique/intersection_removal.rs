use deduku_core::{Cell, Digit, Grid, House};

use super::{BoxedTechnique, Technique, eliminations_string};

const NAME: &str = "locked candidates";

/// Locked candidates: eliminations from the intersection of a line and a box.
///
/// For each line/box pair sharing three cells, if every candidate for a value
/// in one house lies inside the shared cells, the value cannot appear in the
/// rest of the other house. Rows are scanned before columns; within a line,
/// the three intersecting boxes in index order; for each pair the line is
/// pruned first (pointing), then the box (claiming).
#[derive(Debug, Default, Clone, Copy)]
pub struct IntersectionRemoval;

impl IntersectionRemoval {
    /// Creates a new `IntersectionRemoval` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// If every candidate for some value in `source` lies in
    /// `source_common`, removes that value from the `target` cells outside
    /// `target_common`. Returns the value and the changed target indices on
    /// the first value that loses candidates.
    fn intersection_of_houses(
        target: &mut [Cell; 9],
        source: &[Cell; 9],
        target_common: [usize; 3],
        source_common: [usize; 3],
    ) -> Option<(Digit, Vec<usize>)> {
        for value in Digit::ALL {
            if !Self::all_candidates_in_common(source, value, source_common) {
                continue;
            }
            let mut changed = Vec::new();
            for (i, cell) in target.iter_mut().enumerate() {
                if target_common.contains(&i) {
                    continue;
                }
                if cell.exclude_candidate(value) {
                    changed.push(i);
                }
            }
            if !changed.is_empty() {
                return Some((value, changed));
            }
        }
        None
    }

    /// At least one candidate for `value`, and all of them inside `common`.
    fn all_candidates_in_common(house: &[Cell; 9], value: Digit, common: [usize; 3]) -> bool {
        let mut found = false;
        for (i, cell) in house.iter().enumerate() {
            if !cell.is_candidate(value) {
                continue;
            }
            if !common.contains(&i) {
                return false;
            }
            found = true;
        }
        found
    }

    /// Tries both elimination directions for one line/box pair.
    fn check_pair(grid: &mut Grid, line: House, box_house: House) -> bool {
        let (line_common, box_common) = common_indices(line, box_house);

        // Pointing: the box confines the value to the shared cells, so the
        // rest of the line loses it.
        let mut line_cells = grid.cells_in(line);
        let box_cells = grid.cells_in(box_house);
        if let Some((value, changed)) =
            Self::intersection_of_houses(&mut line_cells, &box_cells, line_common, box_common)
        {
            let changed: Vec<_> = changed
                .into_iter()
                .map(|i| (line.position(as_u8(i)), value))
                .collect();
            log::info!(
                "{line} intersection with {box_house} ==> {}",
                eliminations_string(&changed)
            );
            grid.set_cells_in(line, line_cells);
            return true;
        }

        // Claiming: the line confines the value, so the rest of the box
        // loses it.
        let mut box_cells = grid.cells_in(box_house);
        let line_cells = grid.cells_in(line);
        if let Some((value, changed)) =
            Self::intersection_of_houses(&mut box_cells, &line_cells, box_common, line_common)
        {
            let changed: Vec<_> = changed
                .into_iter()
                .map(|i| (box_house.position(as_u8(i)), value))
                .collect();
            log::info!(
                "{box_house} intersection with {line} ==> {}",
                eliminations_string(&changed)
            );
            grid.set_cells_in(box_house, box_cells);
            return true;
        }

        false
    }
}

/// In-house indices of the three shared cells, for the line and the box.
fn common_indices(line: House, box_house: House) -> ([usize; 3], [usize; 3]) {
    let House::Box(b) = box_house else {
        unreachable!("second house must be a box");
    };
    match line {
        House::Row(row) => {
            let line_start = usize::from(b % 3) * 3;
            let box_start = usize::from(row % 3) * 3;
            (
                [line_start, line_start + 1, line_start + 2],
                [box_start, box_start + 1, box_start + 2],
            )
        }
        House::Col(col) => {
            let line_start = usize::from(b / 3) * 3;
            let box_col = usize::from(col % 3);
            (
                [line_start, line_start + 1, line_start + 2],
                [box_col, box_col + 3, box_col + 6],
            )
        }
        House::Box(_) => unreachable!("line must be a row or a column"),
    }
}

#[expect(clippy::cast_possible_truncation)]
fn as_u8(i: usize) -> u8 {
    i as u8
}

impl Technique for IntersectionRemoval {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for line and box intersections");
        for i in 0..9 {
            for j in 0..3 {
                let box_index = (i / 3) * 3 + j;
                if Self::check_pair(grid, House::Row(i), House::Box(box_index)) {
                    return true;
                }
            }
        }
        for i in 0..9 {
            for j in 0..3 {
                let box_index = j * 3 + i / 3;
                if Self::check_pair(grid, House::Col(i), House::Box(box_index)) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::Position;

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_pointing_eliminates_from_row() {
        // Confine D5 in box 0 to row 0: the rest of row 0 loses D5.
        let mut grid = Grid::new();
        for pos in House::Box(0).positions() {
            if pos.row() != 0 {
                grid.exclude_candidate(pos, Digit::D5);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&IntersectionRemoval::new())
            .assert_removed_includes(Position::new(0, 3), [Digit::D5])
            .assert_removed_includes(Position::new(0, 8), [Digit::D5])
            .assert_no_change(Position::new(0, 0));
    }

    #[test]
    fn test_claiming_eliminates_from_box() {
        // Confine D7 in row 0 to box 0: the rest of box 0 loses D7.
        let mut grid = Grid::new();
        for pos in House::Row(0).positions() {
            if pos.col() > 2 {
                grid.exclude_candidate(pos, Digit::D7);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&IntersectionRemoval::new())
            .assert_removed_includes(Position::new(1, 0), [Digit::D7])
            .assert_removed_includes(Position::new(2, 2), [Digit::D7]);
    }

    #[test]
    fn test_column_intersection() {
        // Confine D3 in box 3 to column 0.
        let mut grid = Grid::new();
        for pos in House::Box(3).positions() {
            if pos.col() != 0 {
                grid.exclude_candidate(pos, Digit::D3);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&IntersectionRemoval::new())
            .assert_removed_includes(Position::new(0, 0), [Digit::D3])
            .assert_removed_includes(Position::new(8, 0), [Digit::D3])
            .assert_no_change(Position::new(3, 0));
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new()).assert_stuck(&IntersectionRemoval::new());
    }
}
