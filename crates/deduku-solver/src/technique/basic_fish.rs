use std::fmt::Write as _;

use deduku_core::{Digit, Grid, Position};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Technique, eliminations_string};
use crate::combinations::{first_combination, next_combination};

/// A basic fish of fixed order: x-wing (2), swordfish (3), or jellyfish (4).
///
/// For a value, pick `order` base rows whose candidates for the value fall
/// into exactly `order` columns; the value is then eliminated from those
/// cover columns outside the base rows. Row bases are tried before column
/// bases, values ascending, base subsets in lexicographic order. The order
/// is capped at `(9 - placed copies of the value) / 2`.
#[derive(Debug, Clone, Copy)]
pub struct BasicFish {
    order: usize,
}

impl BasicFish {
    /// An x-wing (order 2).
    #[must_use]
    pub const fn x_wing() -> Self {
        Self { order: 2 }
    }

    /// A swordfish (order 3).
    #[must_use]
    pub const fn swordfish() -> Self {
        Self { order: 3 }
    }

    /// A jellyfish (order 4).
    #[must_use]
    pub const fn jellyfish() -> Self {
        Self { order: 4 }
    }

    fn max_order(grid: &Grid, value: Digit) -> usize {
        let placed = Position::all()
            .filter(|&pos| {
                let cell = grid.cell(pos);
                cell.is_solved() && cell.value() == value
            })
            .count();
        (9 - placed) / 2
    }

    /// Lines (rows if `row_base`, else columns) where the value has between
    /// one and `order` candidate cells.
    fn possible_base_lines(grid: &Grid, value: Digit, order: usize, row_base: bool) -> Vec<u8> {
        (0..9)
            .filter(|&line| {
                let count = (0..9)
                    .filter(|&i| grid.cell(line_pos(row_base, line, i)).is_candidate(value))
                    .count();
                count != 0 && count <= order
            })
            .collect()
    }

    /// Tries one base line set; on success eliminates and logs.
    fn fish_with_base(
        grid: &mut Grid,
        value: Digit,
        base: &[u8],
        order: usize,
        row_base: bool,
    ) -> bool {
        let mut cover: ArrayVec<[u8; 4]> = ArrayVec::new();
        for &line in base {
            for i in 0..9 {
                if grid.cell(line_pos(row_base, line, i)).is_candidate(value)
                    && !cover.contains(&i)
                {
                    if cover.len() >= order {
                        return false;
                    }
                    cover.push(i);
                }
            }
        }
        if cover.len() != order {
            return false;
        }

        let mut changed = Vec::new();
        for line in 0..9 {
            if base.contains(&line) {
                continue;
            }
            for &i in &cover {
                // The cover runs perpendicular to the base, so swap the roles.
                let pos = line_pos(row_base, line, i);
                if grid.exclude_candidate(pos, value) {
                    changed.push((pos, value));
                }
            }
        }
        if changed.is_empty() {
            return false;
        }

        let mut fish = String::new();
        fish.push(if row_base { 'r' } else { 'c' });
        for &line in base {
            let _ = write!(fish, "{}", line + 1);
        }
        fish.push('/');
        fish.push(if row_base { 'c' } else { 'r' });
        for &i in &cover {
            let _ = write!(fish, "{}", i + 1);
        }
        log::info!(
            "{} {fish}={value} ==> {}",
            order_to_string(order),
            eliminations_string(&changed)
        );
        true
    }

    fn fish_for_value(&self, grid: &mut Grid, value: Digit, row_base: bool) -> bool {
        let lines = Self::possible_base_lines(grid, value, self.order, row_base);
        if lines.len() < self.order {
            return false;
        }
        let Some(mut combo) = first_combination(self.order, lines.len()) else {
            return false;
        };
        loop {
            let base: Vec<u8> = combo.iter().map(|&i| lines[i]).collect();
            if Self::fish_with_base(grid, value, &base, self.order, row_base) {
                return true;
            }
            if !next_combination(&mut combo, lines.len()) {
                return false;
            }
        }
    }
}

/// Position `i` along a line: `(line, i)` for rows, `(i, line)` for columns.
fn line_pos(row_base: bool, line: u8, i: u8) -> Position {
    if row_base {
        Position::new(line, i)
    } else {
        Position::new(i, line)
    }
}

pub(super) const fn order_to_string(order: usize) -> &'static str {
    match order {
        1 => "1-fish",
        2 => "x-wing",
        3 => "swordfish",
        4 => "jellyfish",
        5 => "squirmbag",
        6 => "whale",
        7 => "leviathan",
        _ => "unknown",
    }
}

impl Technique for BasicFish {
    fn name(&self) -> &'static str {
        order_to_string(self.order)
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for basic fish of order {}", self.order);
        for value in Digit::ALL {
            if self.order > Self::max_order(grid, value) {
                continue;
            }
            if self.fish_for_value(grid, value, true) {
                return true;
            }
            if self.fish_for_value(grid, value, false) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TechniqueTester;

    /// Confines `value` in the given row to the two columns.
    fn confine_row(grid: &mut Grid, value: Digit, row: u8, cols: [u8; 2]) {
        for col in 0..9 {
            if !cols.contains(&col) {
                grid.exclude_candidate(Position::new(row, col), value);
            }
        }
    }

    #[test]
    fn test_x_wing_row_base() {
        let mut grid = Grid::new();
        // Value 4 confined to columns 4 and 8 within rows 3 and 6.
        confine_row(&mut grid, Digit::D4, 2, [3, 7]);
        confine_row(&mut grid, Digit::D4, 5, [3, 7]);

        TechniqueTester::new(grid)
            .apply_once(&BasicFish::x_wing())
            // The rest of the cover columns lose the value.
            .assert_removed_includes(Position::new(0, 3), [Digit::D4])
            .assert_removed_includes(Position::new(8, 7), [Digit::D4])
            // The fish corners keep it.
            .assert_no_change(Position::new(2, 3))
            .assert_no_change(Position::new(5, 7));
    }

    #[test]
    fn test_swordfish_column_base() {
        let mut grid = Grid::new();
        // Value 6 confined to rows 0, 4, 8 in columns 0, 4, 8.
        for &col in &[0, 4, 8] {
            for row in 0..9 {
                if row != 0 && row != 4 && row != 8 {
                    grid.exclude_candidate(Position::new(row, col), Digit::D6);
                }
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&BasicFish::swordfish())
            .assert_removed_includes(Position::new(0, 1), [Digit::D6])
            .assert_removed_includes(Position::new(4, 5), [Digit::D6])
            .assert_removed_includes(Position::new(8, 7), [Digit::D6]);
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new())
            .assert_stuck(&BasicFish::x_wing())
            .assert_stuck(&BasicFish::swordfish())
            .assert_stuck(&BasicFish::jellyfish());
    }
}
