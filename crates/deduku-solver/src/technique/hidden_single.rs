use deduku_core::{Digit, Grid, House};

use super::{BoxedTechnique, Technique};

const NAME: &str = "hidden single";

/// Places a digit that has only one remaining position in a house.
///
/// Houses are scanned in row, column, box order (indices ascending), digits
/// ascending within each house. Like [`NakedSingle`](super::NakedSingle),
/// every placement cross-hatches its buddies and the pass repeats until a
/// full scan finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle;

impl HiddenSingle {
    /// Creates a new `HiddenSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the in-house index of the only cell holding `value` as a
    /// candidate, if there is exactly one.
    fn single_position_in_house(grid: &Grid, house: House, value: Digit) -> Option<u8> {
        let mut found = None;
        for (i, cell) in grid.cells_in(house).into_iter().enumerate() {
            if cell.is_candidate(value) {
                if found.is_some() {
                    return None;
                }
                #[expect(clippy::cast_possible_truncation)]
                {
                    found = Some(i as u8);
                }
            }
        }
        found
    }
}

impl Technique for HiddenSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("looking for hidden singles");
        let mut changed = false;
        loop {
            let mut found = false;
            for house in House::ALL {
                for value in Digit::ALL {
                    let Some(i) = Self::single_position_in_house(grid, house, value) else {
                        continue;
                    };
                    let pos = house.position(i);
                    grid.place(pos, value);
                    grid.cross_hatch(pos);
                    log::info!("hidden single in {} ==> {pos} = {value}", house.kind());
                    found = true;
                }
            }
            changed |= found;
            if !found {
                break;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::Position;

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_hidden_single_in_row() {
        let mut grid = Grid::new();
        // D5 can only go at r1c4 within row 0.
        for pos in House::Row(0).positions() {
            if pos.col() != 3 {
                grid.exclude_candidate(pos, Digit::D5);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&HiddenSingle::new())
            .assert_placed(Position::new(0, 3), Digit::D5);
    }

    #[test]
    fn test_hidden_single_in_column() {
        let mut grid = Grid::new();
        for pos in House::Col(5).positions() {
            if pos.row() != 4 {
                grid.exclude_candidate(pos, Digit::D7);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&HiddenSingle::new())
            .assert_placed(Position::new(4, 5), Digit::D7);
    }

    #[test]
    fn test_hidden_single_in_box() {
        let mut grid = Grid::new();
        for pos in House::Box(4).positions() {
            if pos != Position::new(4, 4) {
                grid.exclude_candidate(pos, Digit::D9);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&HiddenSingle::new())
            .assert_placed(Position::new(4, 4), Digit::D9);
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new()).assert_stuck(&HiddenSingle::new());
    }
}
