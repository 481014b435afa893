use deduku_core::Grid;

use super::{
    BasicFish, BoxedTechnique, HiddenSet, HiddenSingle, IntersectionRemoval, MultiColor, NakedSet,
    NakedSingle, SimpleColor, Technique, XyWing,
};

const NAME: &str = "simple sudoku technique set";

/// The composite technique set popularised by the Simple Sudoku program:
/// a fixed sub-sequence of techniques, applied in order, returning after
/// the first one that makes progress.
#[derive(Debug, Clone)]
pub struct SimpleSudokuTechniqueSet {
    techniques: Vec<BoxedTechnique>,
}

impl Default for SimpleSudokuTechniqueSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleSudokuTechniqueSet {
    /// Creates the composite with its fixed sub-sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            techniques: vec![
                Box::new(NakedSingle::new()),
                Box::new(HiddenSingle::new()),
                Box::new(NakedSet::pair()),
                Box::new(IntersectionRemoval::new()),
                Box::new(NakedSet::triple()),
                Box::new(NakedSet::quad()),
                Box::new(HiddenSet::pair()),
                Box::new(BasicFish::x_wing()),
                Box::new(BasicFish::swordfish()),
                Box::new(SimpleColor::new()),
                Box::new(MultiColor::new()),
                Box::new(HiddenSet::triple()),
                Box::new(XyWing::new()),
                Box::new(HiddenSet::quad()),
                Box::new(BasicFish::jellyfish()),
            ],
        }
    }
}

impl Technique for SimpleSudokuTechniqueSet {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(self.clone())
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("applying simple sudoku technique set");
        self.techniques.iter().any(|technique| technique.apply(grid))
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::{Digit, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_applies_first_successful_sub_technique() {
        let mut grid = Grid::new();
        for digit in Digit::ALL {
            if digit != Digit::D5 {
                grid.exclude_candidate(Position::new(4, 4), digit);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&SimpleSudokuTechniqueSet::new())
            .assert_placed(Position::new(4, 4), Digit::D5);
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new()).assert_stuck(&SimpleSudokuTechniqueSet::new());
    }
}
