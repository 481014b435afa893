//! The solver loop, bifurcation, and uniqueness determination.

use deduku_core::{Grid, Position};

use crate::{
    logging,
    technique::{self, BoxedTechnique},
};

/// Drives an ordered technique list over a grid, optionally falling back to
/// bifurcation when every technique is stuck.
///
/// [`solve`](Self::solve) returns the number of solutions found, capped at
/// the point where the puzzle is known to be non-unique:
///
/// - `0`: the puzzle is impossible (or the solver gave up without
///   bifurcation before reaching a terminal state);
/// - `1`: a unique completion was found, and the grid now contains it;
/// - `2` or more: several completions exist; the grid is left in the state
///   of the most recently explored solution branch.
#[derive(Debug, Clone)]
pub struct Solver {
    techniques: Vec<BoxedTechnique>,
    use_bifurcation: bool,
}

impl Solver {
    /// Creates a solver over the given techniques, applied in order.
    #[must_use]
    pub fn new(techniques: Vec<BoxedTechnique>, use_bifurcation: bool) -> Self {
        Self {
            techniques,
            use_bifurcation,
        }
    }

    /// Creates a solver with the whole technique library.
    #[must_use]
    pub fn with_all_techniques(use_bifurcation: bool) -> Self {
        Self::new(technique::all_techniques(), use_bifurcation)
    }

    /// Returns the configured techniques in application order.
    #[must_use]
    pub fn techniques(&self) -> &[BoxedTechnique] {
        &self.techniques
    }

    /// Solves `grid` in place and returns the solution count (see the type
    /// docs). When a technique makes progress the walk restarts from the
    /// first technique, so cheaper deductions always run first.
    pub fn solve(&self, grid: &mut Grid) -> u32 {
        while !grid.is_futile() {
            if self.techniques.iter().any(|technique| technique.apply(grid)) {
                continue;
            }
            if self.use_bifurcation {
                return bifurcate(grid);
            }
            return 0;
        }
        u32::from(grid.is_solved())
    }
}

/// Picks the first cell (row-major) whose candidate count equals the global
/// minimum.
fn select_bifurcation_cell(grid: &Grid) -> Option<Position> {
    for n in 1..=9 {
        for pos in Position::all() {
            let cell = grid.cell(pos);
            if !cell.is_solved() && cell.num_candidates() == n {
                return Some(pos);
            }
        }
    }
    None
}

/// Depth-first case split on the minimum-candidate cell.
///
/// Each candidate of the chosen cell is tried in ascending order on a copy
/// of the grid, solved with the reduced single-placing technique set (and
/// further bifurcation), and the solution counts are summed, stopping as
/// soon as two solutions prove the puzzle non-unique. The grid of the most
/// recent solving branch is written back, so a count of 1 leaves the unique
/// completion in place.
///
/// When quiet bifurcation is enabled the log level is lowered for the
/// duration of the split, so branch exploration does not flood the log.
pub fn bifurcate(grid: &mut Grid) -> u32 {
    log::trace!("trying bifurcation");
    let Some(pos) = select_bifurcation_cell(grid) else {
        return 0;
    };
    log::info!("bifurcating on cell {pos}");
    let _quiet = logging::quiet_scope();

    let branch_solver = Solver::new(technique::bifurcation_techniques(), true);
    let mut num_solved = 0;
    let mut last_solution = None;
    for value in grid.cell(pos).candidates() {
        log::trace!("trying bifurcation on cell {pos} of candidate {value}");
        let mut branch = grid.clone();
        branch.place(pos, value);
        branch.cross_hatch(pos);

        let solutions = branch_solver.solve(&mut branch);
        if solutions > 0 {
            last_solution = Some(branch);
        }
        num_solved += solutions;
        if num_solved >= 2 {
            break;
        }
    }

    if let Some(solution) = last_solution {
        *grid = solution;
    }
    num_solved
}

/// Whether the puzzle has exactly one completion.
///
/// Memoised in the grid. The determination always runs full bifurcation on
/// a copy (the reduced technique set is sound because bifurcation itself is
/// complete), so the answer is exact rather than an upper bound.
pub fn is_unique(grid: &mut Grid) -> bool {
    if let Some(unique) = grid.uniqueness() {
        return unique;
    }
    log::trace!("uniqueness has not been determined yet, bifurcating to determine");
    let mut copy = grid.clone();
    let solver = Solver::new(technique::bifurcation_techniques(), true);
    let unique = solver.solve(&mut copy) == 1;
    if unique {
        log::trace!("determined puzzle to be unique");
    } else {
        log::trace!("determined puzzle to be non-unique");
    }
    grid.set_uniqueness(unique);
    unique
}

#[cfg(test)]
mod tests {
    use deduku_core::Digit;

    use super::*;
    use crate::technique::{HiddenSingle, NakedSingle, UniqueRectangle};

    const EUROPE_1: &str = "
        53. .7. ...
        6.. 195 ...
        .98 ... .6.
        8.. .6. ..3
        4.. 8.3 ..1
        7.. .2. ..6
        .6. ... 28.
        ... 419 ..5
        ... .8. .79
    ";

    const EUROPE_1_SOLUTION: &str = "\
        534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn singles() -> Vec<BoxedTechnique> {
        vec![Box::new(NakedSingle::new()), Box::new(HiddenSingle::new())]
    }

    fn assert_solution(grid: &Grid, expected: &str) {
        let expected: Grid = expected.parse().unwrap();
        for pos in Position::all() {
            assert_eq!(
                grid.cell(pos).value(),
                expected.cell(pos).value(),
                "wrong value at {pos}"
            );
        }
    }

    /// A 77-given grid with exactly two completions: the Europe-1 solution
    /// with a swappable 6/7 rectangle (rows 1/4, columns 4/5) cleared.
    fn two_solution_grid() -> Grid {
        let solution: Grid = EUROPE_1_SOLUTION.parse().unwrap();
        let cleared = [
            Position::new(0, 3),
            Position::new(0, 4),
            Position::new(3, 3),
            Position::new(3, 4),
        ];
        let mut grid = Grid::new();
        for pos in Position::all() {
            if !cleared.contains(&pos) {
                grid.place(pos, solution.cell(pos).value());
            }
        }
        grid.cross_hatch_all();
        grid
    }

    #[test]
    fn test_solves_trivial_puzzle_with_singles() {
        let mut grid: Grid = EUROPE_1.parse().unwrap();
        let solver = Solver::new(singles(), false);
        assert_eq!(solver.solve(&mut grid), 1);
        assert!(grid.is_solved());
        assert_solution(&grid, EUROPE_1_SOLUTION);
    }

    #[test]
    fn test_gives_up_without_techniques_or_bifurcation() {
        let mut grid: Grid = EUROPE_1.parse().unwrap();
        let solver = Solver::new(Vec::new(), false);
        assert_eq!(solver.solve(&mut grid), 0);
        assert!(!grid.is_solved());
    }

    #[test]
    fn test_bifurcation_alone_solves_unique_puzzle() {
        // Dead branches contribute zero; the surviving branch writes the
        // unique completion back.
        let mut grid: Grid = EUROPE_1.parse().unwrap();
        let solver = Solver::new(Vec::new(), true);
        assert_eq!(solver.solve(&mut grid), 1);
        assert_solution(&grid, EUROPE_1_SOLUTION);
    }

    #[test]
    fn test_detects_two_solutions() {
        let mut grid = two_solution_grid();
        let solver = Solver::new(Vec::new(), true);
        assert_eq!(solver.solve(&mut grid), 2);
    }

    #[test]
    fn test_solution_counting_monotone_under_techniques() {
        // Singles plus bifurcation agree with bare bifurcation.
        let mut grid = two_solution_grid();
        let solver = Solver::new(singles(), true);
        assert_eq!(solver.solve(&mut grid), 2);
    }

    #[test]
    fn test_is_unique_memoises() {
        let mut grid: Grid = EUROPE_1.parse().unwrap();
        assert_eq!(grid.uniqueness(), None);
        assert!(is_unique(&mut grid));
        assert_eq!(grid.uniqueness(), Some(true));
        // The original board is untouched by the determination.
        assert!(!grid.cell(Position::new(0, 2)).is_solved());

        let mut grid = two_solution_grid();
        assert!(!is_unique(&mut grid));
        assert_eq!(grid.uniqueness(), Some(false));
    }

    #[test]
    fn test_is_unique_matches_bifurcating_solve() {
        for grid in [EUROPE_1.parse::<Grid>().unwrap(), two_solution_grid()] {
            let mut memo = grid.clone();
            let mut counted = grid.clone();
            let solver = Solver::new(singles(), true);
            assert_eq!(is_unique(&mut memo), solver.solve(&mut counted) == 1);
        }
    }

    #[test]
    fn test_unique_rectangle_skipped_on_non_unique_puzzle() {
        // The technique refuses to run, then plain bifurcation reports both
        // completions.
        let mut grid = two_solution_grid();
        let solver = Solver::new(vec![Box::new(UniqueRectangle::new())], true);
        assert_eq!(solver.solve(&mut grid), 2);
        assert_eq!(grid.uniqueness(), Some(false));
    }

    #[test]
    fn test_candidates_only_shrink_during_solve() {
        let start: Grid = EUROPE_1.parse().unwrap();
        let mut grid = start.clone();
        let solver = Solver::new(singles(), false);
        solver.solve(&mut grid);
        for pos in Position::all() {
            let before = start.cell(pos);
            let after = grid.cell(pos);
            if before.is_solved() {
                assert_eq!(after.value(), before.value());
            } else if !after.is_solved() {
                assert!(after.candidates().is_subset(before.candidates()));
            }
        }
    }

    #[test]
    fn test_solved_grid_counts_as_one() {
        let mut grid: Grid = EUROPE_1_SOLUTION.parse().unwrap();
        let solver = Solver::new(Vec::new(), true);
        assert_eq!(solver.solve(&mut grid), 1);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut grid: Grid = EUROPE_1.parse().unwrap();
            Solver::new(singles(), true).solve(&mut grid);
            grid
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_candidate_cell_rejects_branch() {
        // A grid made inconsistent by hand is reported impossible.
        let mut grid: Grid = EUROPE_1.parse().unwrap();
        for digit in Digit::ALL {
            grid.exclude_candidate(Position::new(0, 2), digit);
        }
        let solver = Solver::new(singles(), true);
        assert_eq!(solver.solve(&mut grid), 0);
    }
}
