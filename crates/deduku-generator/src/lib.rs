//! Puzzle generation for the deduku engine.
//!
//! Generation is fill-then-prune:
//!
//! 1. **Fill**: walk the cells row-major; for each undecided cell try its
//!    candidates in shuffled order, keeping a placement as soon as the
//!    resulting board still has at least one completion. The first time a
//!    trial board proves *uniquely* solvable, that board's solution is the
//!    filled grid.
//! 2. **Prune**: walk the givens in shuffled order; clear each one whose
//!    removal keeps the puzzle uniquely solvable. With a maximum-givens
//!    target, the prune restarts from the filled grid with fresh shuffles
//!    until the target is met (a low target can take many rounds, and makes
//!    the puzzles easier rather than harder).
//!
//! Solution counting uses the singles-plus-bifurcation solver, which is
//! complete, so "uniquely solvable" here is exact.

use deduku_core::{Cell, Digit, Grid, Position};
use deduku_solver::{Solver, technique};
use rand::{Rng, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;

/// A puzzle generator over a caller-supplied random number generator.
///
/// The same RNG stream always produces the same puzzles, so seeding with
/// [`from_seed`](Generator::from_seed) gives reproducible output.
#[derive(Debug)]
pub struct Generator<R> {
    rng: R,
}

impl Generator<Pcg64Mcg> {
    /// Creates a generator with a deterministic stream for `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(Pcg64Mcg::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    /// Creates a generator using `rng` as its randomness source.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates one puzzle with a unique solution.
    ///
    /// With `max_givens`, prune rounds repeat until at most that many givens
    /// remain; otherwise a single prune pass is made.
    pub fn generate(&mut self, max_givens: Option<usize>) -> Grid {
        let filled = self.generate_filled();
        match max_givens {
            Some(givens) => self.prune_to_max_givens(&filled, givens),
            None => {
                let mut puzzle = filled;
                self.prune_pass(&mut puzzle);
                puzzle
            }
        }
    }

    /// Fills a board completely, keeping it solvable at every step.
    fn generate_filled(&mut self) -> Grid {
        let solver = counting_solver();
        let mut grid = Grid::new();
        for pos in Position::all() {
            let mut candidates: Vec<Digit> = grid.cell(pos).candidates().iter().collect();
            if candidates.is_empty() {
                continue;
            }
            candidates.shuffle(&mut self.rng);

            for &value in &candidates {
                let mut trial = grid.clone();
                trial.place(pos, value);
                trial.cross_hatch(pos);

                let mut counted = trial.clone();
                let solutions = solver.solve(&mut counted);
                if solutions == 1 {
                    // The counting solve left the full solution in place.
                    return counted;
                }
                if solutions > 1 {
                    grid = trial;
                    Solver::new(technique::bifurcation_techniques(), false).solve(&mut grid);
                    break;
                }
            }
        }
        grid
    }

    /// Clears every given whose removal keeps the solution unique.
    fn prune_pass(&mut self, grid: &mut Grid) {
        let solver = counting_solver();
        let mut cells: Vec<Position> = Position::all().collect();
        cells.shuffle(&mut self.rng);

        for pos in cells {
            if !grid.cell(pos).is_solved() {
                continue;
            }
            let mut trial = grid.clone();
            trial.set_cell(pos, Cell::new());
            trial.cross_hatch_all();
            if solver.solve(&mut trial) == 1 {
                grid.set_cell(pos, Cell::new());
            }
        }
    }

    fn prune_to_max_givens(&mut self, filled: &Grid, givens: usize) -> Grid {
        loop {
            let mut puzzle = filled.clone();
            self.prune_pass(&mut puzzle);
            if count_givens(&puzzle) <= givens {
                return puzzle;
            }
            log::debug!(
                "prune round left {} givens, retrying for {givens}",
                count_givens(&puzzle)
            );
        }
    }
}

fn counting_solver() -> Solver {
    Solver::new(technique::bifurcation_techniques(), true)
}

/// The number of solved cells in a board.
#[must_use]
pub fn count_givens(grid: &Grid) -> usize {
    Position::all()
        .filter(|&pos| grid.cell(pos).is_solved())
        .count()
}
