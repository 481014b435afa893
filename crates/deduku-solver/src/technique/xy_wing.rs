use deduku_core::{Digit, Grid, Position};

use super::{BoxedTechnique, Technique, eliminations_string};

const NAME: &str = "xy-wing";

/// An xy-wing: three bivalue cells `(x,y)`, `(x,z)`, `(y,z)` where the pivot
/// `(x,y)` sees both wings. Whichever value the pivot takes, one wing
/// becomes `z`, so any cell seeing both wings loses `z`.
///
/// Pivots are scanned in row-major order; wing pairs in buddy-array order
/// (row partners, column partners, box stragglers).
#[derive(Debug, Default, Clone, Copy)]
pub struct XyWing;

impl XyWing {
    /// Creates a new `XyWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The candidate shared by two cells, if any (the larger one when both
    /// are shared).
    fn common_candidate(grid: &Grid, a: Position, b: Position) -> Option<Digit> {
        (grid.cell(a).candidates() & grid.cell(b).candidates()).iter().last()
    }

    /// The smallest candidate of `pos` other than `not`.
    fn other_candidate(grid: &Grid, pos: Position, not: Digit) -> Option<Digit> {
        grid.cell(pos).candidates().iter().find(|&d| d != not)
    }

    fn wing_for_cells(grid: &mut Grid, xy: Position, xz: Position, yz: Position) -> bool {
        if grid.cell(xy).num_candidates() != 2
            || grid.cell(xz).num_candidates() != 2
            || grid.cell(yz).num_candidates() != 2
        {
            return false;
        }
        let Some(x) = Self::common_candidate(grid, xy, xz) else {
            return false;
        };
        let Some(y) = Self::other_candidate(grid, xy, x) else {
            return false;
        };
        let Some(z) = Self::other_candidate(grid, xz, x) else {
            return false;
        };
        if x == y || x == z || y == z {
            return false;
        }
        if !grid.cell(yz).is_candidate(y) || !grid.cell(yz).is_candidate(z) {
            return false;
        }

        let mut changed = Vec::new();
        for buddy in xz.buddies() {
            if buddy != yz && buddy.is_buddy(yz) && grid.exclude_candidate(buddy, z) {
                changed.push((buddy, z));
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "xy-wing ({z}={x}){xz}-({x}={y}){xy}-({y}={z}){yz} ==> {}",
            eliminations_string(&changed)
        );
        true
    }
}

impl Technique for XyWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for xy-wings");
        for pivot in Position::all() {
            if grid.cell(pivot).num_candidates() != 2 {
                continue;
            }
            let buddies = pivot.buddies();
            for (i, &wing1) in buddies.iter().enumerate() {
                if grid.cell(wing1).num_candidates() != 2 {
                    continue;
                }
                for &wing2 in &buddies[i + 1..] {
                    if Self::wing_for_cells(grid, pivot, wing1, wing2) {
                        return true;
                    }
                }
            }
        }
        false
    }
}
