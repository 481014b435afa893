use std::fmt::Write as _;

use deduku_core::{Digit, DigitSet, Grid, Position};

use super::{BoxedTechnique, Technique, eliminations_string};

const NAME: &str = "xyz-wing";

/// An xyz-wing: a trivalent pivot `(x,y,z)` seeing bivalue wings `(x,z)` and
/// `(y,z)`. Every assignment of the pivot leaves `z` in one of the three
/// cells, so cells seeing all three lose `z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyzWing;

impl XyzWing {
    /// Creates a new `XyzWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn wing_for_cells(grid: &mut Grid, xyz: Position, xz: Position, yz: Position) -> bool {
        if grid.cell(xyz).num_candidates() != 3
            || grid.cell(xz).num_candidates() != 2
            || grid.cell(yz).num_candidates() != 2
        {
            return false;
        }
        let shared =
            grid.cell(xyz).candidates() & grid.cell(xz).candidates() & grid.cell(yz).candidates();
        let Some(z) = shared.iter().last() else {
            return false;
        };
        let Some(x) = grid.cell(xz).candidates().iter().find(|&d| d != z) else {
            return false;
        };
        let Some(y) = grid.cell(yz).candidates().iter().find(|&d| d != z) else {
            return false;
        };
        if x == y || x == z || y == z {
            return false;
        }
        if !grid.cell(xyz).is_candidate(x) || !grid.cell(xyz).is_candidate(y) {
            return false;
        }

        let mut changed = Vec::new();
        for buddy in xyz.buddies() {
            if buddy != xz
                && buddy != yz
                && buddy.is_buddy(xz)
                && buddy.is_buddy(yz)
                && grid.exclude_candidate(buddy, z)
            {
                changed.push((buddy, z));
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "xyz-wing {xz}={}, {xyz}={}, {yz}={} ==> {}",
            digits_string(DigitSet::from_iter([x, z])),
            digits_string(DigitSet::from_iter([x, y, z])),
            digits_string(DigitSet::from_iter([y, z])),
            eliminations_string(&changed)
        );
        true
    }
}

fn digits_string(digits: DigitSet) -> String {
    let mut out = String::new();
    for digit in digits {
        let _ = write!(out, "{digit}");
    }
    out
}

impl Technique for XyzWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for xyz-wings");
        for pivot in Position::all() {
            if grid.cell(pivot).num_candidates() != 3 {
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
