use deduku_core::{Grid, Position};

use super::{BoxedTechnique, Technique};

const NAME: &str = "naked single";

/// Places cells whose candidate set has shrunk to a single digit.
///
/// This is the only technique (besides hidden single) that sets values, and
/// with them performs the cross-hatch propagation every other technique
/// relies on. Cells are scanned in row-major order and the pass repeats
/// until a full scan places nothing, so cascades of singles resolve in one
/// call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingle;

impl NakedSingle {
    /// Creates a new `NakedSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Technique for NakedSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("looking for naked singles");
        let mut changed = false;
        loop {
            let mut found = false;
            for pos in Position::all() {
                let cell = grid.cell(pos);
                if cell.is_solved() {
                    continue;
                }
                if let Some(value) = cell.candidates().as_single() {
                    grid.place(pos, value);
                    grid.cross_hatch(pos);
                    log::info!("naked single ==> {pos} = {value}");
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
