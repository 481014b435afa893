//! The deduction technique library.
//!
//! Each technique implements the [`Technique`] trait: it scans the grid in
//! its own documented order, applies the first deduction it finds, emits one
//! `info` log line describing the eliminations, and reports whether the grid
//! changed. A technique that finds nothing returns `false` without side
//! effects, so calling it again on the same grid is a no-op.

use std::fmt::{Debug, Write as _};

use deduku_core::{Digit, Grid, Position};
use derive_more::{Display, Error};

pub use self::{
    basic_fish::BasicFish,
    coloring::{MultiColor, SimpleColor},
    fish::{FinnedFish, FrankenFish, MutantFish},
    hidden_single::HiddenSingle,
    intersection_removal::IntersectionRemoval,
    locked_set::{HiddenSet, NakedSet},
    medusa::MedusaColor,
    naked_single::NakedSingle,
    remote_pair::RemotePair,
    ssts::SimpleSudokuTechniqueSet,
    unique_rectangle::UniqueRectangle,
    xy_wing::XyWing,
    xyz_wing::XyzWing,
};

mod basic_fish;
mod coloring;
mod fish;
mod hidden_single;
mod intersection_removal;
mod locked_set;
mod medusa;
mod naked_single;
mod remote_pair;
mod ssts;
mod unique_rectangle;
mod xy_wing;
mod xyz_wing;

/// A Sudoku deduction technique.
///
/// Techniques are the only mutators the solver loop drives. They never fail:
/// an inconsistent grid is not a technique error, it is observed by the
/// solver through [`Grid::is_futile`].
pub trait Technique: Debug {
    /// Returns the display name of the technique.
    fn name(&self) -> &'static str;

    /// Returns a boxed clone of the technique.
    fn clone_box(&self) -> BoxedTechnique;

    /// Applies the technique to the grid.
    ///
    /// Returns `true` iff at least one cell was changed.
    fn apply(&self, grid: &mut Grid) -> bool;
}

/// A boxed technique.
pub type BoxedTechnique = Box<dyn Technique>;

impl Clone for BoxedTechnique {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Returns the whole technique library, ordered from easiest to hardest.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(NakedSingle::new()),
        Box::new(HiddenSingle::new()),
        Box::new(IntersectionRemoval::new()),
        Box::new(NakedSet::pair()),
        Box::new(NakedSet::triple()),
        Box::new(NakedSet::quad()),
        Box::new(HiddenSet::pair()),
        Box::new(HiddenSet::triple()),
        Box::new(HiddenSet::quad()),
        Box::new(BasicFish::x_wing()),
        Box::new(BasicFish::swordfish()),
        Box::new(BasicFish::jellyfish()),
        Box::new(XyWing::new()),
        Box::new(XyzWing::new()),
        Box::new(RemotePair::new()),
        Box::new(SimpleColor::new()),
        Box::new(MultiColor::new()),
        Box::new(MedusaColor::new()),
        Box::new(UniqueRectangle::new()),
        Box::new(FinnedFish::new()),
        Box::new(FrankenFish::new()),
        Box::new(MutantFish::new()),
    ]
}

/// The reduced technique set used inside bifurcation branches.
///
/// Bifurcation itself is complete, so singles are enough for correctness;
/// anything more is wasted work on throwaway branch copies.
#[must_use]
pub fn bifurcation_techniques() -> Vec<BoxedTechnique> {
    vec![Box::new(NakedSingle::new()), Box::new(HiddenSingle::new())]
}

/// An unknown token in a `-t` technique list.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown technique token '{token}'")]
pub struct UnknownTechniqueError {
    /// The offending token.
    pub token: String,
}

/// Resolves a single technique token (the `-t` vocabulary).
#[must_use]
pub fn from_token(token: &str) -> Option<BoxedTechnique> {
    Some(match token {
        "ssts" => Box::new(SimpleSudokuTechniqueSet::new()),
        "n1" => Box::new(NakedSingle::new()),
        "n2" => Box::new(NakedSet::pair()),
        "n3" => Box::new(NakedSet::triple()),
        "n4" => Box::new(NakedSet::quad()),
        "h1" => Box::new(HiddenSingle::new()),
        "h2" => Box::new(HiddenSet::pair()),
        "h3" => Box::new(HiddenSet::triple()),
        "h4" => Box::new(HiddenSet::quad()),
        "lc" => Box::new(IntersectionRemoval::new()),
        "bf2" => Box::new(BasicFish::x_wing()),
        "bf3" => Box::new(BasicFish::swordfish()),
        "bf4" => Box::new(BasicFish::jellyfish()),
        "xyw" => Box::new(XyWing::new()),
        "xyzw" => Box::new(XyzWing::new()),
        "rp" => Box::new(RemotePair::new()),
        "ur" => Box::new(UniqueRectangle::new()),
        "sc" => Box::new(SimpleColor::new()),
        "mc" => Box::new(MultiColor::new()),
        "3dmc" => Box::new(MedusaColor::new()),
        "fif" => Box::new(FinnedFish::new()),
        "frf" => Box::new(FrankenFish::new()),
        "mf" => Box::new(MutantFish::new()),
        _ => return None,
    })
}

/// Parses a comma-separated technique list in the order given.
///
/// # Errors
///
/// Returns [`UnknownTechniqueError`] for the first unrecognised token.
pub fn parse_list(list: &str) -> Result<Vec<BoxedTechnique>, UnknownTechniqueError> {
    list.split(',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            from_token(token).ok_or_else(|| UnknownTechniqueError {
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Formats an elimination list as `r{R}c{C}#{V}, ...` for the deduction log.
fn eliminations_string(changed: &[(Position, Digit)]) -> String {
    let mut out = String::new();
    for (i, (pos, value)) in changed.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{pos}#{value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let tokens = [
            "ssts", "n1", "n2", "n3", "n4", "h1", "h2", "h3", "h4", "lc", "bf2", "bf3", "bf4",
            "xyw", "xyzw", "rp", "ur", "sc", "mc", "3dmc", "fif", "frf", "mf",
        ];
        for token in tokens {
            assert!(from_token(token).is_some(), "token {token} should resolve");
        }
        assert!(from_token("nope").is_none());
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let techniques = parse_list("h1,n1,lc").unwrap();
        let names: Vec<_> = techniques.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["hidden single", "naked single", "locked candidates"]);
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        let err = parse_list("n1,bogus").unwrap_err();
        assert_eq!(err.token, "bogus");
    }

    #[test]
    fn test_eliminations_string() {
        let changed = vec![
            (Position::new(0, 4), Digit::D7),
            (Position::new(3, 3), Digit::D2),
        ];
        assert_eq!(eliminations_string(&changed), "r1c5#7, r4c4#2");
    }
}
