//! Test harness for technique implementations.
//!
//! [`TechniqueTester`] tracks the initial and current state of a board,
//! applies techniques, and asserts on the difference with `#[track_caller]`
//! panics so failures point at the test line.

use deduku_core::{Digit, DigitSet, Grid, Position};

use crate::technique::Technique;

/// Cell-level equality, ignoring the uniqueness memo (which a technique may
/// legitimately fill in without touching any cell).
fn same_cells(a: &Grid, b: &Grid) -> bool {
    Position::all().all(|pos| a.cell(pos) == b.cell(pos))
}

/// A fluent tester for a single technique on a single board.
#[derive(Debug)]
pub struct TechniqueTester {
    initial: Grid,
    current: Grid,
}

impl TechniqueTester {
    /// Creates a tester from an initial grid.
    pub fn new(initial: Grid) -> Self {
        let current = initial.clone();
        Self { initial, current }
    }

    /// Creates a tester from a grid string in the whitespace-tolerant value
    /// format (`1..=9` values, `_`/`.`/`0` blanks).
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid grid.
    #[track_caller]
    pub fn from_str(s: &str) -> Self {
        Self::new(s.parse().unwrap())
    }

    /// Returns the current grid state.
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// Applies the technique once, asserting the reported change flag
    /// matches whether any cell actually changed.
    #[track_caller]
    pub fn apply_once<T: Technique>(mut self, technique: &T) -> Self {
        let before = self.current.clone();
        let changed = technique.apply(&mut self.current);
        assert_eq!(
            changed,
            !same_cells(&before, &self.current),
            "{} change report does not match the grid diff",
            technique.name()
        );
        self
    }

    /// Applies the technique until it reports no further progress.
    #[track_caller]
    pub fn apply_until_stuck<T: Technique>(mut self, technique: &T) -> Self {
        while technique.apply(&mut self.current) {}
        self
    }

    /// Asserts that the technique makes no change and is idempotent about it.
    #[track_caller]
    pub fn assert_stuck<T: Technique>(self, technique: &T) -> Self {
        let mut copy = self.current.clone();
        assert!(
            !technique.apply(&mut copy),
            "{} should report no change",
            technique.name()
        );
        assert!(
            same_cells(&copy, &self.current),
            "{} mutated a stuck grid",
            technique.name()
        );
        self
    }

    /// Asserts that an initially undecided cell is now solved with `value`.
    #[track_caller]
    pub fn assert_placed(self, pos: Position, value: Digit) -> Self {
        assert!(
            !self.initial.cell(pos).is_solved(),
            "cell {pos} was already solved in the initial grid"
        );
        let cell = self.current.cell(pos);
        assert!(cell.is_solved(), "expected {pos} to be solved");
        assert_eq!(cell.value(), value, "wrong value placed at {pos}");
        self
    }

    /// Asserts that all the given candidates were removed from `pos`
    /// (other candidates may have been removed too).
    #[track_caller]
    pub fn assert_removed_includes<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.cell(pos).candidates();
        let current = self.current.cell(pos).candidates();
        assert_eq!(
            initial & digits,
            digits,
            "initial candidates at {pos} should include {digits:?}, but are {initial:?}"
        );
        assert!(
            (current & digits).is_empty(),
            "expected {digits:?} removed from {pos}, but candidates are {current:?}"
        );
        self
    }

    /// Asserts that exactly the given candidates were removed from `pos`.
    #[track_caller]
    pub fn assert_removed_exact<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.cell(pos).candidates();
        let current = self.current.cell(pos).candidates();
        let removed = initial.difference(current);
        assert_eq!(
            removed, digits,
            "expected exactly {digits:?} removed from {pos} (initial {initial:?}, current {current:?})"
        );
        self
    }

    /// Asserts that the cell at `pos` is unchanged.
    #[track_caller]
    pub fn assert_no_change(self, pos: Position) -> Self {
        assert_eq!(
            self.initial.cell(pos),
            self.current.cell(pos),
            "expected no change at {pos}"
        );
        self
    }
}
