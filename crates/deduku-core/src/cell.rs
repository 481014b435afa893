//! A single board cell: a solved value or a set of candidates.

use crate::{Digit, DigitSet};

/// A Sudoku cell.
///
/// A cell is either *solved* (it holds a value and its candidate set is
/// empty) or *unsolved* (it holds a candidate set). A fresh cell has all nine
/// candidates. An unsolved cell whose candidate set has been emptied is the
/// inconsistency signal the solver loop watches for; the cell type itself
/// does not reject that state.
///
/// Candidate removal is monotone: the set only ever shrinks, and a solved
/// value never changes. Excluding the last remaining candidate does **not**
/// promote the cell to a value; placing values is the naked-single
/// technique's job, not the mutator's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    value: Option<Digit>,
    candidates: DigitSet,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Creates an unsolved cell with all nine candidates.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {
            value: None,
            candidates: DigitSet::FULL,
        }
    }

    /// Creates a solved cell holding `value`.
    #[must_use]
    #[inline]
    pub const fn with_value(value: Digit) -> Self {
        Self {
            value: Some(value),
            candidates: DigitSet::EMPTY,
        }
    }

    /// Returns `true` if the cell holds a value.
    #[must_use]
    #[inline]
    pub const fn is_solved(self) -> bool {
        self.value.is_some()
    }

    /// Returns the solved value.
    ///
    /// # Panics
    ///
    /// Panics if the cell is not solved.
    #[must_use]
    #[inline]
    pub fn value(self) -> Digit {
        self.value.expect("cell has no value")
    }

    /// Returns the candidate set. Empty for solved cells.
    #[must_use]
    #[inline]
    pub const fn candidates(self) -> DigitSet {
        self.candidates
    }

    /// Returns `true` if `digit` is a candidate of this cell.
    #[must_use]
    #[inline]
    pub const fn is_candidate(self, digit: Digit) -> bool {
        self.candidates.contains(digit)
    }

    /// Returns the number of candidates (0 for solved or inconsistent cells).
    #[must_use]
    #[inline]
    pub const fn num_candidates(self) -> usize {
        self.candidates.len()
    }

    /// Solves the cell with `value`, clearing the candidate set.
    #[inline]
    pub fn set_value(&mut self, value: Digit) {
        self.value = Some(value);
        self.candidates.clear();
    }

    /// Removes `digit` from the candidate set.
    ///
    /// Returns `true` if a candidate was actually excluded. Never promotes
    /// the cell, even when a single candidate remains afterwards.
    #[inline]
    pub fn exclude_candidate(&mut self, digit: Digit) -> bool {
        self.candidates.remove(digit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_has_all_candidates() {
        let cell = Cell::new();
        assert!(!cell.is_solved());
        assert_eq!(cell.num_candidates(), 9);
        for digit in Digit::ALL {
            assert!(cell.is_candidate(digit));
        }
    }

    #[test]
    fn test_set_value_clears_candidates() {
        let mut cell = Cell::new();
        cell.set_value(Digit::D4);
        assert!(cell.is_solved());
        assert_eq!(cell.value(), Digit::D4);
        assert_eq!(cell.num_candidates(), 0);
        assert!(!cell.is_candidate(Digit::D4));
    }

    #[test]
    fn test_exclude_candidate_reports_change() {
        let mut cell = Cell::new();
        assert!(cell.exclude_candidate(Digit::D1));
        assert!(!cell.exclude_candidate(Digit::D1));
        assert_eq!(cell.num_candidates(), 8);
    }

    #[test]
    fn test_excluding_last_candidate_does_not_promote() {
        let mut cell = Cell::new();
        for digit in Digit::ALL {
            cell.exclude_candidate(digit);
        }
        // Zero candidates and no value: the inconsistency signal.
        assert!(!cell.is_solved());
        assert_eq!(cell.num_candidates(), 0);
    }

    #[test]
    #[should_panic(expected = "cell has no value")]
    fn test_value_of_unsolved_cell_panics() {
        let _ = Cell::new().value();
    }
}
