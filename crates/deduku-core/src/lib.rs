//! Core data structures for the deduku Sudoku inference engine.
//!
//! This crate provides the board model shared by the solver, generator, and
//! command-line tools:
//!
//! - [`Digit`]: type-safe Sudoku digits 1-9
//! - [`DigitSet`]: a 9-bit candidate bitmask with full set algebra
//! - [`Cell`]: a solved value or a non-empty candidate set
//! - [`Position`] and [`House`]: the row/column/box geometry, including the
//!   fixed-order 20-cell buddy list of every cell
//! - [`Grid`]: the 81-cell board with cross-hatching and a memoised
//!   uniqueness flag
//! - [`io`]: the three text formats (value, candidate grid, single line)
//!
//! The crate contains no solving logic. Deduction techniques, the solver
//! loop, and bifurcation live in `deduku-solver`; this crate only guarantees
//! the board invariants they rely on (candidate sets shrink monotonically,
//! solved values never change, cross-hatching strips a placed value from all
//! twenty buddies).

pub mod cell;
pub mod digit;
pub mod digit_set;
pub mod grid;
pub mod house;
pub mod io;
pub mod position;

pub use self::{
    cell::Cell,
    digit::Digit,
    digit_set::DigitSet,
    grid::Grid,
    house::House,
    io::{Format, ParseGridError},
    position::Position,
};
