//! The deduku deduction engine: technique library, solver loop, bifurcation.
//!
//! # Overview
//!
//! The solver applies an ordered list of human-style deduction
//! [`Technique`](technique::Technique)s to a [`Grid`](deduku_core::Grid).
//! Each technique scans the board in its own documented order, makes the
//! first eliminations it finds, emits one log line describing them, and
//! reports whether it changed anything. When a technique succeeds the solver
//! restarts from the first technique, so cheaper deductions are always
//! preferred.
//!
//! When every technique is stuck, the solver can fall back to
//! *bifurcation*: a depth-first case split on the cell with the fewest
//! candidates, counting solutions across branches. Bifurcation is complete,
//! so it also powers uniqueness determination ([`is_unique`]).
//!
//! # Logging
//!
//! Deductions are reported through the [`log`] facade at `info` level; scan
//! traces at `trace`. The log line text is part of this crate's observable
//! surface (it is what the `solver` binary prints). The process-wide
//! severity filter and the quiet-bifurcation switch live in [`logging`].
//!
//! # Failure semantics
//!
//! Techniques never fail: they either mutate the grid and return `true` or
//! leave it untouched and return `false`. An inconsistent board (a cell
//! with no value and no candidates) is detected by the solver loop through
//! [`Grid::is_futile`](deduku_core::Grid::is_futile) and simply rejects the
//! current bifurcation branch.

pub use self::solver::{Solver, bifurcate, is_unique};

pub mod combinations;
pub mod logging;
mod solver;
pub mod technique;

#[cfg(test)]
mod testing;
