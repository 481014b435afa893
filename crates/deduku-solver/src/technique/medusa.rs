//! 3D medusa colouring.
//!
//! The 3D variant colours *candidates* rather than cells: a node is a
//! `(position, value)` pair. Conjugate links come from houses holding a
//! value exactly twice (as in 2D colouring) and additionally from bivalue
//! cells, whose two candidates are conjugate. Two nodes are *weakly linked*
//! when they share a cell with different values, or share a value in cells
//! that are buddies.

use std::collections::{BTreeMap, BTreeSet};

use deduku_core::{Digit, Grid, House, Position};

use super::{
    BoxedTechnique, Technique,
    coloring::{Color, ColorChains, bilocation},
    eliminations_string,
};

const NAME: &str = "3d medusa colors";

/// A coloured candidate: one value in one cell.
type Node = (Position, Digit);

type NodeColorMap = BTreeMap<Node, Color>;

/// 3D medusa colouring with four elimination rules: a candidate seeing both
/// parities of a chain, a parity class weakly linked to itself, a class
/// whose coverage holds both parities of another chain, and the colour-wing
/// rule over weak class links.
#[derive(Debug, Default, Clone, Copy)]
pub struct MedusaColor;

impl MedusaColor {
    /// Creates a new `MedusaColor` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn weakly_linked(a: Node, b: Node) -> bool {
    (a.0 == b.0 && a.1 != b.1) || (a.1 == b.1 && a.0 != b.0 && a.0.is_buddy(b.0))
}

fn build_medusa_colors(grid: &Grid) -> NodeColorMap {
    let mut chains = ColorChains::new();
    for i in 0..9 {
        for value in Digit::ALL {
            for house in [House::Row(i), House::Col(i), House::Box(i)] {
                if let Some((a, b)) = bilocation(grid, house, value) {
                    chains.add_conjugate((a, value), (b, value));
                }
            }
        }
    }
    for pos in Position::all() {
        if let Some((v1, v2)) = grid.cell(pos).candidates().as_pair() {
            chains.add_conjugate((pos, v1), (pos, v2));
        }
    }
    chains.into_color_map()
}

fn color_set(colors: &NodeColorMap) -> BTreeSet<Color> {
    colors.values().copied().collect()
}

fn members(colors: &NodeColorMap, color: Color) -> Vec<Node> {
    colors
        .iter()
        .filter(|&(_, &c)| c == color)
        .map(|(&node, _)| node)
        .collect()
}

/// All nodes a coloured candidate is weakly linked to: the other candidates
/// of its own cell, and the same value in buddy cells.
fn node_coverage(grid: &Grid, node: Node) -> BTreeSet<Node> {
    let (pos, value) = node;
    let mut coverage = BTreeSet::new();
    for other in grid.cell(pos).candidates() {
        if other != value {
            coverage.insert((pos, other));
        }
    }
    for buddy in pos.buddies() {
        if grid.cell(buddy).is_candidate(value) {
            coverage.insert((buddy, value));
        }
    }
    coverage
}

fn class_coverage(grid: &Grid, colors: &NodeColorMap, color: Color) -> BTreeSet<Node> {
    let mut coverage = BTreeSet::new();
    for node in members(colors, color) {
        coverage.extend(node_coverage(grid, node));
    }
    coverage
}

fn remove_color(
    grid: &mut Grid,
    colors: &NodeColorMap,
    color: Color,
    changed: &mut Vec<(Position, Digit)>,
) {
    for (&(pos, value), &c) in colors {
        if c == color && grid.exclude_candidate(pos, value) {
            changed.push((pos, value));
        }
    }
}

/// Rule 1: an uncoloured candidate weakly linked to both parities of one
/// chain is false.
fn eliminate_candidates_seeing_conjugates(grid: &mut Grid, colors: &NodeColorMap) -> bool {
    let mut changed = Vec::new();
    for pos in Position::all() {
        if grid.cell(pos).is_solved() {
            continue;
        }
        for value in grid.cell(pos).candidates() {
            let node = (pos, value);
            if colors.contains_key(&node) {
                continue;
            }
            let seen: BTreeSet<Color> = node_coverage(grid, node)
                .iter()
                .filter_map(|linked| colors.get(linked).copied())
                .collect();
            if seen.iter().any(|c| seen.contains(&c.flipped()))
                && grid.exclude_candidate(pos, value)
            {
                changed.push((pos, value));
            }
        }
    }
    if changed.is_empty() {
        return false;
    }
    log::info!(
        "{NAME} (candidate sees both colors) ==> {}",
        eliminations_string(&changed)
    );
    true
}

/// Rule 2: a parity class containing two weakly linked nodes is false.
fn eliminate_colors_seeing_themselves(grid: &mut Grid, colors: &NodeColorMap) -> bool {
    let mut changed_any = false;
    for &color in &color_set(colors) {
        let nodes = members(colors, color);
        let sees_itself = nodes
            .iter()
            .enumerate()
            .any(|(i, &a)| nodes[i + 1..].iter().any(|&b| weakly_linked(a, b)));
        if !sees_itself {
            continue;
        }
        let mut changed = Vec::new();
        remove_color(grid, colors, color, &mut changed);
        if !changed.is_empty() {
            log::info!(
                "{NAME} (color sees itself) ==> {}",
                eliminations_string(&changed)
            );
            changed_any = true;
        }
    }
    changed_any
}

/// Rule 3: a class whose coverage holds both parities of another chain is
/// false.
fn eliminate_colors_seeing_conjugates(grid: &mut Grid, colors: &NodeColorMap) -> bool {
    let mut changed_any = false;
    for &color in &color_set(colors) {
        let coverage = class_coverage(grid, colors, color);
        let seen: BTreeSet<Color> = coverage
            .iter()
            .filter_map(|node| colors.get(node).copied())
            .collect();
        if !seen.iter().any(|c| seen.contains(&c.flipped())) {
            continue;
        }
        let mut changed = Vec::new();
        remove_color(grid, colors, color, &mut changed);
        if !changed.is_empty() {
            log::info!(
                "{NAME} (color sees conjugate colors) ==> {}",
                eliminations_string(&changed)
            );
            changed_any = true;
        }
    }
    changed_any
}

/// Weakly linked class pairs from distinct chains, stored parity-flipped.
fn color_links(colors: &NodeColorMap) -> BTreeSet<(Color, Color)> {
    let mut links = BTreeSet::new();
    for (i, (&a, &color_a)) in colors.iter().enumerate() {
        for (&b, &color_b) in colors.iter().skip(i + 1) {
            if color_a.id != color_b.id && weakly_linked(a, b) {
                links.insert((color_a.flipped(), color_b.flipped()));
            }
        }
    }
    links
}

/// Rule 4: for a colour wing, any candidate in both flipped coverages is
/// false.
fn eliminate_candidates_seeing_color_wing(grid: &mut Grid, colors: &NodeColorMap) -> bool {
    let mut changed = Vec::new();
    for &(first, second) in &color_links(colors) {
        let coverage_first = class_coverage(grid, colors, first);
        let coverage_second = class_coverage(grid, colors, second);
        for &(pos, value) in coverage_first.intersection(&coverage_second) {
            if grid.exclude_candidate(pos, value) {
                changed.push((pos, value));
            }
        }
    }
    if changed.is_empty() {
        return false;
    }
    log::info!(
        "{NAME} (candidate sees color wing) ==> {}",
        eliminations_string(&changed)
    );
    true
}

impl Technique for MedusaColor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for 3d medusa color eliminations");
        let colors = build_medusa_colors(grid);
        eliminate_candidates_seeing_conjugates(grid, &colors)
            || eliminate_colors_seeing_themselves(grid, &colors)
            || eliminate_colors_seeing_conjugates(grid, &colors)
            || eliminate_candidates_seeing_color_wing(grid, &colors)
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::DigitSet;

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_weak_links() {
        let a = (Position::new(0, 0), Digit::D1);
        assert!(weakly_linked(a, (Position::new(0, 0), Digit::D2)));
        assert!(weakly_linked(a, (Position::new(0, 5), Digit::D1)));
        assert!(!weakly_linked(a, (Position::new(0, 5), Digit::D2)));
        assert!(!weakly_linked(a, (Position::new(5, 5), Digit::D1)));
        assert!(!weakly_linked(a, a));
    }

    #[test]
    fn test_bivalue_cells_join_chains() {
        let mut grid = Grid::new();
        // Value 1 twice in row 1 (r1c1, r1c5); both cells bivalue {1,2}.
        for pos in House::Row(0).positions() {
            if pos.col() != 0 && pos.col() != 4 {
                grid.exclude_candidate(pos, Digit::D1);
            }
        }
        let keep = DigitSet::from_iter([Digit::D1, Digit::D2]);
        for pos in [Position::new(0, 0), Position::new(0, 4)] {
            for value in !keep {
                grid.exclude_candidate(pos, value);
            }
        }

        // The bivalue links force the two cells' 2-candidates to opposite
        // parities, so every other row-1 cell sees both colours of 2.
        TechniqueTester::new(grid)
            .apply_once(&MedusaColor::new())
            .assert_removed_includes(Position::new(0, 1), [Digit::D2])
            .assert_removed_includes(Position::new(0, 7), [Digit::D2])
            .assert_no_change(Position::new(1, 0))
            .assert_no_change(Position::new(1, 3));
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new()).assert_stuck(&MedusaColor::new());
    }
}
