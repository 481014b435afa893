//! Conjugate-link colouring: simple and multi colours.
//!
//! For one value, every house holding the value in exactly two cells is a
//! *conjugate link*: exactly one end is true. Chaining links colours the
//! linked cells with `(chain id, parity)` pairs so that within a chain, one
//! parity is entirely true and the other entirely false. The elimination
//! rules then reason about what each parity class "sees".

use std::collections::{BTreeMap, BTreeSet};

use deduku_core::{Digit, Grid, House, Position};

use super::{BoxedTechnique, Technique, eliminations_string};

/// A chain colour: class id plus parity. Flipping the parity is the only
/// relational operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Color {
    pub(super) id: usize,
    pub(super) parity: bool,
}

impl Color {
    /// The conjugate colour: same chain, opposite parity.
    #[must_use]
    pub(super) const fn flipped(self) -> Self {
        Self {
            id: self.id,
            parity: !self.parity,
        }
    }
}

/// Incremental conjugate-chain colouring over arbitrary node keys.
///
/// This is a path-compressed union-find that tracks each node's parity
/// relative to its class root, so merging two chains never has to relabel
/// existing entries. [`into_color_map`](Self::into_color_map) renumbers
/// classes in first-discovery order, which keeps downstream iteration (and
/// the resulting log lines) deterministic.
#[derive(Debug)]
pub(super) struct ColorChains<K> {
    nodes: Vec<K>,
    index: BTreeMap<K, usize>,
    parent: Vec<usize>,
    parity: Vec<bool>,
}

impl<K: Ord + Copy> ColorChains<K> {
    pub(super) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: BTreeMap::new(),
            parent: Vec::new(),
            parity: Vec::new(),
        }
    }

    fn node(&mut self, key: K) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(key);
        self.index.insert(key, i);
        self.parent.push(i);
        self.parity.push(false);
        i
    }

    /// Returns the class root of `x` and the parity of `x` relative to it.
    fn find(&mut self, x: usize) -> (usize, bool) {
        if self.parent[x] == x {
            return (x, self.parity[x]);
        }
        let (root, parent_parity) = self.find(self.parent[x]);
        self.parent[x] = root;
        self.parity[x] ^= parent_parity;
        (root, self.parity[x])
    }

    /// Records that `a` and `b` are conjugate: exactly one of them is true.
    ///
    /// A conjugate claim between nodes already forced to the same parity is
    /// ignored; that contradiction surfaces as an empty cell later, not
    /// here.
    pub(super) fn add_conjugate(&mut self, a: K, b: K) {
        let a = self.node(a);
        let b = self.node(b);
        let (root_a, parity_a) = self.find(a);
        let (root_b, parity_b) = self.find(b);
        if root_a == root_b {
            return;
        }
        self.parent[root_b] = root_a;
        self.parity[root_b] = !(parity_a ^ parity_b);
    }

    /// Resolves every node to a colour, with class ids assigned in node
    /// discovery order and the first node of each class given parity
    /// `false`.
    pub(super) fn into_color_map(mut self) -> BTreeMap<K, Color> {
        let mut class_of_root: BTreeMap<usize, (usize, bool)> = BTreeMap::new();
        let mut map = BTreeMap::new();
        for i in 0..self.nodes.len() {
            let (root, parity) = self.find(i);
            let next_id = class_of_root.len();
            let (id, flip) = *class_of_root.entry(root).or_insert((next_id, parity));
            map.insert(self.nodes[i], Color {
                id,
                parity: parity ^ flip,
            });
        }
        map
    }
}

type ColorMap = BTreeMap<Position, Color>;

/// The two cells of a conjugate link in `house`, if the value appears as a
/// candidate exactly twice.
pub(super) fn bilocation(grid: &Grid, house: House, value: Digit) -> Option<(Position, Position)> {
    let mut found: Option<(Position, Option<Position>)> = None;
    for pos in house.positions() {
        if !grid.cell(pos).is_candidate(value) {
            continue;
        }
        match &mut found {
            None => found = Some((pos, None)),
            Some((_, second @ None)) => *second = Some(pos),
            Some((_, Some(_))) => return None,
        }
    }
    let (first, second) = found?;
    Some((first, second?))
}

/// Colours every cell participating in a conjugate link for `value`.
fn build_color_map(grid: &Grid, value: Digit) -> ColorMap {
    let mut chains = ColorChains::new();
    for i in 0..9 {
        for house in [House::Row(i), House::Col(i), House::Box(i)] {
            if let Some((a, b)) = bilocation(grid, house, value) {
                chains.add_conjugate(a, b);
            }
        }
    }
    chains.into_color_map()
}

fn color_set(colors: &ColorMap) -> BTreeSet<Color> {
    colors.values().copied().collect()
}

/// Every position some cell of `color` can see.
fn color_coverage(colors: &ColorMap, color: Color) -> BTreeSet<Position> {
    let mut coverage = BTreeSet::new();
    for (&pos, &c) in colors {
        if c == color {
            coverage.extend(pos.buddies());
        }
    }
    coverage
}

/// Excludes `value` from every cell of `color`.
fn remove_color(
    grid: &mut Grid,
    colors: &ColorMap,
    color: Color,
    value: Digit,
    changed: &mut Vec<(Position, Digit)>,
) {
    for (&pos, &c) in colors {
        if c == color && grid.exclude_candidate(pos, value) {
            changed.push((pos, value));
        }
    }
}

/// Simple colouring for one value: three single-chain elimination rules.
///
/// - a non-chain cell seeing both parities of a chain loses the value;
/// - a parity class containing two cells that see each other is entirely
///   false;
/// - a parity class whose cells collectively see every open cell of some
///   house is entirely false.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleColor;

impl SimpleColor {
    /// Creates a new `SimpleColor` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rule A: a cell (outside the chain) seeing both parities of one chain
    /// cannot hold the value. Applies every such cell in one pass.
    fn eliminate_cells_seeing_both_colors(grid: &mut Grid, colors: &ColorMap, value: Digit) -> bool {
        let mut changed = Vec::new();
        for pos in Position::all() {
            if !grid.cell(pos).is_candidate(value) || colors.contains_key(&pos) {
                continue;
            }
            let seen: BTreeSet<Color> = pos
                .buddies()
                .iter()
                .filter_map(|buddy| colors.get(buddy).copied())
                .collect();
            if seen.iter().any(|color| seen.contains(&color.flipped()))
                && grid.exclude_candidate(pos, value)
            {
                changed.push((pos, value));
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "simple colors (cell sees both colors) ==> {}",
            eliminations_string(&changed)
        );
        true
    }

    /// Rule B: two cells of one `(id, parity)` class seeing each other make
    /// the whole class false.
    fn eliminate_color_sees_itself(grid: &mut Grid, colors: &ColorMap, value: Digit) -> bool {
        for (i, (&pos, &color)) in colors.iter().enumerate() {
            for (&other, &other_color) in colors.iter().skip(i + 1) {
                if color == other_color && pos.is_buddy(other) {
                    let mut changed = Vec::new();
                    remove_color(grid, colors, color, value, &mut changed);
                    if changed.is_empty() {
                        continue;
                    }
                    log::info!(
                        "simple colors (color sees itself) ==> {}",
                        eliminations_string(&changed)
                    );
                    return true;
                }
            }
        }
        false
    }

    /// Rule C: a class whose coverage includes every open cell of a house
    /// would empty that house if true, so it is false.
    fn eliminate_color_sees_house(grid: &mut Grid, colors: &ColorMap, value: Digit) -> bool {
        let mut changed = Vec::new();
        for &color in &color_set(colors) {
            let coverage = color_coverage(colors, color);
            for i in 0..9 {
                for house in [House::Row(i), House::Col(i), House::Box(i)] {
                    if Self::covers_all_open_cells(grid, house, &coverage, value) {
                        remove_color(grid, colors, color, value, &mut changed);
                    }
                }
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "simple colors (color sees all open cells in house) ==> {}",
            eliminations_string(&changed)
        );
        true
    }

    fn covers_all_open_cells(
        grid: &Grid,
        house: House,
        coverage: &BTreeSet<Position>,
        value: Digit,
    ) -> bool {
        let mut found_any = false;
        for pos in house.positions() {
            if grid.cell(pos).is_candidate(value) {
                if !coverage.contains(&pos) {
                    return false;
                }
                found_any = true;
            }
        }
        found_any
    }
}

impl Technique for SimpleColor {
    fn name(&self) -> &'static str {
        "simple colors"
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for simple color eliminations");
        for value in Digit::ALL {
            let colors = build_color_map(grid, value);
            if Self::eliminate_cells_seeing_both_colors(grid, &colors, value)
                || Self::eliminate_color_sees_itself(grid, &colors, value)
                || Self::eliminate_color_sees_house(grid, &colors, value)
            {
                return true;
            }
        }
        false
    }
}

/// Multi colouring for one value: eliminations across distinct chains.
///
/// - a parity class whose coverage contains both parities of another chain
///   is entirely false;
/// - when two classes of different chains see each other (a "colour wing"),
///   any cell seeing both of their conjugates loses the value.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiColor;

impl MultiColor {
    /// Creates a new `MultiColor` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn eliminate_color_sees_conjugates(grid: &mut Grid, colors: &ColorMap, value: Digit) -> bool {
        let mut changed = Vec::new();
        for &color in &color_set(colors) {
            let coverage = color_coverage(colors, color);
            let seen: BTreeSet<Color> = colors
                .iter()
                .filter(|(pos, _)| coverage.contains(pos))
                .map(|(_, &c)| c)
                .collect();
            if seen.iter().any(|c| seen.contains(&c.flipped())) {
                remove_color(grid, colors, color, value, &mut changed);
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "multi colors (color sees conjugate colors) ==> {}",
            eliminations_string(&changed)
        );
        true
    }

    /// Pairs of classes from distinct chains that see each other, stored
    /// parity-flipped: any cell seeing both flipped classes is false.
    fn color_links(colors: &ColorMap) -> BTreeSet<(Color, Color)> {
        let mut links = BTreeSet::new();
        for (i, (&pos, &color)) in colors.iter().enumerate() {
            for (&other, &other_color) in colors.iter().skip(i + 1) {
                if color.id != other_color.id && pos.is_buddy(other) {
                    links.insert((color.flipped(), other_color.flipped()));
                }
            }
        }
        links
    }

    fn eliminate_cells_seeing_color_wing(grid: &mut Grid, colors: &ColorMap, value: Digit) -> bool {
        let mut changed = Vec::new();
        for &(first, second) in &Self::color_links(colors) {
            let coverage_first = color_coverage(colors, first);
            let coverage_second = color_coverage(colors, second);
            for &pos in coverage_first.intersection(&coverage_second) {
                if grid.exclude_candidate(pos, value) {
                    changed.push((pos, value));
                }
            }
        }
        if changed.is_empty() {
            return false;
        }
        log::info!(
            "multi colors (cell sees color wing) ==> {}",
            eliminations_string(&changed)
        );
        true
    }
}

impl Technique for MultiColor {
    fn name(&self) -> &'static str {
        "multi colors"
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for multi color eliminations");
        for value in Digit::ALL {
            let colors = build_color_map(grid, value);
            if Self::eliminate_color_sees_conjugates(grid, &colors, value)
                || Self::eliminate_cells_seeing_color_wing(grid, &colors, value)
            {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TechniqueTester;

    /// Leaves `value` only in `keep` within `house`.
    fn bilocate(grid: &mut Grid, house: House, value: Digit, keep: [Position; 2]) {
        for pos in house.positions() {
            if !keep.contains(&pos) {
                grid.exclude_candidate(pos, value);
            }
        }
    }

    #[test]
    fn test_chain_parity_alternates() {
        let mut chains = ColorChains::new();
        chains.add_conjugate(0, 1);
        chains.add_conjugate(1, 2);
        chains.add_conjugate(3, 4);
        let map = chains.into_color_map();
        assert_eq!(map[&0], Color { id: 0, parity: false });
        assert_eq!(map[&1], Color { id: 0, parity: true });
        assert_eq!(map[&2], Color { id: 0, parity: false });
        assert_eq!(map[&3], Color { id: 1, parity: false });
        assert_eq!(map[&4], Color { id: 1, parity: true });
    }

    #[test]
    fn test_chain_merge_keeps_parity_constraints() {
        // Two chains merged by a later link spanning them.
        let mut chains = ColorChains::new();
        chains.add_conjugate(0, 1);
        chains.add_conjugate(2, 3);
        chains.add_conjugate(1, 2);
        let map = chains.into_color_map();
        assert_eq!(map[&0].id, map[&3].id);
        assert_eq!(map[&0].parity, map[&2].parity);
        assert_ne!(map[&1].parity, map[&2].parity);
    }

    #[test]
    fn test_cell_seeing_both_colors_loses_value() {
        let mut grid = Grid::new();
        // One chain for value 5: box 0 (r2c3/r3c2), column 1 (r3c2/r7c2),
        // row 7 (r7c2/r7c9). Parities: r2c3 -, r3c2 +, r7c2 -, r7c9 +.
        bilocate(&mut grid, House::Box(0), Digit::D5, [
            Position::new(1, 2),
            Position::new(2, 1),
        ]);
        bilocate(&mut grid, House::Col(1), Digit::D5, [
            Position::new(2, 1),
            Position::new(6, 1),
        ]);
        bilocate(&mut grid, House::Row(6), Digit::D5, [
            Position::new(6, 1),
            Position::new(6, 8),
        ]);

        TechniqueTester::new(grid)
            .apply_once(&SimpleColor::new())
            // r2c9 sees r2c3 (-) in its row and r7c9 (+) in its column.
            .assert_removed_exact(Position::new(1, 8), [Digit::D5])
            .assert_no_change(Position::new(1, 2))
            .assert_no_change(Position::new(6, 8))
            .assert_no_change(Position::new(1, 3));
    }

    #[test]
    fn test_multi_color_conjugates_in_coverage() {
        let mut grid = Grid::new();
        // Chain A for value 5: row 1 (r1c1/r1c9) + column 9 (r1c9/r9c9),
        // so r1c1 and r9c9 share parity (-). Chain B: box 7 (r7c1/r9c3).
        bilocate(&mut grid, House::Row(0), Digit::D5, [
            Position::new(0, 0),
            Position::new(0, 8),
        ]);
        bilocate(&mut grid, House::Col(8), Digit::D5, [
            Position::new(0, 8),
            Position::new(8, 8),
        ]);
        bilocate(&mut grid, House::Box(6), Digit::D5, [
            Position::new(6, 0),
            Position::new(8, 2),
        ]);

        // The (-) side of chain A sees r7c1 (via column 1) and r9c3 (via
        // row 9): both parities of chain B, so the (-) side of A is false.
        TechniqueTester::new(grid)
            .apply_once(&MultiColor::new())
            .assert_removed_exact(Position::new(0, 0), [Digit::D5])
            .assert_removed_exact(Position::new(8, 8), [Digit::D5])
            .assert_no_change(Position::new(0, 8))
            .assert_no_change(Position::new(6, 0))
            .assert_no_change(Position::new(8, 2));
    }

    #[test]
    fn test_no_change_on_open_grid() {
        TechniqueTester::new(Grid::new())
            .assert_stuck(&SimpleColor::new())
            .assert_stuck(&MultiColor::new());
    }
}
