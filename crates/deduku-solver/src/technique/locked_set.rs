use std::fmt::Write as _;

use deduku_core::{Cell, Digit, DigitSet, Grid, House};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Technique, eliminations_string};
use crate::combinations::{first_combination, next_combination};

/// A naked set of fixed order (2-4): `order` unsolved cells in a house whose
/// united candidates are exactly `order` values, which the rest of the house
/// then cannot hold.
///
/// Houses are scanned as row *i*, column *i*, box *i* for *i* in `0..9`;
/// cell subsets within a house in lexicographic order.
#[derive(Debug, Clone, Copy)]
pub struct NakedSet {
    order: usize,
}

impl NakedSet {
    /// Naked pairs (order 2).
    #[must_use]
    pub const fn pair() -> Self {
        Self { order: 2 }
    }

    /// Naked triples (order 3).
    #[must_use]
    pub const fn triple() -> Self {
        Self { order: 3 }
    }

    /// Naked quads (order 4).
    #[must_use]
    pub const fn quad() -> Self {
        Self { order: 4 }
    }
}

/// A hidden set of fixed order (2-4): `order` values that between them
/// occupy only `order` cells of a house, which then lose all other
/// candidates.
#[derive(Debug, Clone, Copy)]
pub struct HiddenSet {
    order: usize,
}

impl HiddenSet {
    /// Hidden pairs (order 2).
    #[must_use]
    pub const fn pair() -> Self {
        Self { order: 2 }
    }

    /// Hidden triples (order 3).
    #[must_use]
    pub const fn triple() -> Self {
        Self { order: 3 }
    }

    /// Hidden quads (order 4).
    #[must_use]
    pub const fn quad() -> Self {
        Self { order: 4 }
    }
}

/// A locked set found in a house, ready for logging.
struct SetFind {
    /// In-house indices of the set cells, ascending.
    indices: Vec<usize>,
    /// The set values.
    values: DigitSet,
    /// Eliminations as (in-house index, value).
    changed: Vec<(usize, Digit)>,
}

const fn order_name(order: usize) -> &'static str {
    match order {
        2 => "pair",
        3 => "triplet",
        4 => "quad",
        _ => "unknown",
    }
}

/// An order-k set search only makes sense while the house has at least 2k
/// unsolved cells; beyond that the "set" would be most of the house.
fn max_set_size(cells: &[Cell; 9]) -> usize {
    cells.iter().filter(|cell| !cell.is_solved()).count() / 2
}

fn naked_set_in_house(cells: &mut [Cell; 9], order: usize) -> Option<SetFind> {
    if max_set_size(cells) < order {
        return None;
    }
    let pool: ArrayVec<[usize; 9]> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_solved() && cell.num_candidates() <= order)
        .map(|(i, _)| i)
        .collect();
    let mut combo = first_combination(order, pool.len())?;
    loop {
        let indices: Vec<usize> = combo.iter().map(|&i| pool[i]).collect();
        let mut values = DigitSet::EMPTY;
        for &i in &indices {
            values |= cells[i].candidates();
        }
        if values.len() == order {
            let mut changed = Vec::new();
            for (i, cell) in cells.iter_mut().enumerate() {
                if indices.contains(&i) {
                    continue;
                }
                for value in values {
                    if cell.exclude_candidate(value) {
                        changed.push((i, value));
                    }
                }
            }
            if !changed.is_empty() {
                return Some(SetFind {
                    indices,
                    values,
                    changed,
                });
            }
        }
        if !next_combination(&mut combo, pool.len()) {
            return None;
        }
    }
}

fn hidden_set_in_house(cells: &mut [Cell; 9], order: usize) -> Option<SetFind> {
    if max_set_size(cells) < order {
        return None;
    }
    let pool: ArrayVec<[u8; 9]> = Digit::ALL
        .into_iter()
        .filter(|&value| {
            let count = cells.iter().filter(|cell| cell.is_candidate(value)).count();
            count != 0 && count <= order
        })
        .map(Digit::value)
        .collect();
    let mut combo = first_combination(order, pool.len())?;
    loop {
        let values: DigitSet = combo
            .iter()
            .map(|&i| Digit::from_value(pool[i]))
            .collect();
        let mut indices: Vec<usize> = (0..9)
            .filter(|&i| !cells[i].candidates().is_disjoint(values))
            .collect();
        if indices.len() == order {
            indices.sort_unstable();
            let mut changed = Vec::new();
            for value in Digit::ALL {
                if values.contains(value) {
                    continue;
                }
                for &i in &indices {
                    if cells[i].exclude_candidate(value) {
                        changed.push((i, value));
                    }
                }
            }
            if !changed.is_empty() {
                return Some(SetFind {
                    indices,
                    values,
                    changed,
                });
            }
        }
        if !next_combination(&mut combo, pool.len()) {
            return None;
        }
    }
}

/// Formats the set location for the log line: `r4c56` for rows, `r56c4` for
/// columns, `r1c23&r2c1` for boxes (cells grouped by row).
fn set_location(house: House, find: &SetFind) -> String {
    let mut out = String::new();
    match house {
        House::Row(row) => {
            let _ = write!(out, "r{}c", row + 1);
            for &i in &find.indices {
                let _ = write!(out, "{}", i + 1);
            }
        }
        House::Col(col) => {
            out.push('r');
            for &i in &find.indices {
                let _ = write!(out, "{}", i + 1);
            }
            let _ = write!(out, "c{}", col + 1);
        }
        House::Box(_) => {
            let mut last_row = None;
            for (n, &i) in find.indices.iter().enumerate() {
                let pos = house.position(as_u8(i));
                if last_row == Some(pos.row()) {
                    let _ = write!(out, "{}", pos.col() + 1);
                } else {
                    if n != 0 {
                        out.push('&');
                    }
                    let _ = write!(out, "{pos}");
                    last_row = Some(pos.row());
                }
            }
        }
    }
    out
}

fn log_set(set_type: &str, order: usize, house: House, find: &SetFind) {
    let mut values = String::new();
    for value in find.values {
        let _ = write!(values, "{value}");
    }
    let changed: Vec<_> = find
        .changed
        .iter()
        .map(|&(i, value)| (house.position(as_u8(i)), value))
        .collect();
    log::info!(
        "{set_type} {} {}={values} ==> {}",
        order_name(order),
        set_location(house, find),
        eliminations_string(&changed)
    );
}

#[expect(clippy::cast_possible_truncation)]
fn as_u8(i: usize) -> u8 {
    i as u8
}

fn apply_set(
    grid: &mut Grid,
    order: usize,
    set_type: &str,
    search: impl Fn(&mut [Cell; 9], usize) -> Option<SetFind>,
) -> bool {
    for i in 0..9 {
        for house in [House::Row(i), House::Col(i), House::Box(i)] {
            let mut cells = grid.cells_in(house);
            if let Some(find) = search(&mut cells, order) {
                log_set(set_type, order, house, &find);
                grid.set_cells_in(house, cells);
                return true;
            }
        }
    }
    false
}

impl Technique for NakedSet {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "naked pair",
            3 => "naked triple",
            _ => "naked quad",
        }
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for naked sets of order {}", self.order);
        apply_set(grid, self.order, "naked", naked_set_in_house)
    }
}

impl Technique for HiddenSet {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "hidden pair",
            3 => "hidden triple",
            _ => "hidden quad",
        }
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for hidden sets of order {}", self.order);
        apply_set(grid, self.order, "hidden", hidden_set_in_house)
    }
}
