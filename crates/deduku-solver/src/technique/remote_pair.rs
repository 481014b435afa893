use std::{collections::VecDeque, fmt::Write as _};

use deduku_core::{Digit, Grid, Position};

use super::{BoxedTechnique, Technique, eliminations_string};

const NAME: &str = "remote pairs";

/// Remote pairs: chains of bivalue cells sharing the same two candidates,
/// linked by the buddy relation. The two values alternate along the chain,
/// so cells at odd chain distance ≥ 3 form a pair of which one must hold
/// each value; any cell seeing both loses both values.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemotePair;

impl RemotePair {
    /// Creates a new `RemotePair` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

type Chain = VecDeque<Position>;

/// The two candidates of a bivalue chain cell.
fn pair_values(grid: &Grid, pos: Position) -> Option<(Digit, Digit)> {
    grid.cell(pos).candidates().as_pair()
}

/// One singleton chain per bivalue cell, row-major.
fn build_initial_chains(grid: &Grid) -> Vec<Chain> {
    Position::all()
        .filter(|&pos| grid.cell(pos).num_candidates() == 2)
        .map(|pos| Chain::from([pos]))
        .collect()
}

/// Extends each chain by one cell at the chosen end, if an unused buddy with
/// the same candidate pair exists.
fn add_layer(grid: &Grid, chains: &mut [Chain], back: bool) -> bool {
    let mut extended = false;
    for chain in chains.iter_mut() {
        let Some(&end) = (if back { chain.back() } else { chain.front() }) else {
            continue;
        };
        let Some((v1, v2)) = pair_values(grid, end) else {
            continue;
        };
        for buddy in end.buddies() {
            let cell = grid.cell(buddy);
            if cell.is_candidate(v1)
                && cell.is_candidate(v2)
                && cell.num_candidates() == 2
                && !chain.contains(&buddy)
            {
                if back {
                    chain.push_back(buddy);
                } else {
                    chain.push_front(buddy);
                }
                extended = true;
                break;
            }
        }
    }
    extended
}

/// Drops singleton chains and chains that overlap an earlier chain.
fn condense_chains(chains: &mut Vec<Chain>) -> bool {
    let mut merged = false;
    let mut i = 0;
    while i < chains.len() {
        if chains[i].len() == 1 {
            chains.remove(i);
            continue;
        }
        let mut j = i + 1;
        while j < chains.len() {
            if chains[j].iter().any(|pos| chains[i].contains(pos)) {
                chains.remove(j);
                merged = true;
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    merged
}

fn log_remote_pair(chain: &[Position], values: (Digit, Digit), changed: &[(Position, Digit)]) {
    let mut chain_str = String::new();
    for (i, pos) in chain.iter().enumerate() {
        if i != 0 {
            chain_str.push(if i % 2 == 1 { '=' } else { '-' });
        }
        let _ = write!(chain_str, "({}{}){pos}", values.0, values.1);
    }
    log::info!("{NAME} {chain_str} ==> {}", eliminations_string(changed));
}

/// Eliminates both pair values from cells that see two chain cells at odd
/// distance ≥ 3.
fn eliminate_with_chain(grid: &mut Grid, chain: &Chain) -> bool {
    let mut changed_any = false;
    let cells: Vec<Position> = chain.iter().copied().collect();
    for i in 0..cells.len() {
        let mut j = i + 3;
        while j < cells.len() {
            let (x, y) = (cells[i], cells[j]);
            let Some(values) = pair_values(grid, x) else {
                break;
            };
            let mut changed = Vec::new();
            for buddy in x.buddies() {
                if buddy == y || !buddy.is_buddy(y) {
                    continue;
                }
                for value in [values.0, values.1] {
                    if grid.exclude_candidate(buddy, value) {
                        changed.push((buddy, value));
                    }
                }
            }
            if !changed.is_empty() {
                log_remote_pair(&cells[i..=j], values, &changed);
                changed_any = true;
            }
            j += 2;
        }
    }
    changed_any
}

impl Technique for RemotePair {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn apply(&self, grid: &mut Grid) -> bool {
        log::trace!("searching for remote pairs");
        let mut chains = build_initial_chains(grid);
        loop {
            if add_layer(grid, &mut chains, true) || add_layer(grid, &mut chains, false) {
                while condense_chains(&mut chains) {}
                continue;
            }
            break;
        }
        let mut changed = false;
        for chain in &chains {
            if chain.len() >= 4 {
                changed |= eliminate_with_chain(grid, chain);
            }
        }
        changed
    }
}
