//! Generates Sudoku puzzles with unique solutions and prints them in
//! single-line format.

use std::io::{self, Write as _};

use clap::Parser;
use deduku_core::{Format, io as grid_io};
use deduku_generator::Generator;

#[derive(Debug, Parser)]
#[command(
    name = "generator",
    about = "Generate Sudoku puzzles with unique solutions."
)]
struct Args {
    /// Seed for the random number generator.
    #[arg(short = 's', long = "random-seed", default_value_t = 0)]
    seed: u64,

    /// Number of puzzles to generate.
    #[arg(short = 'n', long = "puzzles-to-generate", default_value_t = 1)]
    count: u32,

    /// Maximum number of givens to allow. Lowering this usually makes the
    /// puzzles easier, not harder, and makes generation take longer.
    #[arg(short = 'g', long = "givens")]
    givens: Option<usize>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut generator = Generator::from_seed(args.seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..args.count {
        let puzzle = generator.generate(args.givens);
        grid_io::write_grid(&mut out, &puzzle, Format::SingleLine)?;
    }
    out.flush()
}
