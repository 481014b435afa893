//! Reads puzzles from stdin until end of input, solves each with the
//! configured techniques, and reports the outcome.

use std::io::{self, Write as _};

use clap::{Parser, ValueEnum, error::ErrorKind};
use deduku_core::{Format, io as grid_io};
use deduku_solver::{Solver, logging, technique};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "solver",
    about = "Solve Sudoku puzzles read from standard input, reporting every deduction."
)]
struct Args {
    /// Output format for each puzzle.
    #[arg(short = 'o', long = "output-format", value_enum, default_value = "c")]
    output_format: FormatArg,

    /// Input format for each puzzle.
    #[arg(short = 'i', long = "input-format", value_enum, default_value = "v")]
    input_format: InputFormatArg,

    /// Echo each puzzle after reading it.
    #[arg(short = 'e', long = "echo")]
    echo: bool,

    /// Use bifurcation if all other techniques fail.
    #[arg(short = 'b', long = "bifurcate")]
    bifurcate: bool,

    /// Lower the log level while bifurcating.
    #[arg(short = 'q', long = "quietly-bifurcate")]
    quietly_bifurcate: bool,

    /// Log level: fatal, error, warning, info, debug, trace.
    #[arg(short = 'l', long = "log-level", value_enum, default_value = "i")]
    log_level: LogLevelArg,

    /// Print the log level in front of every log line.
    #[arg(short = 'p', long = "print-log-level")]
    print_log_level: bool,

    /// Statistics mode: none, each puzzle, or a final summary.
    #[arg(short = 's', long = "statistics", value_enum, default_value = "n")]
    statistics: StatisticsArg,

    /// Comma separated list of techniques to use, in the order specified.
    ///
    /// Tokens: ssts, n1-n4, h1-h4, lc, bf2-bf4, xyw, xyzw, rp, ur, sc, mc,
    /// 3dmc, fif, frf, mf. NakedSingle or HiddenSingle should come first:
    /// they are the only techniques which set cells besides bifurcation.
    #[arg(short = 't', long = "techniques", default_value = "")]
    techniques: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Values only.
    #[value(name = "v", alias = "value")]
    Value,
    /// Candidate grid.
    #[value(name = "c", alias = "cand")]
    Candidates,
    /// 81 characters on a single line.
    #[value(name = "s", alias = "line")]
    SingleLine,
    /// No output.
    #[value(name = "n", alias = "none")]
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormatArg {
    /// Values only.
    #[value(name = "v", alias = "value")]
    Value,
    /// Candidate grid.
    #[value(name = "c", alias = "cand")]
    Candidates,
    /// No input.
    #[value(name = "n", alias = "none")]
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    #[value(name = "f", alias = "Fatal")]
    Fatal,
    #[value(name = "e", alias = "Error")]
    Error,
    #[value(name = "w", alias = "Warning")]
    Warning,
    #[value(name = "i", alias = "Info")]
    Info,
    #[value(name = "d", alias = "Debug")]
    Debug,
    #[value(name = "t", alias = "Trace")]
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatisticsArg {
    #[value(name = "n", alias = "none")]
    None,
    #[value(name = "e", alias = "each")]
    Each,
    #[value(name = "f", alias = "final")]
    Final,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Value => Self::Value,
            FormatArg::Candidates => Self::Candidates,
            FormatArg::SingleLine => Self::SingleLine,
            FormatArg::None => Self::None,
        }
    }
}

impl From<InputFormatArg> for Format {
    fn from(arg: InputFormatArg) -> Self {
        match arg {
            InputFormatArg::Value => Self::Value,
            InputFormatArg::Candidates => Self::Candidates,
            InputFormatArg::None => Self::None,
        }
    }
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            // The engine never logs through the facade at fatal severity;
            // fatal conditions go straight to stderr before exiting.
            LogLevelArg::Fatal => Self::Off,
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warning => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

const fn level_name(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "Error",
        log::Level::Warn => "Warning",
        log::Level::Info => "Info",
        log::Level::Debug => "Debug",
        log::Level::Trace => "Trace",
    }
}

#[derive(Debug, Default)]
struct Statistics {
    total: u32,
    unique: u32,
    non_unique: u32,
    impossible: u32,
}

impl Statistics {
    fn record(&mut self, solutions: u32) {
        self.total += 1;
        match solutions {
            0 => self.impossible += 1,
            1 => self.unique += 1,
            _ => self.non_unique += 1,
        }
    }

    fn print_running_line(&self, outcome: &str) {
        println!(
            "puzzle {}: {outcome} (totals: {} unique, {} impossible, {} non-unique)",
            self.total, self.unique, self.impossible, self.non_unique
        );
    }

    fn print_summary(&self) {
        if self.total == 0 {
            return;
        }
        println!("Final Statistics:");
        println!("-----------------");
        println!(
            "Impossible Puzzles: {:<10}{}%",
            self.impossible,
            self.impossible * 100 / self.total
        );
        println!(
            "Non-Unique Puzzles: {:<10}{}%",
            self.non_unique,
            self.non_unique * 100 / self.total
        );
        println!(
            "Unique Puzzles:     {:<10}{}%",
            self.unique,
            self.unique * 100 / self.total
        );
        println!("-----------------");
        println!("Total Puzzles:      {}", self.total);
    }
}

fn init_logging(level: LevelFilter, print_log_level: bool) {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if print_log_level {
                writeln!(buf, "{}: {}", level_name(record.level()), record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .init();
}

fn run() -> io::Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(0);
        }
        Err(err) => {
            err.print()?;
            return Ok(1);
        }
    };

    init_logging(args.log_level.into(), args.print_log_level);
    logging::set_quiet_bifurcation(args.quietly_bifurcate);

    let techniques = match technique::parse_list(&args.techniques) {
        Ok(techniques) => techniques,
        Err(err) => {
            eprintln!("{err}");
            return Ok(1);
        }
    };
    if techniques.is_empty() && !args.bifurcate {
        log::warn!("no techniques and no bifurcation, only checking whether puzzles are solved");
    }
    let solver = Solver::new(techniques, args.bifurcate);

    let input_format = Format::from(args.input_format);
    let output_format = Format::from(args.output_format);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stats = Statistics::default();

    while let Some(mut grid) = grid_io::read_grid(&mut input, input_format)? {
        if args.echo {
            grid_io::write_grid(&mut io::stdout(), &grid, output_format)?;
        }

        let solutions = solver.solve(&mut grid);
        let outcome = match solutions {
            0 => "impossible",
            1 => "unique",
            _ => "non-unique",
        };
        println!("puzzle was {outcome}");
        grid_io::write_grid(&mut io::stdout(), &grid, output_format)?;

        stats.record(solutions);
        if args.statistics == StatisticsArg::Each {
            stats.print_running_line(outcome);
        }
    }

    if args.statistics == StatisticsArg::Final {
        stats.print_summary();
    }

    Ok(i32::from(stats.unique != stats.total))
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_record() {
        let mut stats = Statistics::default();
        stats.record(1);
        stats.record(0);
        stats.record(5);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unique, 1);
        assert_eq!(stats.impossible, 1);
        assert_eq!(stats.non_unique, 1);
    }

    #[test]
    fn test_exit_code_reflects_uniqueness() {
        let mut stats = Statistics::default();
        stats.record(1);
        assert_eq!(i32::from(stats.unique != stats.total), 0);
        stats.record(0);
        assert_eq!(i32::from(stats.unique != stats.total), 1);
    }
}
