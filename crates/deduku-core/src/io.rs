//! Text formats for reading and writing boards.
//!
//! Three formats are supported:
//!
//! - **Value**: nine rows of nine characters with box gaps, `.` for blanks.
//!   On input, whitespace is skipped, `1..=9` sets a value, and any other
//!   character is a blank.
//! - **Candidates**: a boxed grid where each cell prints its solved value or
//!   the concatenation of its candidates, with per-column padding.
//! - **Single line**: 81 characters, `1..=9` or `.`.
//!
//! After either input format, every solved cell is cross-hatched so the
//! candidate sets are consistent with the givens.

use std::{
    fmt::{self, Display, Write as _},
    io::{self, BufRead, Write},
    str::FromStr,
};

use crate::{Cell, Digit, Grid, Position};

/// A board text format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Solved values only, nine rows with box gaps.
    Value,
    /// Full candidate grid with box separators.
    #[default]
    Candidates,
    /// 81 characters on one line.
    SingleLine,
    /// No output at all (reads nothing, writes nothing).
    None,
}

/// An error produced when parsing a board from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseGridError {
    /// The input ended before 81 cells were read.
    #[display("expected 81 cells, found only {found}")]
    TooFewCells {
        /// Number of cells that were successfully read.
        found: usize,
    },
}

/// Writes `grid` to `out` in the given format. [`Format::None`] writes
/// nothing.
///
/// # Errors
///
/// Returns any I/O error from the underlying writer.
pub fn write_grid<W: Write>(out: &mut W, grid: &Grid, format: Format) -> io::Result<()> {
    let text = match format {
        Format::Value => value_string(grid),
        Format::Candidates => candidates_string(grid),
        Format::SingleLine => single_line_string(grid),
        Format::None => return Ok(()),
    };
    out.write_all(text.as_bytes())
}

/// Reads the next board from `input` in the given format.
///
/// Returns `Ok(None)` when the input is exhausted, which terminates the
/// caller's puzzle loop; reaching end of input mid-board is reported the
/// same way, with an info log line. [`Format::None`] and
/// [`Format::SingleLine`] inputs are parsed with the value rules
/// ([`Format::None`] reads nothing and returns `Ok(None)`).
///
/// # Errors
///
/// Returns any I/O error from the underlying reader.
pub fn read_grid<R: BufRead>(input: &mut R, format: Format) -> io::Result<Option<Grid>> {
    match format {
        Format::Value | Format::SingleLine => read_by_value(input),
        Format::Candidates => read_by_candidates(input),
        Format::None => Ok(None),
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_string(self))
    }
}

impl FromStr for Grid {
    type Err = ParseGridError;

    /// Parses the whitespace-tolerant value format: `1..=9` sets a value,
    /// any other non-whitespace character is a blank cell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid = Grid::new();
        let mut cells = Position::all();
        let mut found = 0;
        for c in s.chars() {
            if c.is_whitespace() {
                continue;
            }
            let Some(pos) = cells.next() else {
                break;
            };
            if let Some(value) = digit_from_char(c) {
                grid.place(pos, value);
            }
            found += 1;
        }
        if found < 81 {
            return Err(ParseGridError::TooFewCells { found });
        }
        grid.cross_hatch_all();
        Ok(grid)
    }
}

fn digit_from_char(c: char) -> Option<Digit> {
    match c {
        '1'..='9' => Some(Digit::from_value(c as u8 - b'0')),
        _ => None,
    }
}

fn value_string(grid: &Grid) -> String {
    let mut out = String::new();
    for row in 0..9 {
        if row == 3 || row == 6 {
            out.push('\n');
        }
        for col in 0..9 {
            if col == 3 || col == 6 {
                out.push(' ');
            }
            let cell = grid.cell(Position::new(row, col));
            if cell.is_solved() {
                let _ = write!(out, "{}", cell.value());
            } else {
                out.push('.');
            }
        }
        out.push('\n');
    }
    out
}

fn single_line_string(grid: &Grid) -> String {
    let mut out = String::with_capacity(82);
    for pos in Position::all() {
        let cell = grid.cell(pos);
        if cell.is_solved() {
            let _ = write!(out, "{}", cell.value());
        } else {
            out.push('.');
        }
    }
    out.push('\n');
    out
}

/// The printed width of a cell: one character for a value, one per candidate
/// otherwise.
fn cell_width(cell: Cell) -> usize {
    if cell.is_solved() {
        1
    } else {
        cell.num_candidates().max(1)
    }
}

fn column_widths(grid: &Grid) -> [usize; 9] {
    let mut widths = [1; 9];
    for pos in Position::all() {
        let col = pos.col() as usize;
        widths[col] = widths[col].max(cell_width(grid.cell(pos)));
    }
    widths
}

fn push_separator(out: &mut String, widths: &[usize; 9]) {
    for (col, width) in widths.iter().enumerate() {
        if col % 3 == 0 {
            out.push_str("+-");
        }
        for _ in 0..=*width {
            out.push('-');
        }
    }
    out.push_str("+\n");
}

fn candidates_string(grid: &Grid) -> String {
    let widths = column_widths(grid);
    let mut out = String::new();

    for row in 0..9 {
        if row % 3 == 0 {
            push_separator(&mut out, &widths);
        }
        for col in 0..9 {
            if col % 3 == 0 {
                out.push_str("| ");
            }
            let cell = grid.cell(Position::new(row, col));
            let mut printed = 0;
            if cell.is_solved() {
                let _ = write!(out, "{}", cell.value());
                printed = 1;
            } else {
                for digit in cell.candidates() {
                    let _ = write!(out, "{digit}");
                    printed += 1;
                }
            }
            while printed <= widths[col as usize] {
                out.push(' ');
                printed += 1;
            }
        }
        out.push_str("|\n");
    }
    push_separator(&mut out, &widths);
    out
}

fn read_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0_u8; 1];
    loop {
        return match input.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => Err(e),
        };
    }
}

fn log_end_of_input() {
    log::info!("end of input reached while reading a puzzle");
}

fn read_by_value<R: BufRead>(input: &mut R) -> io::Result<Option<Grid>> {
    let mut grid = Grid::new();
    for pos in Position::all() {
        let byte = loop {
            match read_byte(input)? {
                None => {
                    log_end_of_input();
                    return Ok(None);
                }
                Some(b) if b.is_ascii_whitespace() => {}
                Some(b) => break b,
            }
        };
        if let Some(value) = digit_from_char(char::from(byte)) {
            grid.place(pos, value);
        }
    }
    grid.cross_hatch_all();
    Ok(Some(grid))
}

fn read_by_candidates<R: BufRead>(input: &mut R) -> io::Result<Option<Grid>> {
    let mut grid = Grid::new();
    for pos in Position::all() {
        // Scan to the next digit run; everything in between is decoration.
        let first = loop {
            match read_byte(input)? {
                None => {
                    log_end_of_input();
                    return Ok(None);
                }
                Some(b) => {
                    if let Some(digit) = digit_from_char(char::from(b)) {
                        break digit;
                    }
                }
            }
        };
        let mut candidates = crate::DigitSet::from_elem(first);
        loop {
            match read_byte(input)? {
                Some(b) => {
                    if let Some(digit) = digit_from_char(char::from(b)) {
                        candidates.insert(digit);
                    } else {
                        break;
                    }
                }
                None => break,
            }
        }

        if let Some(value) = candidates.as_single() {
            grid.place(pos, value);
        } else {
            let mut cell = Cell::new();
            for digit in !candidates {
                cell.exclude_candidate(digit);
            }
            grid.set_cell(pos, cell);
        }
    }
    grid.cross_hatch_all();
    Ok(Some(grid))
}
