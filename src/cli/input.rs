//! Matrix and graph text input.
//!
//! ```text
//! # optional comments
//! 3 3
//! 0 2 9
//! 1 0 6
//! 15 7 0
//! ```
//!
//! The first non-empty line holds `rows cols`, followed by exactly `rows`
//! lines of `cols` whitespace-separated numbers.

use std::path::Path;

use super::args::MatrixSource;
use crate::engine::rng::SimRng;
use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

/// Range of values used to fill random operands.
pub const RANDOM_RANGE: (f64, f64) = (-10.0, 10.0);

/// Parse the matrix text format.
///
/// # Errors
///
/// Returns `Parse` naming the offending line.
pub fn parse_matrix(text: &str) -> ParResult<Matrix> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| ParError::parse("empty input, expected 'rows cols' header"))?;
    let dims = parse_numbers::<usize>(header_line, header)?;
    let &[rows, cols] = dims.as_slice() else {
        return Err(ParError::parse(format!(
            "line {header_line}: header must be 'rows cols', got {} value(s)",
            dims.len()
        )));
    };
    if rows == 0 || cols == 0 {
        return Err(ParError::parse(format!(
            "line {header_line}: dimensions must be positive, got {rows}x{cols}"
        )));
    }

    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let (line_no, line) = lines.next().ok_or_else(|| {
            ParError::parse(format!("expected {rows} rows, found {row}"))
        })?;
        let values = parse_numbers::<f64>(line_no, line)?;
        if values.len() != cols {
            return Err(ParError::parse(format!(
                "line {line_no}: expected {cols} values, found {}",
                values.len()
            )));
        }
        data.extend(values);
    }

    if let Some((line_no, _)) = lines.next() {
        return Err(ParError::parse(format!(
            "line {line_no}: unexpected data after {rows} rows"
        )));
    }

    Matrix::from_vec(rows, cols, data)
}

/// Read and parse a matrix file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Parse` on malformed content.
pub fn load_matrix(path: &Path) -> ParResult<Matrix> {
    let text = std::fs::read_to_string(path)?;
    parse_matrix(&text)
}

impl MatrixSource {
    /// Produce the operand, drawing random cells from `rng` when needed.
    ///
    /// # Errors
    ///
    /// Propagates file and parse errors.
    pub fn resolve(&self, rng: &mut SimRng) -> ParResult<Matrix> {
        match self {
            Self::Random { rows, cols } => Ok(Matrix::random(
                *rows,
                *cols,
                RANDOM_RANGE.0,
                RANDOM_RANGE.1,
                rng,
            )),
            Self::File(path) => load_matrix(path),
        }
    }
}

fn parse_numbers<T: std::str::FromStr>(line_no: usize, line: &str) -> ParResult<Vec<T>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                ParError::parse(format!("line {line_no}: '{token}' is not a valid number"))
            })
        })
        .collect()
}
