//! Dense row-major numeric matrix.
//!
//! Dimensions are fixed at construction; only cell values change afterwards.

use serde::{Deserialize, Serialize};

use crate::engine::rng::SimRng;
use crate::error::{ParError, ParResult};

/// Dense `rows x cols` matrix of `f64`, stored row-major.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> ParResult<Self> {
        if data.len() != rows * cols {
            return Err(ParError::DimensionMismatch {
                left: format!("{rows}x{cols}"),
                right: format!("{} values", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ParResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(ParError::DimensionMismatch {
                    left: format!("row 0 has {n_cols} columns"),
                    right: format!("row {i} has {}", row.len()),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Create a matrix with cells drawn uniformly from `[min, max)`.
    #[must_use]
    pub fn random(rows: usize, cols: usize, min: f64, max: f64, rng: &mut SimRng) -> Self {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range_f64(min, max))
            .collect();
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the matrix has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// True for a square matrix.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Read a cell. Panics on out-of-bounds indices, like slice indexing.
    #[must_use]
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    /// Write a cell. Panics on out-of-bounds indices, like slice indexing.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Add to a cell in place.
    #[inline]
    pub fn add_to(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] += value;
    }

    /// Borrow one row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Row-major view of all cells.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of all cells.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Nested-row copy, handy for serialization and assertions.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Naive triple-loop product.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `self.cols() != rhs.rows()`.
    pub fn multiply(&self, rhs: &Self) -> ParResult<Self> {
        if self.cols != rhs.rows {
            return Err(ParError::dimension_mismatch(self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                for j in 0..rhs.cols {
                    out.add_to(i, j, a * rhs.get(k, j));
                }
            }
        }
        Ok(out)
    }

    /// Cell-wise comparison within an absolute tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Largest absolute cell difference, `None` when shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        (self.shape() == other.shape()).then(|| {
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        })
    }
}
