//! The Winograd identity shared by every strategy.
//!
//! ```text
//! row_factor[i]    = Σₖ A[i,2k]·A[i,2k+1]
//! column_factor[j] = Σₖ B[2k+1,j]·B[2k,j]
//! C[i,j] = -row_factor[i] - column_factor[j]
//!          + Σₖ (A[i,2k] + B[2k+1,j])·(A[i,2k+1] + B[2k,j])
//!          + A[i,n-1]·B[n-1,j]            (odd n only)
//! ```

use crate::matrix::Matrix;

/// A validated operand pair with inner dimension `n >= 2`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operands<'a> {
    left: &'a Matrix,
    right: &'a Matrix,
    /// Number of adjacent index pairs, `n / 2`.
    pairs: usize,
}

impl<'a> Operands<'a> {
    pub(crate) fn new(left: &'a Matrix, right: &'a Matrix) -> Self {
        debug_assert_eq!(left.cols(), right.rows());
        Self {
            left,
            right,
            pairs: left.cols() / 2,
        }
    }

    pub(crate) const fn rows(&self) -> usize {
        self.left.rows()
    }

    pub(crate) const fn cols(&self) -> usize {
        self.right.cols()
    }

    /// Inner dimension is odd, so the last index is unpaired.
    pub(crate) const fn is_odd(&self) -> bool {
        self.left.cols() % 2 != 0
    }

    pub(crate) fn row_factor(&self, i: usize) -> f64 {
        (0..self.pairs)
            .map(|k| self.left.get(i, 2 * k) * self.left.get(i, 2 * k + 1))
            .sum()
    }

    pub(crate) fn column_factor(&self, j: usize) -> f64 {
        (0..self.pairs)
            .map(|k| self.right.get(2 * k + 1, j) * self.right.get(2 * k, j))
            .sum()
    }

    /// Row factors for rows `first..first + out.len()`.
    pub(crate) fn fill_row_factors(&self, first: usize, out: &mut [f64]) {
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = self.row_factor(first + offset);
        }
    }

    /// Column factors for columns `first..first + out.len()`.
    pub(crate) fn fill_column_factors(&self, first: usize, out: &mut [f64]) {
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = self.column_factor(first + offset);
        }
    }

    /// Main term of cell `(i, j)`, without the odd correction.
    pub(crate) fn main_term(&self, i: usize, j: usize, row_factor: f64, column_factor: f64) -> f64 {
        let paired: f64 = (0..self.pairs)
            .map(|k| {
                (self.left.get(i, 2 * k) + self.right.get(2 * k + 1, j))
                    * (self.left.get(i, 2 * k + 1) + self.right.get(2 * k, j))
            })
            .sum();
        -row_factor - column_factor + paired
    }

    /// Odd-dimension correction for cell `(i, j)`; zero when `n` is even.
    pub(crate) fn correction(&self, i: usize, j: usize) -> f64 {
        if self.is_odd() {
            let last = self.left.cols() - 1;
            self.left.get(i, last) * self.right.get(last, j)
        } else {
            0.0
        }
    }

    /// Complete cells for the result rows starting at `first_row`.
    ///
    /// `out` holds whole rows (`out.len()` is a multiple of `cols`).
    pub(crate) fn fill_result_rows(
        &self,
        first_row: usize,
        out: &mut [f64],
        row_factors: &[f64],
        column_factors: &[f64],
    ) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        for (offset, cells) in out.chunks_mut(cols).enumerate() {
            let i = first_row + offset;
            for (j, cell) in cells.iter_mut().enumerate() {
                *cell = self.main_term(i, j, row_factors[i], column_factors[j])
                    + self.correction(i, j);
            }
        }
    }

    /// Add the odd correction into every cell of `result`.
    pub(crate) fn add_correction(&self, result: &mut Matrix) {
        if !self.is_odd() {
            return;
        }
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                result.add_to(i, j, self.correction(i, j));
            }
        }
    }

    /// Add the main term into every cell of `result`.
    pub(crate) fn add_main_terms(&self, result: &mut Matrix, row_factors: &[f64], column_factors: &[f64]) {
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                result.add_to(i, j, self.main_term(i, j, row_factors[i], column_factors[j]));
            }
        }
    }
}
