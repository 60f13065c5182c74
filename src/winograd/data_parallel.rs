//! Data-decomposition Winograd over a fixed worker count.
//!
//! Rows and columns are split into `workers` contiguous partitions. Phase 1
//! computes each partition's row and column factors; the scope join is the
//! barrier. Phase 2 computes each partition's result rows. Every worker owns a
//! disjoint `&mut` slice, so no cell is ever written by two workers.

use std::thread;

use tracing::trace;

use super::factors::Operands;
use crate::engine::join_all;
use crate::engine::partition::{even_ranges, split_by_lengths};
use crate::error::ParResult;
use crate::matrix::Matrix;

pub(crate) fn multiply(ops: &Operands<'_>, workers: usize) -> ParResult<Matrix> {
    let rows = ops.rows();
    let cols = ops.cols();
    let row_ranges = even_ranges(rows, workers);
    let col_ranges = even_ranges(cols, workers);

    let mut row_factors = vec![0.0; rows];
    let mut column_factors = vec![0.0; cols];

    let row_chunks = split_by_lengths(&mut row_factors, row_ranges.iter().map(|r| r.len()));
    let col_chunks = split_by_lengths(&mut column_factors, col_ranges.iter().map(|r| r.len()));

    thread::scope(|s| {
        let handles = row_ranges
            .iter()
            .zip(&col_ranges)
            .zip(row_chunks.into_iter().zip(col_chunks))
            .map(|((row_range, col_range), (row_out, col_out))| {
                s.spawn(move || {
                    ops.fill_row_factors(row_range.start, row_out);
                    ops.fill_column_factors(col_range.start, col_out);
                })
            })
            .collect();

        join_all(handles, "winograd factor phase")
    })?;
    trace!(workers, "factor barrier passed");

    let mut result = Matrix::zeros(rows, cols);
    let (row_factors, column_factors) = (&row_factors, &column_factors);

    let blocks = split_by_lengths(
        result.as_mut_slice(),
        row_ranges.iter().map(|r| r.len() * cols),
    );

    thread::scope(|s| {
        let handles = row_ranges
            .iter()
            .zip(blocks)
            .map(|(row_range, block)| {
                s.spawn(move || {
                    ops.fill_result_rows(row_range.start, block, row_factors, column_factors);
                })
            })
            .collect();

        join_all(handles, "winograd result phase")
    })?;

    Ok(result)
}
