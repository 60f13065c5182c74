//! Single-threaded Winograd: factors first, then every cell in row order.

use super::factors::Operands;
use crate::matrix::Matrix;

pub(crate) fn multiply(ops: &Operands<'_>) -> Matrix {
    let mut row_factors = vec![0.0; ops.rows()];
    let mut column_factors = vec![0.0; ops.cols()];
    ops.fill_row_factors(0, &mut row_factors);
    ops.fill_column_factors(0, &mut column_factors);

    let mut result = Matrix::zeros(ops.rows(), ops.cols());
    ops.fill_result_rows(0, result.as_mut_slice(), &row_factors, &column_factors);
    result
}
