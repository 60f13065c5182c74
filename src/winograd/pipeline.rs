//! Pipelined Winograd: four concurrent stages joined by readiness gates.
//!
//! ```text
//! A: row factors     ──┐
//! B: column factors  ──┼──► D: main term += into result
//! C: odd correction  ──┘
//! ```
//!
//! A and B publish into write-once slots; C writes the correction straight
//! into the result (a no-op on even `n`). Each opens its gate only after its
//! write, and D blocks until all three gates are `Ready`, so every cell ends
//! up as correction plus main term whatever the scheduling order.

use std::sync::{Mutex, OnceLock};
use std::thread;

use super::factors::Operands;
use crate::engine::gate::GateSet;
use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

const ROW_FACTORS: usize = 0;
const COLUMN_FACTORS: usize = 1;
const CORRECTION: usize = 2;

const STAGE_NAMES: [&str; 3] = [
    "pipeline row factors",
    "pipeline column factors",
    "pipeline odd correction",
];

fn poisoned<T>(_: T) -> ParError {
    ParError::Poisoned {
        resource: "pipeline result matrix",
    }
}

pub(crate) fn multiply(ops: &Operands<'_>) -> ParResult<Matrix> {
    let gates = GateSet::new(&STAGE_NAMES);
    let row_factors: OnceLock<Vec<f64>> = OnceLock::new();
    let column_factors: OnceLock<Vec<f64>> = OnceLock::new();
    let result = Mutex::new(Matrix::zeros(ops.rows(), ops.cols()));

    let outcomes: [ParResult<()>; 4] = thread::scope(|s| {
        let stage_a = s.spawn(|| {
            let guard = gates.guard(ROW_FACTORS);
            let mut factors = vec![0.0; ops.rows()];
            ops.fill_row_factors(0, &mut factors);
            let _ = row_factors.set(factors);
            guard.open()
        });

        let stage_b = s.spawn(|| {
            let guard = gates.guard(COLUMN_FACTORS);
            let mut factors = vec![0.0; ops.cols()];
            ops.fill_column_factors(0, &mut factors);
            let _ = column_factors.set(factors);
            guard.open()
        });

        let stage_c = s.spawn(|| {
            let guard = gates.guard(CORRECTION);
            if ops.is_odd() {
                let mut cells = result.lock().map_err(poisoned)?;
                ops.add_correction(&mut cells);
            }
            guard.open()
        });

        let stage_d = s.spawn(|| -> ParResult<()> {
            gates.wait_all(&[ROW_FACTORS, COLUMN_FACTORS, CORRECTION])?;
            let rows = row_factors.get().ok_or(ParError::WorkerPanicked {
                stage: STAGE_NAMES[ROW_FACTORS],
            })?;
            let cols = column_factors.get().ok_or(ParError::WorkerPanicked {
                stage: STAGE_NAMES[COLUMN_FACTORS],
            })?;
            let mut cells = result.lock().map_err(poisoned)?;
            ops.add_main_terms(&mut cells, rows, cols);
            Ok(())
        });

        [
            (stage_a, STAGE_NAMES[ROW_FACTORS]),
            (stage_b, STAGE_NAMES[COLUMN_FACTORS]),
            (stage_c, STAGE_NAMES[CORRECTION]),
            (stage_d, "pipeline main term"),
        ]
        .map(|(handle, stage)| {
            handle
                .join()
                .map_err(|_| ParError::WorkerPanicked { stage })
                .and_then(|outcome| outcome)
        })
    });

    for outcome in outcomes {
        outcome?;
    }
    result.into_inner().map_err(poisoned)
}
