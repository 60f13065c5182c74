//! Winograd matrix multiplication with interchangeable execution strategies.
//!
//! All strategies evaluate the same identity (see [`factors`]) and differ only
//! in how the work is spread across threads:
//!
//! - **Sequential**: one thread, factors then cells.
//! - **Data-parallel**: `workers` disjoint row/column partitions, a barrier
//!   between the factor phase and the result phase.
//! - **Pipeline**: four stages (row factors, column factors, odd correction,
//!   main term) synchronised through readiness gates.
//!
//! # Example
//!
//! ```rust
//! use parallels::matrix::Matrix;
//! use parallels::winograd::{WinogradEngine, WinogradStrategy};
//!
//! let a = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();
//!
//! let engine = WinogradEngine::new(WinogradStrategy::DataParallel { workers: 2 });
//! let c = engine.product(&a, &b).unwrap();
//! assert_eq!(c.to_rows(), vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
//! ```

mod data_parallel;
mod factors;
mod pipeline;
mod sequential;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::check_workers;
use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

use factors::Operands;

/// How a multiplication is spread across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum WinogradStrategy {
    /// Single thread.
    Sequential,
    /// Fixed worker pool over contiguous row/column partitions.
    DataParallel {
        /// Number of workers per phase.
        workers: usize,
    },
    /// Four-stage pipeline.
    Pipeline,
}

impl WinogradStrategy {
    /// All three strategies, data-parallel with `workers`.
    #[must_use]
    pub const fn all(workers: usize) -> [Self; 3] {
        [
            Self::Sequential,
            Self::Pipeline,
            Self::DataParallel { workers },
        ]
    }

    /// Short display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::DataParallel { .. } => "data-parallel",
            Self::Pipeline => "pipeline",
        }
    }

    /// Parse a strategy name; `workers` is used for the data-parallel form.
    #[must_use]
    pub fn parse(s: &str, workers: usize) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" | "single" => Some(Self::Sequential),
            "data-parallel" | "data" | "classic" => Some(Self::DataParallel { workers }),
            "pipeline" | "pipe" => Some(Self::Pipeline),
            _ => None,
        }
    }
}

/// Multiply `left x right` with the given strategy.
///
/// Absent or empty operands fail with `NullInput`; `left.cols() != right.rows()`
/// fails with `DimensionMismatch`; a zero worker count fails with
/// `InvalidParameter`. All checks run before any thread is spawned. An inner
/// dimension of 1 bypasses the factor trick and returns the direct product.
///
/// # Errors
///
/// See above, plus `WorkerPanicked`/`Poisoned` if a worker dies mid-call.
pub fn multiply(
    left: Option<&Matrix>,
    right: Option<&Matrix>,
    strategy: WinogradStrategy,
) -> ParResult<Matrix> {
    let (left, right) = validate(left, right, strategy)?;

    if left.cols() == 1 {
        debug!(rows = left.rows(), cols = right.cols(), "inner dimension 1, direct product");
        return left.multiply(right);
    }

    let ops = Operands::new(left, right);
    debug!(
        strategy = strategy.name(),
        rows = left.rows(),
        inner = left.cols(),
        cols = right.cols(),
        "winograd multiply"
    );

    match strategy {
        WinogradStrategy::Sequential => Ok(sequential::multiply(&ops)),
        WinogradStrategy::DataParallel { workers } => data_parallel::multiply(&ops, workers),
        WinogradStrategy::Pipeline => pipeline::multiply(&ops),
    }
}

fn validate<'a>(
    left: Option<&'a Matrix>,
    right: Option<&'a Matrix>,
    strategy: WinogradStrategy,
) -> ParResult<(&'a Matrix, &'a Matrix)> {
    let left = left
        .filter(|m| !m.is_empty())
        .ok_or(ParError::NullInput { what: "left matrix" })?;
    let right = right
        .filter(|m| !m.is_empty())
        .ok_or(ParError::NullInput { what: "right matrix" })?;

    if left.cols() != right.rows() {
        return Err(ParError::dimension_mismatch(left.shape(), right.shape()));
    }
    if let WinogradStrategy::DataParallel { workers } = strategy {
        check_workers(workers)?;
    }
    Ok((left, right))
}

/// A multiplier bound to one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinogradEngine {
    strategy: WinogradStrategy,
}

impl Default for WinogradEngine {
    fn default() -> Self {
        Self::new(WinogradStrategy::Sequential)
    }
}

impl WinogradEngine {
    /// Create an engine using `strategy`.
    #[must_use]
    pub const fn new(strategy: WinogradStrategy) -> Self {
        Self { strategy }
    }

    /// Configured strategy.
    #[must_use]
    pub const fn strategy(&self) -> WinogradStrategy {
        self.strategy
    }

    /// Multiply possibly-absent operands.
    ///
    /// # Errors
    ///
    /// See [`multiply`].
    pub fn multiply(&self, left: Option<&Matrix>, right: Option<&Matrix>) -> ParResult<Matrix> {
        multiply(left, right, self.strategy)
    }

    /// Multiply two present operands.
    ///
    /// # Errors
    ///
    /// See [`multiply`].
    pub fn product(&self, left: &Matrix, right: &Matrix) -> ParResult<Matrix> {
        multiply(Some(left), Some(right), self.strategy)
    }
}
