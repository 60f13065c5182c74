//! Pheromone trails and the shared per-iteration delta accumulator.
//!
//! The trail matrix is read concurrently by ants and mutated only between
//! iterations, by the single thread driving the run. Reinforcement produced
//! during an iteration goes through [`PheromoneDelta`], the only writable
//! shared state besides the best-tour record.

use std::sync::{Mutex, MutexGuard};

use super::graph::Graph;
use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

/// Trail desirability per edge, same shape as the adjacency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    trails: Matrix,
}

impl PheromoneMatrix {
    /// `initial` on every existing edge, zero elsewhere.
    #[must_use]
    pub fn new(graph: &Graph, initial: f64) -> Self {
        let n = graph.node_count();
        let mut trails = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if graph.has_edge(i, j) {
                    trails.set(i, j, initial);
                }
            }
        }
        Self { trails }
    }

    /// Trail on edge `from -> to`.
    #[must_use]
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.trails.get(from, to)
    }

    /// Underlying matrix.
    #[must_use]
    pub const fn as_matrix(&self) -> &Matrix {
        &self.trails
    }

    /// `trail = decay * trail + delta` on every existing edge.
    pub fn evaporate(&mut self, graph: &Graph, decay: f64, delta: &Matrix) {
        let n = graph.node_count();
        for i in 0..n {
            for j in 0..n {
                if graph.has_edge(i, j) {
                    self.trails
                        .set(i, j, decay * self.trails.get(i, j) + delta.get(i, j));
                }
            }
        }
    }
}

/// Pending reinforcement for the current iteration.
///
/// Workers merge their private deltas under the lock; [`PheromoneDelta::drain`]
/// sums the merged contributions in worker order and resets the accumulator,
/// so the resulting trail values do not depend on which worker finished first.
#[derive(Debug)]
pub struct PheromoneDelta {
    size: usize,
    contributions: Mutex<Vec<(usize, Matrix)>>,
}

impl PheromoneDelta {
    /// Empty accumulator for an `size x size` graph.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            contributions: Mutex::new(Vec::new()),
        }
    }

    /// Fresh zero matrix of the right shape for a worker's private delta.
    #[must_use]
    pub fn local(&self) -> Matrix {
        Matrix::zeros(self.size, self.size)
    }

    /// Merge one worker's private delta.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` for a wrongly shaped delta, `Poisoned` if the lock
    /// was poisoned.
    pub fn merge(&self, worker: usize, local: Matrix) -> ParResult<()> {
        if local.shape() != (self.size, self.size) {
            return Err(ParError::dimension_mismatch(
                local.shape(),
                (self.size, self.size),
            ));
        }
        self.lock()?.push((worker, local));
        Ok(())
    }

    /// Number of merged contributions not yet drained.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if the lock was poisoned.
    pub fn pending(&self) -> ParResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Sum all merged contributions and reset the accumulator to zero.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if the lock was poisoned.
    pub fn drain(&self) -> ParResult<Matrix> {
        let mut merged = std::mem::take(&mut *self.lock()?);
        merged.sort_by_key(|(worker, _)| *worker);

        let mut total = Matrix::zeros(self.size, self.size);
        for (_, contribution) in &merged {
            for (cell, add) in total
                .as_mut_slice()
                .iter_mut()
                .zip(contribution.as_slice())
            {
                *cell += add;
            }
        }
        Ok(total)
    }

    fn lock(&self) -> ParResult<MutexGuard<'_, Vec<(usize, Matrix)>>> {
        self.contributions.lock().map_err(|_| ParError::Poisoned {
            resource: "pheromone delta",
        })
    }
}
