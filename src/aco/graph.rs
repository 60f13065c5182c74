//! Weighted directed graph over a dense adjacency matrix.
//!
//! A zero weight means "no direct edge". Self-loops are ignored.

use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

/// Validated adjacency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    weights: Matrix,
}

impl Graph {
    /// Wrap an adjacency matrix.
    ///
    /// # Errors
    ///
    /// - `NullInput` for an empty matrix
    /// - `DimensionMismatch` when it is not square
    /// - `InvalidGraph` for fewer than two nodes or a negative/non-finite weight
    pub fn new(weights: Matrix) -> ParResult<Self> {
        if weights.is_empty() {
            return Err(ParError::NullInput {
                what: "adjacency matrix",
            });
        }
        if !weights.is_square() {
            return Err(ParError::dimension_mismatch(
                weights.shape(),
                (weights.rows(), weights.rows()),
            ));
        }
        if weights.rows() < 2 {
            return Err(ParError::invalid_graph("a round trip needs at least two nodes"));
        }
        if let Some(bad) = weights
            .as_slice()
            .iter()
            .position(|w| !w.is_finite() || *w < 0.0)
        {
            let n = weights.cols();
            return Err(ParError::invalid_graph(format!(
                "edge ({}, {}) has weight {}, expected a finite non-negative value",
                bad / n,
                bad % n,
                weights.as_slice()[bad]
            )));
        }
        Ok(Self { weights })
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.weights.rows()
    }

    /// Raw adjacency matrix.
    #[must_use]
    pub const fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Weight of edge `from -> to` (zero when absent).
    #[must_use]
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights.get(from, to)
    }

    /// True if a direct edge `from -> to` exists.
    #[must_use]
    #[inline]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        from != to && self.weights.get(from, to) != 0.0
    }

    /// Sum of direct edge weights along `path`, `None` if a step has no edge.
    #[must_use]
    pub fn path_length(&self, path: &[usize]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |acc, step| {
            self.has_edge(step[0], step[1])
                .then(|| acc + self.weight(step[0], step[1]))
        })
    }

    /// Shortest path `source -> target` (Dijkstra, dense O(n²)).
    ///
    /// Returns the node sequence including both endpoints and its length, or
    /// `None` when `target` is unreachable.
    #[must_use]
    pub fn shortest_path(&self, source: usize, target: usize) -> Option<(Vec<usize>, f64)> {
        let n = self.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut settled = vec![false; n];
        dist[source] = 0.0;

        for _ in 0..n {
            let next = (0..n)
                .filter(|&v| !settled[v] && dist[v].is_finite())
                .min_by(|&a, &b| dist[a].total_cmp(&dist[b]));
            let Some(u) = next else { break };
            if u == target {
                break;
            }
            settled[u] = true;

            for v in 0..n {
                if settled[v] || !self.has_edge(u, v) {
                    continue;
                }
                let candidate = dist[u] + self.weight(u, v);
                if candidate < dist[v] {
                    dist[v] = candidate;
                    parent[v] = Some(u);
                }
            }
        }

        if !dist[target].is_finite() {
            return None;
        }

        let mut path = vec![target];
        let mut cursor = target;
        while let Some(prev) = parent[cursor] {
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        Some((path, dist[target]))
    }
}
