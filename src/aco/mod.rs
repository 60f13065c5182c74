//! Ant Colony Optimization for round-trip tours over a weighted graph.
//!
//! A run is `iterations` rounds of: evaporate + reinforce (except the first
//! round), build `ants_per_iteration` tours, record the shortest one. Ants are
//! either built on the calling thread or split across a fixed worker count.
//!
//! Shared mutable state during a round is limited to two synchronized
//! accessors:
//!
//! - [`PheromoneDelta`]: pending reinforcement, merged once per worker.
//! - [`BestTourRecord`]: shortest tour of the run so far.
//!
//! They are never locked at the same time. The trail matrix is read-only while
//! ants walk and is only updated between rounds.
//!
//! # Example
//!
//! ```rust
//! use parallels::aco::{AntColonyEngine, ColonyParams, ColonyStrategy};
//! use parallels::matrix::Matrix;
//!
//! let graph = Matrix::from_rows(vec![
//!     vec![0.0, 1.0, 4.0, 3.0],
//!     vec![1.0, 0.0, 2.0, 5.0],
//!     vec![4.0, 2.0, 0.0, 6.0],
//!     vec![3.0, 5.0, 6.0, 0.0],
//! ])
//! .unwrap();
//!
//! let mut engine = AntColonyEngine::new(ColonyParams::default().with_ants(200));
//! engine.configure(graph, 5).unwrap();
//! let tour = engine.solve(ColonyStrategy::Parallel { workers: 2 }).unwrap();
//!
//! assert_eq!(tour.path.first(), Some(&0));
//! assert_eq!(tour.path.last(), Some(&0));
//! assert!(tour.is_valid());
//! ```

pub mod ant;
pub mod graph;
pub mod pheromone;
pub mod tour;

use std::ops::Range;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::engine::rng::SimRng;
use crate::engine::{check_workers, even_ranges, join_all};
use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

pub use ant::Ant;
pub use graph::Graph;
pub use pheromone::{PheromoneDelta, PheromoneMatrix};
pub use tour::{BestTourRecord, TourResult};

/// Tunable colony constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColonyParams {
    /// Tours built per iteration.
    pub ants_per_iteration: usize,
    /// Fraction of the trail kept at each evaporation.
    pub decay: f64,
    /// Reinforcement constant `Q`; an edge gains `Q / tour_length`.
    pub deposit: f64,
    /// Trail on every existing edge before the first iteration.
    pub initial_pheromone: f64,
    /// Master seed for the per-worker random streams.
    pub seed: u64,
}

impl Default for ColonyParams {
    fn default() -> Self {
        Self {
            ants_per_iteration: 6000,
            decay: 0.5,
            deposit: 10.0,
            initial_pheromone: 0.2,
            seed: 42,
        }
    }
}

impl ColonyParams {
    /// Set ants per iteration.
    #[must_use]
    pub const fn with_ants(mut self, ants: usize) -> Self {
        self.ants_per_iteration = ants;
        self
    }

    /// Set the evaporation factor.
    #[must_use]
    pub const fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Set the reinforcement constant.
    #[must_use]
    pub const fn with_deposit(mut self, deposit: f64) -> Self {
        self.deposit = deposit;
        self
    }

    /// Set the initial trail.
    #[must_use]
    pub const fn with_initial_pheromone(mut self, initial: f64) -> Self {
        self.initial_pheromone = initial;
        self
    }

    /// Set the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> ParResult<()> {
        if self.ants_per_iteration == 0 {
            return Err(ParError::invalid_parameter(
                "ants_per_iteration",
                "at least one ant per iteration is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(ParError::invalid_parameter(
                "decay",
                format!("{} is outside [0, 1]", self.decay),
            ));
        }
        if !(self.deposit.is_finite() && self.deposit > 0.0) {
            return Err(ParError::invalid_parameter(
                "deposit",
                format!("{} must be finite and positive", self.deposit),
            ));
        }
        if !(self.initial_pheromone.is_finite() && self.initial_pheromone > 0.0) {
            return Err(ParError::invalid_parameter(
                "initial_pheromone",
                format!("{} must be finite and positive", self.initial_pheromone),
            ));
        }
        Ok(())
    }
}

/// How the ants of one iteration are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ColonyStrategy {
    /// All ants on the calling thread.
    Sequential,
    /// Ants split into `workers` contiguous batches.
    Parallel {
        /// Worker threads per iteration.
        workers: usize,
    },
}

impl ColonyStrategy {
    /// Short display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel { .. } => "parallel",
        }
    }
}

/// Everything a worker needs for one iteration, shared by reference.
struct Round<'a> {
    graph: &'a Graph,
    pheromone: &'a PheromoneMatrix,
    delta: &'a PheromoneDelta,
    best: &'a BestTourRecord,
    deposit: f64,
}

impl Round<'_> {
    /// Build the ants in `batch`, then merge the local delta and offer the
    /// local best under this worker's index. The two shared locks are taken
    /// one after the other.
    fn run_batch(&self, worker: usize, batch: Range<usize>, mut rng: SimRng) -> ParResult<()> {
        let mut ant = Ant::new(self.graph.node_count());
        let mut local_delta = self.delta.local();
        let mut local_best = TourResult::pending();

        for _ in batch {
            let tour = ant.construct(self.graph, self.pheromone, &mut rng)?;
            tour.deposit_into(&mut local_delta, self.deposit);
            if tour.improves_on(&local_best) {
                local_best = tour;
            }
        }

        self.delta.merge(worker, local_delta)?;
        if local_best.is_valid() {
            self.best.offer(worker, local_best)?;
        }
        Ok(())
    }
}

/// Colony solver bound to one graph.
#[derive(Debug, Clone)]
pub struct AntColonyEngine {
    params: ColonyParams,
    graph: Option<Graph>,
    iterations: usize,
    history: Vec<f64>,
}

impl AntColonyEngine {
    /// Unconfigured engine.
    #[must_use]
    pub const fn new(params: ColonyParams) -> Self {
        Self {
            params,
            graph: None,
            iterations: 0,
            history: Vec::new(),
        }
    }

    /// Colony constants.
    #[must_use]
    pub const fn params(&self) -> &ColonyParams {
        &self.params
    }

    /// Configured graph, if any.
    #[must_use]
    pub const fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// Configured iteration count.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Best distance after each iteration of the last successful solve.
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Bind an adjacency matrix and an iteration count.
    ///
    /// On error the engine keeps its previous configuration.
    ///
    /// # Errors
    ///
    /// Graph validation errors (see [`Graph::new`]) or `InvalidParameter` for
    /// zero iterations.
    pub fn configure(&mut self, adjacency: Matrix, iterations: usize) -> ParResult<()> {
        if iterations == 0 {
            return Err(ParError::invalid_parameter(
                "iterations",
                "at least one iteration is required",
            ));
        }
        let graph = Graph::new(adjacency)?;
        debug!(nodes = graph.node_count(), iterations, "colony configured");
        self.graph = Some(graph);
        self.iterations = iterations;
        self.history.clear();
        Ok(())
    }

    /// Run the colony and return the shortest tour found.
    ///
    /// The result is deterministic for a given seed and worker count: deltas
    /// are summed in worker order and equal-length tours resolve to the
    /// lowest worker index.
    ///
    /// # Errors
    ///
    /// - `NullInput` before [`AntColonyEngine::configure`]
    /// - `InvalidParameter` for zero workers or bad [`ColonyParams`]
    /// - `InvalidGraph` if an ant cannot complete a round trip
    /// - `WorkerPanicked` / `Poisoned` if a worker thread fails
    pub fn solve(&mut self, strategy: ColonyStrategy) -> ParResult<TourResult> {
        let graph = self.graph.as_ref().ok_or(ParError::NullInput {
            what: "adjacency matrix",
        })?;
        let workers = match strategy {
            ColonyStrategy::Sequential => 1,
            ColonyStrategy::Parallel { workers } => check_workers(workers)?,
        };
        self.params.validate()?;

        info!(
            strategy = strategy.name(),
            nodes = graph.node_count(),
            iterations = self.iterations,
            ants = self.params.ants_per_iteration,
            workers,
            "solving"
        );

        let batches = even_ranges(self.params.ants_per_iteration, workers);
        let mut rng = SimRng::new(self.params.seed);
        let mut pheromone = PheromoneMatrix::new(graph, self.params.initial_pheromone);
        let delta = PheromoneDelta::new(graph.node_count());
        let best = BestTourRecord::new();
        let mut history = Vec::with_capacity(self.iterations);

        for iteration in 0..self.iterations {
            if iteration > 0 {
                let reinforcement = delta.drain()?;
                pheromone.evaporate(graph, self.params.decay, &reinforcement);
            }

            let round = Round {
                graph,
                pheromone: &pheromone,
                delta: &delta,
                best: &best,
                deposit: self.params.deposit,
            };
            let streams = rng.partition(workers);

            match strategy {
                ColonyStrategy::Sequential => {
                    for (worker, (batch, stream)) in batches.iter().cloned().zip(streams).enumerate()
                    {
                        round.run_batch(worker, batch, stream)?;
                    }
                }
                ColonyStrategy::Parallel { .. } => {
                    let round = &round;
                    let outcomes = thread::scope(|s| {
                        let handles = batches
                            .iter()
                            .cloned()
                            .zip(streams)
                            .enumerate()
                            .map(|(worker, (batch, stream))| {
                                s.spawn(move || round.run_batch(worker, batch, stream))
                            })
                            .collect();
                        join_all(handles, "ant colony batch")
                    })?;
                    outcomes.into_iter().collect::<ParResult<Vec<()>>>()?;
                }
            }

            let current = best.snapshot()?.distance;
            trace!(iteration, best = current, "iteration complete");
            history.push(current);
        }

        let result = best.into_inner()?;
        if !result.is_valid() {
            return Err(ParError::invalid_graph("no tour was constructed"));
        }

        info!(distance = result.distance, "colony finished");
        self.history = history;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(n: usize) -> Matrix {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let d = i.abs_diff(j);
                    m.set(i, j, d.min(n - d) as f64);
                }
            }
        }
        m
    }

    fn engine(ants: usize) -> AntColonyEngine {
        AntColonyEngine::new(ColonyParams::default().with_ants(ants).with_seed(9))
    }

    #[test]
    fn test_default_params() {
        let p = ColonyParams::default();
        assert_eq!(p.ants_per_iteration, 6000);
        assert!((p.decay - 0.5).abs() < f64::EPSILON);
        assert!((p.deposit - 10.0).abs() < f64::EPSILON);
        assert!((p.initial_pheromone - 0.2).abs() < f64::EPSILON);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let base = ColonyParams::default();
        assert!(base.with_ants(0).validate().is_err());
        assert!(base.with_decay(1.5).validate().is_err());
        assert!(base.with_decay(f64::NAN).validate().is_err());
        assert!(base.with_deposit(0.0).validate().is_err());
        assert!(base.with_initial_pheromone(-0.1).validate().is_err());
    }

    #[test]
    fn test_solve_before_configure() {
        let err = engine(10).solve(ColonyStrategy::Sequential).unwrap_err();
        assert!(matches!(err, ParError::NullInput { .. }));
    }

    #[test]
    fn test_configure_rejects_zero_iterations() {
        let mut e = engine(10);
        let err = e.configure(square(4), 0).unwrap_err();
        assert!(matches!(
            err,
            ParError::InvalidParameter {
                name: "iterations",
                ..
            }
        ));
        assert!(e.graph().is_none());
        assert_eq!(e.iterations(), 0);
    }

    #[test]
    fn test_configure_binds_graph_and_iterations() {
        let mut e = engine(10);
        e.configure(square(5), 7).unwrap();
        assert_eq!(e.iterations(), 7);
        assert_eq!(e.params().ants_per_iteration, 10);
        assert_eq!(e.params().seed, 9);
        assert_eq!(e.graph().map(Graph::node_count), Some(5));
    }

    #[test]
    fn test_zero_workers() {
        let mut e = engine(10);
        e.configure(square(4), 1).unwrap();
        let err = e.solve(ColonyStrategy::Parallel { workers: 0 }).unwrap_err();
        assert!(matches!(err, ParError::InvalidParameter { .. }));
        assert!(e.history().is_empty());
    }

    #[test]
    fn test_ring_optimum_found() {
        // Ring distances: the optimal tour walks around the ring, length n.
        let mut e = engine(200);
        e.configure(square(6), 5).unwrap();
        let tour = e.solve(ColonyStrategy::Sequential).unwrap();
        assert!((tour.distance - 6.0).abs() < 1e-9, "got {}", tour.distance);
    }

    #[test]
    fn test_history_per_iteration_non_increasing() {
        let mut e = engine(20);
        e.configure(square(8), 6).unwrap();
        e.solve(ColonyStrategy::Parallel { workers: 3 }).unwrap();
        let h = e.history();
        assert_eq!(h.len(), 6);
        assert!(h.iter().all(|&d| d >= 0.0));
        assert!(h.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_parallel_deterministic_for_seed() {
        let run = || {
            let mut e = engine(40);
            e.configure(square(7), 4).unwrap();
            let tour = e.solve(ColonyStrategy::Parallel { workers: 4 }).unwrap();
            (tour, e.history().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_equal_length_tours_resolve_the_same_way() {
        // Every tour on the 4-ring ties with its reverse.
        let paths: std::collections::HashSet<Vec<usize>> = (0..200)
            .map(|_| {
                let mut e = engine(16);
                e.configure(square(4), 1).unwrap();
                e.solve(ColonyStrategy::Parallel { workers: 16 })
                    .unwrap()
                    .path
            })
            .collect();
        assert_eq!(paths.len(), 1, "{paths:?}");
    }

    #[test]
    fn test_sequential_matches_single_worker() {
        let mut seq = engine(30);
        seq.configure(square(5), 3).unwrap();
        let a = seq.solve(ColonyStrategy::Sequential).unwrap();

        let mut par = engine(30);
        par.configure(square(5), 3).unwrap();
        let b = par.solve(ColonyStrategy::Parallel { workers: 1 }).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_more_workers_than_ants() {
        let mut e = engine(2);
        e.configure(square(4), 2).unwrap();
        let tour = e.solve(ColonyStrategy::Parallel { workers: 5 }).unwrap();
        assert!(tour.is_valid());
    }

    #[test]
    fn test_invalid_graph_surfaces_from_workers() {
        let mut m = square(4);
        for i in 0..4 {
            m.set(i, 3, 0.0);
        }
        let mut e = engine(8);
        e.configure(m, 2).unwrap();
        let err = e.solve(ColonyStrategy::Parallel { workers: 2 }).unwrap_err();
        assert!(matches!(err, ParError::InvalidGraph(_)));
    }

    #[test]
    fn test_strategy_serde() {
        let s = ColonyStrategy::Parallel { workers: 3 };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"kind":"parallel","workers":3}"#);
        assert_eq!(serde_json::from_str::<ColonyStrategy>(&json).unwrap(), s);
    }
}
