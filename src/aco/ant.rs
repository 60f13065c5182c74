//! Single-ant tour construction (roulette-wheel walk plus closure).

use super::graph::Graph;
use super::pheromone::PheromoneMatrix;
use super::tour::TourResult;
use crate::engine::rng::SimRng;
use crate::error::{ParError, ParResult};

/// Start and end node of every tour.
pub const START_NODE: usize = 0;

/// Reusable per-worker scratch space for tour construction.
#[derive(Debug, Default)]
pub struct Ant {
    visited: Vec<bool>,
    wheel: Vec<(usize, f64)>,
}

impl Ant {
    /// Scratch buffers sized for `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            visited: vec![false; node_count],
            wheel: Vec::with_capacity(node_count),
        }
    }

    /// Walk one closed tour from [`START_NODE`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if the ant is stranded (unvisited nodes remain
    /// but none is directly reachable) or no path leads back to the start.
    pub fn construct(
        &mut self,
        graph: &Graph,
        pheromone: &PheromoneMatrix,
        rng: &mut SimRng,
    ) -> ParResult<TourResult> {
        let n = graph.node_count();
        self.visited.clear();
        self.visited.resize(n, false);
        self.visited[START_NODE] = true;

        let mut path = Vec::with_capacity(n + 1);
        path.push(START_NODE);
        let mut distance = 0.0;
        let mut current = START_NODE;

        for remaining in (1..n).rev() {
            let candidate = if remaining == 1 {
                self.last_unvisited()
                    .filter(|&node| graph.has_edge(current, node))
            } else {
                self.spin(graph, pheromone, current, rng)
            };
            let next = candidate.ok_or_else(|| {
                ParError::invalid_graph(format!(
                    "ant stranded at node {current} with {remaining} node(s) unvisited"
                ))
            })?;

            distance += graph.weight(current, next);
            self.visited[next] = true;
            path.push(next);
            current = next;
        }

        if graph.has_edge(current, START_NODE) {
            distance += graph.weight(current, START_NODE);
            path.push(START_NODE);
        } else {
            let (closing, length) = graph.shortest_path(current, START_NODE).ok_or_else(|| {
                ParError::invalid_graph(format!(
                    "no path from node {current} back to node {START_NODE}"
                ))
            })?;
            distance += length;
            path.extend_from_slice(&closing[1..]);
        }

        Ok(TourResult::new(path, distance))
    }

    fn last_unvisited(&self) -> Option<usize> {
        self.visited.iter().position(|seen| !seen)
    }

    /// Roulette-wheel pick among unvisited nodes with a direct edge.
    fn spin(
        &mut self,
        graph: &Graph,
        pheromone: &PheromoneMatrix,
        current: usize,
        rng: &mut SimRng,
    ) -> Option<usize> {
        self.wheel.clear();
        let mut total = 0.0;
        for node in 0..graph.node_count() {
            if self.visited[node] || !graph.has_edge(current, node) {
                continue;
            }
            total += pheromone.get(current, node) / graph.weight(current, node);
            self.wheel.push((node, total));
        }

        let &(fallback, _) = self.wheel.first()?;
        if total <= 0.0 {
            return Some(fallback);
        }

        let draw = rng.gen_f64();
        self.wheel
            .iter()
            .find(|(_, cumulative)| cumulative / total > draw)
            .or_else(|| self.wheel.last())
            .map(|&(node, _)| node)
    }
}
