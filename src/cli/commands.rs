//! CLI command handlers.
//!
//! Each handler returns a serializable report; printing is left to
//! [`super::output`] so reports can be checked in tests.

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use super::args::{MatrixSource, RunOptions};
use super::input::load_matrix;
use super::output::{
    print_colony_report, print_help, print_json, print_version, print_winograd_report,
};
use super::{Args, Command};
use crate::aco::{AntColonyEngine, ColonyStrategy, Graph};
use crate::config::ParallelsConfig;
use crate::engine::rng::SimRng;
use crate::error::ParResult;
use crate::matrix::Matrix;
use crate::winograd::{WinogradEngine, WinogradStrategy};

/// Relative tolerance when comparing the strategies' products.
pub const AGREEMENT_TOLERANCE: f64 = 1e-9;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Winograd {
            left,
            right,
            workers,
            repeats,
            options,
        } => finish(
            run_winograd(&left, &right, workers, repeats, &options),
            options.json,
            |report| {
                print_winograd_report(report);
                report.agree
            },
        ),
        Command::Ant {
            graph,
            iterations,
            workers,
            ants,
            options,
        } => finish(
            run_ant(&graph, iterations, workers, ants, &options),
            options.json,
            |report| {
                print_colony_report(report);
                true
            },
        ),
        Command::Usage(message) => {
            eprintln!("Error: {message}");
            eprintln!("Run 'parallels help' for usage.");
            ExitCode::from(2)
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

fn finish<R: Serialize>(
    outcome: ParResult<R>,
    json: bool,
    print_text: impl FnOnce(&R) -> bool,
) -> ExitCode {
    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let passed = if json {
        match print_json(&report) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Error: {e}");
                false
            }
        }
    } else {
        print_text(&report)
    };

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Base configuration plus the shared command-line overrides.
///
/// # Errors
///
/// Returns config load/validation errors.
pub fn load_config(options: &RunOptions) -> ParResult<ParallelsConfig> {
    let mut config = match &options.config {
        Some(path) => ParallelsConfig::load(path)?,
        None => ParallelsConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.reproducibility.seed = seed;
    }
    Ok(config)
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Wall-clock time of one Winograd strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyTiming {
    /// Strategy name.
    pub strategy: String,
    /// Number of timed runs.
    pub runs: usize,
    /// Total time over all runs.
    pub total_ms: f64,
    /// Mean time per run.
    pub mean_ms: f64,
}

/// Outcome of `parallels winograd`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinogradReport {
    /// Left operand shape.
    pub left: (usize, usize),
    /// Right operand shape.
    pub right: (usize, usize),
    /// Data-parallel worker count.
    pub workers: usize,
    /// Timed runs per strategy.
    pub repeats: usize,
    /// One entry per strategy.
    pub timings: Vec<StrategyTiming>,
    /// Largest cell difference from the sequential product.
    pub max_difference: f64,
    /// Whether every strategy matched the sequential product.
    pub agree: bool,
}

/// Time every Winograd strategy on one operand pair.
///
/// # Errors
///
/// Returns input, config, or engine errors.
pub fn run_winograd(
    left: &MatrixSource,
    right: &MatrixSource,
    workers: Option<usize>,
    repeats: Option<usize>,
    options: &RunOptions,
) -> ParResult<WinogradReport> {
    let config = load_config(options)?;
    let workers = workers.unwrap_or(config.winograd.workers);
    let repeats = repeats.unwrap_or(config.winograd.repeats).max(1);

    let mut rng = SimRng::new(config.reproducibility.seed);
    let a = left.resolve(&mut rng)?;
    let b = right.resolve(&mut rng)?;

    let mut timings = Vec::new();
    let mut products: Vec<Matrix> = Vec::new();
    for strategy in WinogradStrategy::all(workers) {
        let engine = WinogradEngine::new(strategy);
        let start = Instant::now();
        let mut product = engine.product(&a, &b)?;
        for _ in 1..repeats {
            product = engine.product(&a, &b)?;
        }
        let elapsed = start.elapsed();
        info!(strategy = strategy.name(), ?elapsed, repeats, "strategy timed");

        timings.push(StrategyTiming {
            strategy: strategy.name().to_string(),
            runs: repeats,
            total_ms: millis(elapsed),
            mean_ms: millis(elapsed) / repeats as f64,
        });
        products.push(product);
    }

    let max_difference = products.split_first().map_or(0.0, |(reference, others)| {
        others
            .iter()
            .map(|p| reference.max_abs_diff(p).unwrap_or(f64::INFINITY))
            .fold(0.0, f64::max)
    });
    let scale = products.first().map_or(1.0, |reference| {
        reference.as_slice().iter().fold(1.0_f64, |m, v| m.max(v.abs()))
    });

    Ok(WinogradReport {
        left: a.shape(),
        right: b.shape(),
        workers,
        repeats,
        timings,
        max_difference,
        agree: max_difference <= AGREEMENT_TOLERANCE * scale,
    })
}

/// One colony solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonyRun {
    /// Strategy name.
    pub strategy: String,
    /// Worker threads used.
    pub workers: usize,
    /// Wall-clock time.
    pub elapsed_ms: f64,
    /// Tour length.
    pub distance: f64,
    /// Tour with 1-based node labels.
    pub tour: Vec<usize>,
    /// Best distance after each iteration.
    pub history: Vec<f64>,
}

/// Outcome of `parallels ant`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonyReport {
    /// Node count.
    pub nodes: usize,
    /// Iterations per solve.
    pub iterations: usize,
    /// Ants per iteration.
    pub ants: usize,
    /// Sequential run first, then parallel.
    pub runs: Vec<ColonyRun>,
}

/// Solve the tour sequentially, then with the configured worker count.
///
/// # Errors
///
/// Returns input, config, or engine errors.
pub fn run_ant(
    graph: &Path,
    iterations: Option<usize>,
    workers: Option<usize>,
    ants: Option<usize>,
    options: &RunOptions,
) -> ParResult<ColonyReport> {
    let mut config = load_config(options)?;
    if let Some(n) = iterations {
        config.ant_colony.iterations = n;
    }
    if let Some(n) = workers {
        config.ant_colony.workers = n;
    }
    if let Some(n) = ants {
        config.ant_colony.ants_per_iteration = n;
    }

    let adjacency = load_matrix(graph)?;
    let mut engine = AntColonyEngine::new(config.colony_params());
    engine.configure(adjacency, config.ant_colony.iterations)?;

    let strategies = [
        ColonyStrategy::Sequential,
        ColonyStrategy::Parallel {
            workers: config.ant_colony.workers,
        },
    ];

    let mut runs = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let start = Instant::now();
        let tour = engine.solve(strategy)?;
        let elapsed = start.elapsed();
        info!(strategy = strategy.name(), ?elapsed, distance = tour.distance, "colony timed");

        runs.push(ColonyRun {
            strategy: strategy.name().to_string(),
            workers: match strategy {
                ColonyStrategy::Sequential => 1,
                ColonyStrategy::Parallel { workers } => workers,
            },
            elapsed_ms: millis(elapsed),
            distance: tour.distance,
            tour: tour.one_based(),
            history: engine.history().to_vec(),
        });
    }

    Ok(ColonyReport {
        nodes: engine.graph().map_or(0, Graph::node_count),
        iterations: engine.iterations(),
        ants: engine.params().ants_per_iteration,
        runs,
    })
}
