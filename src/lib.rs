//! # parallels
//!
//! Sequential and multi-threaded execution strategies for two classic
//! algorithms, built so the strategies can be timed against each other and
//! checked for agreement:
//!
//! - **Winograd matrix multiplication**: sequential, data-parallel (fixed
//!   workers, two barriers) and a four-stage pipeline with readiness gates.
//! - **Ant Colony Optimization** for round-trip tours: sequential or split
//!   across workers that share a pheromone delta and a best-tour record.
//!
//! ## Example
//!
//! ```rust
//! use parallels::prelude::*;
//!
//! let mut rng = SimRng::new(42);
//! let a = Matrix::random(4, 5, -1.0, 1.0, &mut rng);
//! let b = Matrix::random(5, 3, -1.0, 1.0, &mut rng);
//!
//! let fast = WinogradEngine::new(WinogradStrategy::Pipeline).product(&a, &b).unwrap();
//! assert!(fast.approx_eq(&a.multiply(&b).unwrap(), 1e-9));
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,
)]

pub mod aco;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod winograd;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aco::{AntColonyEngine, ColonyParams, ColonyStrategy, TourResult};
    pub use crate::config::{ParallelsConfig, ParallelsConfigBuilder};
    pub use crate::engine::rng::SimRng;
    pub use crate::error::{ParError, ParResult};
    pub use crate::matrix::Matrix;
    pub use crate::winograd::{WinogradEngine, WinogradStrategy};
}

/// Re-export for public API
pub use error::{ParError, ParResult};
