//! Shared execution primitives.
//!
//! Both engines are built from the same small toolkit:
//! - Deterministic RNG (PCG with partitioned streams, one per worker)
//! - Even index-range partitioning for fixed worker pools
//! - Readiness gates for pipelined stages

pub mod gate;
pub mod partition;
pub mod rng;

pub use gate::{GateGuard, GateSet, GateState};
pub use partition::even_ranges;
pub use rng::SimRng;

use std::thread::ScopedJoinHandle;

use crate::error::{ParError, ParResult};

/// Join every scoped worker, then report the first panic as `WorkerPanicked`.
///
/// All handles are joined before any error is returned, so the enclosing
/// `thread::scope` never re-raises a worker panic.
pub(crate) fn join_all<T>(
    handles: Vec<ScopedJoinHandle<'_, T>>,
    stage: &'static str,
) -> ParResult<Vec<T>> {
    let joined: Vec<std::thread::Result<T>> =
        handles.into_iter().map(ScopedJoinHandle::join).collect();
    joined
        .into_iter()
        .map(|outcome| outcome.map_err(|_| ParError::WorkerPanicked { stage }))
        .collect()
}

/// Reject a zero worker count before any thread is spawned.
///
/// # Errors
///
/// Returns `InvalidParameter` when `workers == 0`.
pub fn check_workers(workers: usize) -> ParResult<usize> {
    if workers == 0 {
        Err(ParError::invalid_parameter(
            "workers",
            "worker count must be at least 1",
        ))
    } else {
        Ok(workers)
    }
}
