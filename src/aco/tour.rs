//! Tours and the shared best-tour record.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{ParError, ParResult};
use crate::matrix::Matrix;

/// A closed tour: `path` starts and ends at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourResult {
    /// Visited nodes in order (0-based), closing path included.
    pub path: Vec<usize>,
    /// Total length; [`TourResult::PENDING_DISTANCE`] while no tour exists.
    pub distance: f64,
}

impl TourResult {
    /// Sentinel distance meaning "no valid tour yet".
    pub const PENDING_DISTANCE: f64 = -1.0;

    /// Create a tour.
    #[must_use]
    pub const fn new(path: Vec<usize>, distance: f64) -> Self {
        Self { path, distance }
    }

    /// The "no tour yet" sentinel.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            path: Vec::new(),
            distance: Self::PENDING_DISTANCE,
        }
    }

    /// False for the sentinel.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.distance >= 0.0 && !self.path.is_empty()
    }

    /// True if `self` is valid and strictly shorter than `other`, or `other`
    /// is the sentinel.
    #[must_use]
    pub fn improves_on(&self, other: &Self) -> bool {
        self.is_valid() && (!other.is_valid() || self.distance < other.distance)
    }

    /// Path converted to 1-based node labels for display.
    #[must_use]
    pub fn one_based(&self) -> Vec<usize> {
        self.path.iter().map(|v| v + 1).collect()
    }

    /// Add `deposit / distance` to every traversed edge in `delta`.
    pub fn deposit_into(&self, delta: &mut Matrix, deposit: f64) {
        if !self.is_valid() || self.distance <= 0.0 {
            return;
        }
        let amount = deposit / self.distance;
        for step in self.path.windows(2) {
            delta.add_to(step[0], step[1], amount);
        }
    }
}

/// Lowest-distance tour seen so far, shared by all workers of one run.
///
/// Starts at the sentinel. A candidate replaces the record when it is
/// strictly shorter, or equally long and offered by a lower worker index,
/// so the outcome does not depend on the order workers arrive in.
#[derive(Debug)]
pub struct BestTourRecord {
    best: Mutex<Held>,
}

#[derive(Debug)]
struct Held {
    tour: TourResult,
    worker: usize,
}

impl Held {
    fn replaced_by(&self, worker: usize, candidate: &TourResult) -> bool {
        if !candidate.is_valid() {
            return false;
        }
        if !self.tour.is_valid() {
            return true;
        }
        match candidate.distance.partial_cmp(&self.tour.distance) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => worker < self.worker,
            _ => false,
        }
    }
}

impl Default for BestTourRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl BestTourRecord {
    /// Empty record holding the sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            best: Mutex::new(Held {
                tour: TourResult::pending(),
                worker: usize::MAX,
            }),
        }
    }

    /// Offer `worker`'s best tour; replaces the record if it wins.
    ///
    /// Returns whether the record changed.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a worker panicked while holding the lock.
    pub fn offer(&self, worker: usize, candidate: TourResult) -> ParResult<bool> {
        let mut held = self.lock()?;
        if held.replaced_by(worker, &candidate) {
            *held = Held {
                tour: candidate,
                worker,
            };
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Copy of the current record (may be the sentinel).
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if the lock was poisoned.
    pub fn snapshot(&self) -> ParResult<TourResult> {
        Ok(self.lock()?.tour.clone())
    }

    /// Consume the record.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if the lock was poisoned.
    pub fn into_inner(self) -> ParResult<TourResult> {
        self.best
            .into_inner()
            .map(|held| held.tour)
            .map_err(|_| ParError::Poisoned {
                resource: "best tour record",
            })
    }

    fn lock(&self) -> ParResult<MutexGuard<'_, Held>> {
        self.best.lock().map_err(|_| ParError::Poisoned {
            resource: "best tour record",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_sentinel() {
        let t = TourResult::pending();
        assert!(!t.is_valid());
        assert!((t.distance - TourResult::PENDING_DISTANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_improves_on() {
        let short = TourResult::new(vec![0, 1, 2, 0], 5.0);
        let long = TourResult::new(vec![0, 2, 1, 0], 7.0);
        assert!(short.improves_on(&long));
        assert!(!long.improves_on(&short));
        assert!(!short.improves_on(&short.clone()), "ties do not replace");
        assert!(long.improves_on(&TourResult::pending()));
        assert!(!TourResult::pending().improves_on(&long));
    }

    #[test]
    fn test_one_based() {
        let t = TourResult::new(vec![0, 2, 1, 0], 3.0);
        assert_eq!(t.one_based(), vec![1, 3, 2, 1]);
    }

    #[test]
    fn test_deposit_into() {
        let t = TourResult::new(vec![0, 1, 2, 0], 4.0);
        let mut delta = Matrix::zeros(3, 3);
        t.deposit_into(&mut delta, 10.0);
        assert!((delta.get(0, 1) - 2.5).abs() < 1e-12);
        assert!((delta.get(1, 2) - 2.5).abs() < 1e-12);
        assert!((delta.get(2, 0) - 2.5).abs() < 1e-12);
        assert!(delta.get(1, 0).abs() < 1e-12);
    }

    #[test]
    fn test_pending_tour_deposits_nothing() {
        let mut delta = Matrix::zeros(2, 2);
        TourResult::pending().deposit_into(&mut delta, 10.0);
        assert!(delta.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_record_first_valid_candidate_wins() {
        let record = BestTourRecord::new();
        assert!(!record.snapshot().unwrap().is_valid());
        assert!(record.offer(0, TourResult::new(vec![0, 1, 0], 9.0)).unwrap());
        assert!((record.snapshot().unwrap().distance - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_record_only_strictly_shorter_replaces() {
        let record = BestTourRecord::new();
        record.offer(2, TourResult::new(vec![0, 1, 2, 0], 9.0)).unwrap();
        assert!(!record.offer(2, TourResult::new(vec![0, 2, 1, 0], 9.0)).unwrap());
        assert!(!record.offer(3, TourResult::new(vec![0, 2, 1, 0], 9.0)).unwrap());
        assert!(!record.offer(0, TourResult::new(vec![0, 2, 1, 0], 12.0)).unwrap());
        assert!(!record.offer(0, TourResult::pending()).unwrap());
        assert!(record.offer(5, TourResult::new(vec![0, 2, 1, 0], 8.0)).unwrap());

        let best = record.into_inner().unwrap();
        assert_eq!(best.path, vec![0, 2, 1, 0]);
    }

    #[test]
    fn test_record_concurrent_offers_keep_minimum() {
        let record = BestTourRecord::new();
        std::thread::scope(|s| {
            for worker in 0..8_usize {
                let record = &record;
                s.spawn(move || {
                    for k in 0..50 {
                        let d = 100.0 - (worker * 50 + k) as f64 * 0.1;
                        record
                            .offer(worker, TourResult::new(vec![0, 1, 0], d))
                            .unwrap();
                    }
                });
            }
        });
        let best = record.into_inner().unwrap();
        assert!((best.distance - (100.0 - 399.0 * 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_record_tie_goes_to_lowest_worker() {
        let forward = TourResult::new(vec![0, 1, 2, 3, 0], 4.0);
        let reverse = TourResult::new(vec![0, 3, 2, 1, 0], 4.0);

        let record = BestTourRecord::new();
        assert!(record.offer(3, forward.clone()).unwrap());
        assert!(record.offer(1, reverse.clone()).unwrap());
        assert!(!record.offer(2, forward.clone()).unwrap());
        assert_eq!(record.snapshot().unwrap(), reverse);

        // Arrival order does not matter.
        let record = BestTourRecord::new();
        record.offer(1, reverse.clone()).unwrap();
        record.offer(3, forward).unwrap();
        assert_eq!(record.into_inner().unwrap(), reverse);
    }

    #[test]
    fn test_record_concurrent_ties_settle_on_worker_zero() {
        for _ in 0..50 {
            let record = BestTourRecord::new();
            std::thread::scope(|s| {
                for worker in 0..16_usize {
                    let record = &record;
                    s.spawn(move || {
                        let path = if worker % 2 == 0 {
                            vec![0, 1, 2, 3, 0]
                        } else {
                            vec![0, 3, 2, 1, 0]
                        };
                        record.offer(worker, TourResult::new(path, 4.0)).unwrap();
                    });
                }
            });
            assert_eq!(record.into_inner().unwrap().path, vec![0, 1, 2, 3, 0]);
        }
    }
}
