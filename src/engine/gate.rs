//! Readiness gates for pipelined stages.
//!
//! Each gate is a tiny state machine, `Pending → Ready` on success or
//! `Pending → Failed` when its producer unwinds without opening it. A consumer
//! blocks in [`GateSet::wait_all`] until every gate it depends on has left
//! `Pending`; there is no polling and no nested locking, one mutex and one
//! condition variable guard the whole set.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::error::{ParError, ParResult};

/// State of a single readiness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Producer has not finished yet.
    Pending,
    /// Producer finished and its output is visible to waiters.
    Ready,
    /// Producer terminated without opening the gate.
    Failed,
}

/// A fixed set of named gates sharing one condition variable.
#[derive(Debug)]
pub struct GateSet {
    names: Vec<&'static str>,
    states: Mutex<Vec<GateState>>,
    changed: Condvar,
}

impl GateSet {
    /// Create a set with one `Pending` gate per name.
    #[must_use]
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
            states: Mutex::new(vec![GateState::Pending; names.len()]),
            changed: Condvar::new(),
        }
    }

    /// Number of gates in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set has no gates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Current state of a gate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown gate index.
    pub fn state(&self, gate: usize) -> ParResult<GateState> {
        self.check_index(gate)?;
        Ok(self.lock()?[gate])
    }

    /// Transition a gate to `Ready` and wake all waiters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown gate index, or if the gate
    /// already failed.
    pub fn open(&self, gate: usize) -> ParResult<()> {
        self.transition(gate, GateState::Ready)
    }

    /// Transition a gate to `Failed` and wake all waiters.
    ///
    /// Never blocks on a poisoned lock: failure must always be observable.
    pub fn fail(&self, gate: usize) {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = states.get_mut(gate) {
            if *state == GateState::Pending {
                *state = GateState::Failed;
            }
        }
        drop(states);
        self.changed.notify_all();
    }

    /// Arm a guard that fails `gate` unless it is explicitly opened.
    #[must_use]
    pub fn guard(&self, gate: usize) -> GateGuard<'_> {
        GateGuard {
            set: self,
            gate,
            opened: false,
        }
    }

    /// Block until every listed gate is `Ready`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerPanicked` naming the first awaited gate that `Failed`,
    /// `InvalidParameter` for an unknown index, or `Poisoned` if the lock was
    /// poisoned.
    pub fn wait_all(&self, gates: &[usize]) -> ParResult<()> {
        for &gate in gates {
            self.check_index(gate)?;
        }

        let mut states = self.lock()?;
        loop {
            if let Some(&failed) = gates.iter().find(|&&g| states[g] == GateState::Failed) {
                return Err(ParError::WorkerPanicked {
                    stage: self.names[failed],
                });
            }
            if gates.iter().all(|&g| states[g] == GateState::Ready) {
                return Ok(());
            }
            states = self
                .changed
                .wait(states)
                .map_err(|_| ParError::Poisoned {
                    resource: "readiness gates",
                })?;
        }
    }

    fn transition(&self, gate: usize, to: GateState) -> ParResult<()> {
        self.check_index(gate)?;
        let mut states = self.lock()?;
        if states[gate] == GateState::Failed {
            return Err(ParError::invalid_parameter(
                "gate",
                format!("'{}' already failed", self.names[gate]),
            ));
        }
        states[gate] = to;
        drop(states);
        self.changed.notify_all();
        Ok(())
    }

    fn check_index(&self, gate: usize) -> ParResult<()> {
        if gate < self.names.len() {
            Ok(())
        } else {
            Err(ParError::invalid_parameter(
                "gate",
                format!("index {gate} out of range for {} gates", self.names.len()),
            ))
        }
    }

    fn lock(&self) -> ParResult<MutexGuard<'_, Vec<GateState>>> {
        self.states.lock().map_err(|_| ParError::Poisoned {
            resource: "readiness gates",
        })
    }
}

/// Fails its gate on drop unless [`GateGuard::open`] was called.
///
/// A producer that panics mid-stage unwinds through the guard, so waiters see
/// `Failed` instead of blocking forever.
#[derive(Debug)]
pub struct GateGuard<'a> {
    set: &'a GateSet,
    gate: usize,
    opened: bool,
}

impl GateGuard<'_> {
    /// Open the guarded gate.
    ///
    /// # Errors
    ///
    /// Propagates [`GateSet::open`] errors.
    pub fn open(mut self) -> ParResult<()> {
        self.opened = true;
        self.set.open(self.gate)
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        if !self.opened {
            self.set.fail(self.gate);
        }
    }
}
