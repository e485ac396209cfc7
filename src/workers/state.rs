//! # Worker identity and state.
//!
//! ```text
//! Idle ──start──► Running ⇄ Paused ──stop──► Stopping ──unit exits──► Completed
//!   └──────────────────────stop (never started)─────────────────────────┘
//! ```
//!
//! `Running` and `Paused` are one internal phase (`Active`); which one is
//! reported depends on the worker's gate.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

static WORKER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque worker identity, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    pub(crate) fn next() -> Self {
        Self(WORKER_SEQ.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Observable state of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Constructed, execution unit not yet scheduled.
    Idle,
    /// Scheduled and allowed to do work.
    Running,
    /// Scheduled, gate closed.
    Paused,
    /// Stop requested, execution unit still inside its loop.
    Stopping,
    /// Execution unit exited (terminal).
    Completed,
}

impl WorkerState {
    /// Whether the worker reached its terminal state.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, WorkerState::Completed)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::Paused => "paused",
            WorkerState::Stopping => "stopping",
            WorkerState::Completed => "completed",
        };
        f.write_str(s)
    }
}

const IDLE: u8 = 0;
const ACTIVE: u8 = 1;
const STOPPING: u8 = 2;
const COMPLETED: u8 = 3;

/// Internal lifecycle phase shared between a worker and its execution unit.
#[derive(Debug)]
pub(crate) struct Phase(AtomicU8);

impl Phase {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    /// Idle → Active. Returns `false` if the worker was already started or finished.
    pub(crate) fn activate(&self) -> bool {
        self.0
            .compare_exchange(IDLE, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Rolls back a failed activation.
    pub(crate) fn deactivate(&self) {
        let _ = self
            .0
            .compare_exchange(ACTIVE, IDLE, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Active → Stopping, or Idle → Completed for a worker that never started.
    pub(crate) fn request_stop(&self) {
        if self
            .0
            .compare_exchange(ACTIVE, STOPPING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let _ = self
                .0
                .compare_exchange(IDLE, COMPLETED, Ordering::AcqRel, Ordering::Acquire);
        }
    }

    /// Marks the execution unit as exited. Terminal.
    pub(crate) fn complete(&self) {
        self.0.store(COMPLETED, Ordering::Release);
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.0.load(Ordering::Acquire) == COMPLETED
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.0.load(Ordering::Acquire) == IDLE
    }

    /// Maps the phase to a public state, using the gate to split Running/Paused.
    pub(crate) fn state(&self, gate_open: bool) -> WorkerState {
        match self.0.load(Ordering::Acquire) {
            IDLE => WorkerState::Idle,
            ACTIVE if gate_open => WorkerState::Running,
            ACTIVE => WorkerState::Paused,
            STOPPING => WorkerState::Stopping,
            _ => WorkerState::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_ids_are_unique() {
        let a = WorkerId::next();
        let b = WorkerId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with('w'));
    }

    #[test]
    fn activate_happens_once() {
        let phase = Phase::new();
        assert!(phase.activate());
        assert!(!phase.activate());
        assert_eq!(phase.state(true), WorkerState::Running);
        assert_eq!(phase.state(false), WorkerState::Paused);
    }

    #[test]
    fn stop_before_start_completes_immediately() {
        let phase = Phase::new();
        phase.request_stop();
        assert!(phase.is_completed());
        assert!(!phase.activate());
    }

    #[test]
    fn stop_does_not_overwrite_completed() {
        let phase = Phase::new();
        assert!(phase.activate());
        phase.complete();
        phase.request_stop();
        assert_eq!(phase.state(true), WorkerState::Completed);
    }

    #[test]
    fn stop_after_start_is_stopping() {
        let phase = Phase::new();
        assert!(phase.activate());
        phase.request_stop();
        assert_eq!(phase.state(true), WorkerState::Stopping);
    }
}
