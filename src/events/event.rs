//! # Lifecycle events emitted by the orchestrator and workers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Service events**: before/after pairs around each of the four signals
//! - **Worker events**: per-worker start, completion, and swallowed faults
//! - **Runtime events**: start failures, drain grace, observer isolation
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Service events are emitted synchronously on the caller's path; worker events are
//! emitted from the worker's own task or thread.
//!
//! ## Example
//! ```rust
//! use workvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerFaulted)
//!     .with_worker("ingest")
//!     .with_reason("connection reset")
//!     .with_iteration(7);
//!
//! assert_eq!(ev.kind, EventKind::WorkerFaulted);
//! assert_eq!(ev.worker.as_deref(), Some("ingest"));
//! assert_eq!(ev.iteration, Some(7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Service events ===
    /// Start accepted; about to broadcast to workers.
    ///
    /// Sets: `args`
    ServiceStarting,
    /// Every worker was started.
    ///
    /// Sets: `args`
    ServiceStarted,
    /// Stop accepted; about to broadcast and drain.
    ServiceStopping,
    /// Every worker completed.
    ServiceStopped,
    /// About to close every gate.
    ServicePausing,
    /// Every gate closed.
    ServicePaused,
    /// About to open every gate.
    ServiceContinuing,
    /// Every gate opened.
    ServiceContinued,

    // === Worker events ===
    /// A worker scheduled its execution unit.
    ///
    /// Sets: `worker`
    WorkerStarted,
    /// A worker's execution unit exited (thread workers: the last thread).
    ///
    /// Sets: `worker`
    WorkerCompleted,
    /// A unit of work returned an error or panicked; the fault was swallowed.
    ///
    /// Sets: `worker`, `reason`, `iteration`
    WorkerFaulted,

    // === Runtime events ===
    /// A worker refused to start; the service rolled back.
    ///
    /// Sets: `worker`, `reason`
    StartFailed,
    /// The bounded drain ran out of time.
    ///
    /// Sets: `timeout_ms`, `reason` (stuck workers)
    GraceExceeded,
    /// An observer panicked while handling an event.
    ///
    /// Sets: `observer`, `reason`
    ObserverPanicked,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker, if applicable.
    pub worker: Option<Arc<str>>,
    /// Name of the observer, for `ObserverPanicked`.
    pub observer: Option<&'static str>,
    /// Human-readable reason (errors, panic payloads, stuck workers).
    pub reason: Option<Arc<str>>,
    /// Iteration of the unit of work (starting from 1).
    pub iteration: Option<u64>,
    /// Grace in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Start arguments.
    pub args: Option<Arc<[String]>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            observer: None,
            reason: None,
            iteration: None,
            timeout_ms: None,
            args: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an iteration number.
    #[inline]
    pub fn with_iteration(mut self, n: u64) -> Self {
        self.iteration = Some(n);
        self
    }

    /// Attaches a timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches start arguments.
    #[inline]
    pub fn with_args(mut self, args: Arc<[String]>) -> Self {
        self.args = Some(args);
        self
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::ObserverPanicked).with_reason(info);
        ev.observer = Some(observer);
        ev
    }

    /// Whether this event was emitted by a worker rather than the service.
    #[inline]
    pub fn is_worker_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::WorkerStarted | EventKind::WorkerCompleted | EventKind::WorkerFaulted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::ServiceStarting);
        let b = Event::new(EventKind::ServiceStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_is_clamped_to_u32_millis() {
        let ev = Event::new(EventKind::GraceExceeded).with_timeout(Duration::from_secs(u64::MAX / 1000));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn observer_panic_carries_observer_name() {
        let ev = Event::observer_panicked("audit", "boom".into());
        assert_eq!(ev.observer, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert!(!ev.is_worker_event());
    }
}
