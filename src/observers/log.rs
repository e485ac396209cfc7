//! # LogWriter: tracing-backed event printer
//!
//! A minimal observer that renders every lifecycle [`Event`] through `tracing`.
//!
//! ## Example output
//! ```text
//! INFO workvisor: service starting args=["--verbose"]
//! DEBUG workvisor: worker started worker="worker-1"
//! WARN workvisor: worker fault swallowed worker="worker-2" iteration=14 reason="work failed: io"
//! INFO workvisor: service stopped
//! ```

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogWriter {
    fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ServiceStarting => {
                tracing::info!(target: "workvisor", seq = e.seq, args = ?e.args, "service starting");
            }
            EventKind::ServiceStarted => {
                tracing::info!(target: "workvisor", seq = e.seq, "service started");
            }
            EventKind::ServiceStopping => {
                tracing::info!(target: "workvisor", seq = e.seq, "service stopping");
            }
            EventKind::ServiceStopped => {
                tracing::info!(target: "workvisor", seq = e.seq, "service stopped");
            }
            EventKind::ServicePausing => {
                tracing::info!(target: "workvisor", seq = e.seq, "service pausing");
            }
            EventKind::ServicePaused => {
                tracing::info!(target: "workvisor", seq = e.seq, "service paused");
            }
            EventKind::ServiceContinuing => {
                tracing::info!(target: "workvisor", seq = e.seq, "service continuing");
            }
            EventKind::ServiceContinued => {
                tracing::info!(target: "workvisor", seq = e.seq, "service continued");
            }
            EventKind::WorkerStarted => {
                tracing::debug!(target: "workvisor", worker = ?e.worker, "worker started");
            }
            EventKind::WorkerCompleted => {
                tracing::debug!(target: "workvisor", worker = ?e.worker, "worker completed");
            }
            EventKind::WorkerFaulted => {
                tracing::warn!(
                    target: "workvisor",
                    worker = ?e.worker,
                    iteration = ?e.iteration,
                    reason = ?e.reason,
                    "worker fault swallowed"
                );
            }
            EventKind::StartFailed => {
                tracing::error!(target: "workvisor", worker = ?e.worker, reason = ?e.reason, "start failed");
            }
            EventKind::GraceExceeded => {
                tracing::error!(
                    target: "workvisor",
                    grace_ms = ?e.timeout_ms,
                    stuck = ?e.reason,
                    "drain grace exceeded"
                );
            }
            EventKind::ObserverPanicked => {
                tracing::error!(
                    target: "workvisor",
                    observer = e.observer.unwrap_or("unknown"),
                    info = e.reason.as_deref().unwrap_or("unknown"),
                    "observer panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
