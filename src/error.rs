//! Error types used by the workvisor runtime and units of work.
//!
//! This module defines three error enums:
//!
//! - [`ServiceError`] - errors raised by the orchestrator's control path (propagated to callers).
//! - [`WorkerError`] - errors raised when a worker cannot schedule its execution unit.
//! - [`WorkError`] - errors raised by a single unit of work (swallowed at the worker boundary).
//!
//! All three provide `as_label` for logging and events.

use std::time::Duration;
use thiserror::Error;

use crate::core::{ServiceSignal, ServiceState};

/// # Errors produced by the service orchestrator.
///
/// These represent failures of the control path itself: bad construction,
/// signals issued in the wrong order, workers that refused to start,
/// or a bounded drain that ran out of time.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// An orchestrator was built without any workers.
    #[error("worker set must contain at least one worker")]
    EmptyWorkerSet,

    /// A lifecycle signal is not valid in the current service state.
    #[error("cannot {signal} while service is {from}")]
    InvalidTransition {
        /// State the service was in when the signal arrived.
        from: ServiceState,
        /// The rejected signal.
        signal: ServiceSignal,
    },

    /// A worker could not be started; already-started workers were stopped and drained.
    #[error("worker '{worker}' failed to start: {source}")]
    StartFailed {
        /// Name of the worker that failed.
        worker: String,
        /// Underlying worker error.
        #[source]
        source: WorkerError,
    },

    /// The configured drain grace elapsed before every worker completed.
    #[error("drain grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of workers that had not completed.
        stuck: Vec<String>,
    },

    /// I/O failure on an interactive console.
    #[error("console i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use workvisor::ServiceError;
    ///
    /// assert_eq!(ServiceError::EmptyWorkerSet.as_label(), "service_empty_worker_set");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::EmptyWorkerSet => "service_empty_worker_set",
            ServiceError::InvalidTransition { .. } => "service_invalid_transition",
            ServiceError::StartFailed { .. } => "service_start_failed",
            ServiceError::GraceExceeded { .. } => "service_grace_exceeded",
            ServiceError::Io(_) => "service_io",
        }
    }
}

/// # Errors produced when a worker schedules its execution unit.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// A pooled worker was started outside of a tokio runtime.
    #[error("no tokio runtime available to schedule the worker task")]
    NoRuntime,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// The worker already ran to completion and cannot be started again.
    #[error("worker already completed")]
    AlreadyCompleted,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::NoRuntime => "worker_no_runtime",
            WorkerError::Spawn { .. } => "worker_spawn_failed",
            WorkerError::AlreadyCompleted => "worker_already_completed",
        }
    }
}

/// # Errors produced by a unit of work.
///
/// Faults never leave the worker: they are reported to observers as
/// `WorkerFaulted` and then handled per [`FaultPolicy`](crate::FaultPolicy).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkError {
    /// This iteration failed; the worker may keep going depending on policy.
    #[error("work failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable error; the worker always exits.
    #[error("fatal work error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The unit observed cancellation and bailed out early.
    #[error("work cancelled")]
    Canceled,
}

impl WorkError {
    /// Shorthand for [`WorkError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        WorkError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`WorkError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        WorkError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use workvisor::WorkError;
    ///
    /// assert_eq!(WorkError::fail("boom").as_label(), "work_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Fail { .. } => "work_failed",
            WorkError::Fatal { .. } => "work_fatal",
            WorkError::Canceled => "work_canceled",
        }
    }

    /// Whether this error always terminates the worker, regardless of policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WorkError::Fatal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_state_and_signal() {
        let err = ServiceError::InvalidTransition {
            from: ServiceState::Stopped,
            signal: ServiceSignal::Start,
        };
        assert_eq!(err.to_string(), "cannot start while service is stopped");
        assert_eq!(err.as_label(), "service_invalid_transition");
    }

    #[test]
    fn only_fatal_is_fatal() {
        assert!(WorkError::fatal("x").is_fatal());
        assert!(!WorkError::fail("x").is_fatal());
        assert!(!WorkError::Canceled.is_fatal());
    }

    #[test]
    fn start_failed_keeps_source() {
        let err = ServiceError::StartFailed {
            worker: "w1".into(),
            source: WorkerError::NoRuntime,
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("no tokio runtime available to schedule the worker task")
        );
    }
}
