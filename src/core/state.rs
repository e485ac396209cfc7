//! # Service states and lifecycle signals.
//!
//! ```text
//!             start                  pause                 stop
//! Created ──────────► Starting ──► Running ──► Pausing ──► Paused ──────┐
//!    │                   │           ▲                       │          ▼
//!    │                   │           └── Continuing ◄────────┘      Stopping ──► Stopped
//!    │                   └──(a worker failed to start)──────────────────▲
//!    └──stop (nothing to drain)─────────────────────────────────────────┘
//! ```
//!
//! `Starting`, `Pausing`, `Continuing` and `Stopping` are observable only
//! while the corresponding broadcast (or drain) is in progress.

use std::fmt;

use crate::error::ServiceError;

/// Observable state of the whole service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    Created,
    Starting,
    Running,
    Pausing,
    Paused,
    Continuing,
    Stopping,
    Stopped,
}

impl ServiceState {
    /// True once the service can never run again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceState::Stopped)
    }

    /// Decides how `signal` applies in this state.
    pub(crate) fn accept(self, signal: ServiceSignal) -> Result<Step, ServiceError> {
        use ServiceSignal as S;
        use ServiceState as St;

        match (self, signal) {
            (St::Created, S::Start) => Ok(Step::Apply),
            (St::Created, S::Stop) => Ok(Step::Apply),
            (St::Running, S::Pause) => Ok(Step::Apply),
            (St::Running, S::Continue) => Ok(Step::Noop),
            (St::Running, S::Stop) => Ok(Step::Apply),
            (St::Paused, S::Pause) => Ok(Step::Noop),
            (St::Paused, S::Continue) => Ok(Step::Apply),
            (St::Paused, S::Stop) => Ok(Step::Apply),
            (St::Stopping, S::Stop) => Ok(Step::Apply),
            (St::Stopped, S::Stop) => Ok(Step::Noop),
            (from, signal) => Err(ServiceError::InvalidTransition { from, signal }),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Created => "created",
            ServiceState::Starting => "starting",
            ServiceState::Running => "running",
            ServiceState::Pausing => "pausing",
            ServiceState::Paused => "paused",
            ServiceState::Continuing => "continuing",
            ServiceState::Stopping => "stopping",
            ServiceState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Lifecycle signal a host (or console) sends to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceSignal {
    Start,
    Stop,
    Pause,
    Continue,
}

impl fmt::Display for ServiceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceSignal::Start => "start",
            ServiceSignal::Stop => "stop",
            ServiceSignal::Pause => "pause",
            ServiceSignal::Continue => "continue",
        };
        f.write_str(s)
    }
}

/// Outcome of checking a signal against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Perform the transition.
    Apply,
    /// Already there; nothing to do.
    Noop,
}
