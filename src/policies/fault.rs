//! # Fault policies for worker loops.
//!
//! [`FaultPolicy`] decides what a worker does after a unit of work returns an
//! error or panics. Either way the fault is swallowed at the worker boundary
//! and reported as `WorkerFaulted`; it never reaches the orchestrator.
//!
//! ```text
//! FaultPolicy::Exit   → fault ends the loop, worker reaches Completed (default)
//! FaultPolicy::Skip   → fault is recorded, loop continues with the next iteration
//! ```
//!
//! [`WorkError::Fatal`](crate::WorkError::Fatal) and panics on `Exit` always end the loop;
//! [`WorkError::Canceled`](crate::WorkError::Canceled) is not a fault.

use crate::error::WorkError;

/// Policy controlling whether a worker keeps looping after a faulted iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Exit the loop on the first fault (default).
    #[default]
    Exit,
    /// Record the fault and keep looping; fatal errors still exit.
    Skip,
}

/// What the loop does after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Keep looping.
    Continue,
    /// Leave the loop; the worker completes.
    Exit,
}

impl FaultPolicy {
    /// Decides the loop's next step for a failed iteration.
    pub(crate) fn on_error(self, err: &WorkError) -> Verdict {
        match (self, err) {
            (_, WorkError::Canceled) => Verdict::Continue,
            (_, WorkError::Fatal { .. }) => Verdict::Exit,
            (FaultPolicy::Exit, _) => Verdict::Exit,
            (FaultPolicy::Skip, _) => Verdict::Continue,
        }
    }

    /// Decides the loop's next step after the unit panicked.
    pub(crate) fn on_panic(self) -> Verdict {
        match self {
            FaultPolicy::Exit => Verdict::Exit,
            FaultPolicy::Skip => Verdict::Continue,
        }
    }
}
