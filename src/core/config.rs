//! # Service configuration.
//!
//! Provides [`Config`], the settings shared by the orchestrator and the
//! workers its builder creates.
//!
//! Config is used in two ways:
//! 1. **Worker defaults**: `ServiceBuilder::pooled` / `ServiceBuilder::thread` apply
//!    `poll_interval`, `drain_poll_interval` and `fault_policy` to new workers
//! 2. **Stop behavior**: `ServiceOrchestrator::stop` bounds its drain by `grace`
//!
//! ## Sentinel values
//! - `grace = 0s` → unbounded drain (stop returns only once every worker completed)

use std::time::Duration;

use crate::policies::FaultPolicy;

/// Settings for one controlled service.
///
/// ## Field semantics
/// - `poll_interval`: upper bound on how long a paused loop blocks before re-checking stop
/// - `drain_poll_interval`: sleep between completion checks while draining thread workers
/// - `grace`: optional drain bound (`0s` = unbounded)
/// - `fault_policy`: what a worker loop does after a faulted unit of work
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over sentinel checks.
#[derive(Clone, Debug)]
pub struct Config {
    /// Gate wait bound inside each worker loop.
    ///
    /// A stop request issued while a worker is paused is observed within
    /// one `poll_interval`.
    pub poll_interval: Duration,

    /// Polling period used while waiting on thread-backed workers.
    pub drain_poll_interval: Duration,

    /// Maximum time `stop` waits for workers to complete.
    ///
    /// - `Duration::ZERO` = wait as long as it takes
    /// - `> 0` = `stop` returns `ServiceError::GraceExceeded` once exceeded;
    ///   the service stays `Stopping` and a later `stop` resumes the drain
    pub grace: Duration,

    /// Default fault policy for workers created by the builder.
    pub fault_policy: FaultPolicy,
}

impl Config {
    /// Returns the drain bound as an `Option`.
    ///
    /// - `None` → unbounded drain
    /// - `Some(d)` → drain gives up after `d`
    #[inline]
    pub fn grace_limit(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns the poll interval clamped to a minimum of 1ms.
    #[inline]
    pub fn poll_interval_clamped(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `poll_interval = 100ms`
    /// - `drain_poll_interval = 10ms`
    /// - `grace = 0s` (unbounded drain)
    /// - `fault_policy = FaultPolicy::Exit`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            drain_poll_interval: Duration::from_millis(10),
            grace: Duration::ZERO,
            fault_policy: FaultPolicy::default(),
        }
    }
}
