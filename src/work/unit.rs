//! # Units of work.
//!
//! A worker repeats exactly one unit of work. Two flavours exist, one per
//! execution model:
//! - [`Work`]: async unit, driven by a [`PooledWorker`](crate::PooledWorker) on the tokio pool;
//! - [`BlockingWork`]: synchronous unit, driven by a [`ThreadWorker`](crate::ThreadWorker) on its own threads.
//!
//! Each call performs **one** iteration and returns. Looping, pausing and
//! stopping are the worker's job, not the unit's. Units must finish in bounded
//! time: cancellation is cooperative, so a unit that never returns blocks the drain.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkError;

/// Per-iteration context passed to a unit of work.
#[derive(Clone, Debug)]
pub struct WorkContext {
    worker: Arc<str>,
    args: Arc<[String]>,
    iteration: u64,
    thread_index: usize,
    cancel: CancellationToken,
}

impl WorkContext {
    pub(crate) fn new(
        worker: Arc<str>,
        args: Arc<[String]>,
        thread_index: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            worker,
            args,
            iteration: 0,
            thread_index,
            cancel,
        }
    }

    /// Advances the iteration counter (1-based for the first unit).
    pub(crate) fn next_iteration(&mut self) {
        self.iteration += 1;
    }

    /// Name of the worker running this unit.
    pub fn worker(&self) -> &str {
        &self.worker
    }

    /// Arguments passed to the service's `start`.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of the current iteration, starting at 1.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Index of the thread running this unit (always 0 for pooled workers).
    pub fn thread_index(&self) -> usize {
        self.thread_index
    }

    /// Cancelled once the worker has been asked to stop.
    ///
    /// Long units may watch it to bail out early with [`WorkError::Canceled`].
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the worker has been asked to stop.
    pub fn is_stop_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// # Async unit of work for pooled workers.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use workvisor::{Work, WorkContext, WorkError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Work for Heartbeat {
///     async fn run_once(&self, ctx: &WorkContext) -> Result<(), WorkError> {
///         if ctx.is_stop_requested() {
///             return Err(WorkError::Canceled);
///         }
///         // emit heartbeat...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Performs one iteration.
    async fn run_once(&self, ctx: &WorkContext) -> Result<(), WorkError>;
}

/// # Blocking unit of work for dedicated-thread workers.
///
/// Runs on a thread owned by the worker, so it may block freely (within bounded time).
pub trait BlockingWork: Send + Sync + 'static {
    /// Performs one iteration.
    fn run_once(&self, ctx: &WorkContext) -> Result<(), WorkError>;
}

/// Shared handle to an async unit.
pub type WorkRef = Arc<dyn Work>;

/// Shared handle to a blocking unit.
pub type BlockingWorkRef = Arc<dyn BlockingWork>;
