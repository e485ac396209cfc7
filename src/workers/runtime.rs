//! # WorkerRuntime: the uniform worker surface.
//!
//! The orchestrator only ever sees `Arc<dyn WorkerRuntime>`. Each runtime
//! variant decides how its own completion is awaited:
//! - [`PooledWorker`](crate::PooledWorker): awaits the scheduler's join handle;
//! - [`ThreadWorker`](crate::ThreadWorker): polls its completion flag.
//!
//! ## Rules
//! - `start` schedules the execution unit **at most once**; later calls are no-ops.
//! - `stop` only requests cancellation; it never waits.
//! - `pause`/`resume` only toggle the gate; they never touch cancellation.
//! - `wait_completed` returns only once the execution unit has exited
//!   (or immediately if the worker was stopped before it ever started).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::observers::ObserverSet;
use crate::workers::state::{WorkerId, WorkerState};

/// Which execution model a worker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Async task on the shared tokio pool.
    Pooled,
    /// One or more OS threads owned by the worker.
    Thread,
}

/// What a worker receives when it is started.
#[derive(Clone)]
pub struct StartContext {
    args: Arc<[String]>,
    observers: Arc<ObserverSet>,
}

impl StartContext {
    /// Bundles start arguments with the observers workers report to.
    pub fn new(args: Arc<[String]>, observers: Arc<ObserverSet>) -> Self {
        Self { args, observers }
    }

    /// Start arguments, shared by every worker.
    pub fn args(&self) -> &Arc<[String]> {
        &self.args
    }

    /// Observers for worker events.
    pub fn observers(&self) -> &Arc<ObserverSet> {
        &self.observers
    }
}

/// Uniform lifecycle surface of a worker, regardless of execution model.
#[async_trait]
pub trait WorkerRuntime: Send + Sync + 'static {
    /// Opaque identity.
    fn id(&self) -> WorkerId;

    /// Human-readable name (for logs and events).
    fn name(&self) -> &str;

    /// Execution model.
    fn kind(&self) -> RuntimeKind;

    /// Schedules the execution unit (Idle → Running). No-op once scheduled.
    fn start(&self, ctx: &StartContext) -> Result<(), WorkerError>;

    /// Requests cooperative cancellation. Does not wait.
    fn stop(&self);

    /// Closes the gate.
    fn pause(&self);

    /// Opens the gate.
    fn resume(&self);

    /// Current state.
    fn state(&self) -> WorkerState;

    /// Non-blocking completion check.
    fn has_completed(&self) -> bool;

    /// Waits until the execution unit has exited.
    async fn wait_completed(&self);
}

/// Shared handle to a worker.
pub type WorkerRef = Arc<dyn WorkerRuntime>;
