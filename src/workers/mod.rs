//! # Workers and their execution models.
//!
//! A worker owns one execution unit that repeats a unit of work until it is
//! stopped or its fault policy says otherwise.
//!
//! - [`WorkerRuntime`] - uniform lifecycle surface the orchestrator drives
//! - [`PooledWorker`] - async task on the shared tokio pool
//! - [`ThreadWorker`] - `N` dedicated OS threads
//! - [`WorkerSet`] - the fixed, ordered set of workers one service controls

mod pooled;
mod runner;
mod runtime;
mod set;
mod state;
mod thread;

pub use pooled::PooledWorker;
pub use runtime::{RuntimeKind, StartContext, WorkerRef, WorkerRuntime};
pub use set::WorkerSet;
pub use state::{WorkerId, WorkerState};
pub use thread::ThreadWorker;
