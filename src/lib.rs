//! # workvisor
//!
//! **Workvisor** controls the lifecycle of a fixed set of long-running
//! background workers: start, stop, pause and continue.
//!
//! Each worker repeats one unit of work on its own execution unit, either an
//! async task on the shared tokio pool or one or more dedicated OS threads.
//! Pausing parks every worker without tearing it down; stopping asks every
//! worker to finish and waits until all of them have.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host (OS signals / service manager / console)
//!        │ Start(args) · Pause · Continue · Stop
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ServiceOrchestrator                                              │
//! │  - state machine (Created → Running ⇄ Paused → Stopped)           │
//! │  - WorkerSet (fixed, ordered, non-empty)                          │
//! │  - ObserverSet (before/after events, in order, synchronous)       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//!   │PooledWorker │   │ThreadWorker │   │ custom      │
//!   │ (tokio task)│   │ (N threads) │   │WorkerRuntime│
//!   └──────┬──────┘   └──────┬──────┘   └─────────────┘
//!          │ gate + cancel   │ gate + cancel
//!          ▼                 ▼
//!     Work::run_once    BlockingWork::run_once   (one iteration, repeated)
//! ```
//!
//! ### Worker loop
//! ```text
//! loop {
//!   ├─► stop requested?                 ─► exit ─► Completed
//!   ├─► gate open within poll_interval?  ─► no: back to the stop check
//!   └─► run one unit of work
//!          ├─ Ok / Canceled   ─► continue
//!          └─ Err / panic     ─► WorkerFaulted ─► FaultPolicy (Exit | Skip)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                           |
//! |-------------------|----------------------------------------------------------------|----------------------------------------------|
//! | **Orchestration** | Start/pause/continue/stop a fixed worker set, drain on stop.   | [`ServiceOrchestrator`], [`ServiceBuilder`]  |
//! | **Workers**       | Pooled-task and dedicated-thread execution models.             | [`WorkerRuntime`], [`PooledWorker`], [`ThreadWorker`] |
//! | **Work**          | Define units of work as functions or trait impls.              | [`Work`], [`WorkFn`], [`BlockingWork`], [`BlockingWorkFn`] |
//! | **Observers**     | Hook into service and worker lifecycle events.                 | [`Observe`], [`Event`]                       |
//! | **Hosting**       | Drive a service from OS signals or an interactive console.    | [`run_hosted`], [`SignalHost`], [`CommandLoop`] |
//! | **Errors**        | Typed errors for the control path and for units of work.       | [`ServiceError`], [`WorkerError`], [`WorkError`] |
//! | **Configuration** | Poll intervals, drain grace, default fault policy.             | [`Config`], [`FaultPolicy`]                  |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] observer (on by default).
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use workvisor::{Config, ServiceOrchestrator, WorkContext, WorkError, WorkFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tick = WorkFn::arc(|ctx: WorkContext| async move {
//!         let _ = ctx.iteration();
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         Ok::<_, WorkError>(())
//!     });
//!
//!     let svc = ServiceOrchestrator::builder(Config::default())
//!         .pooled("ticker", tick)
//!         .build()?;
//!
//!     svc.start(&[]).await?;
//!     svc.pause()?;
//!     svc.resume()?;
//!     svc.stop().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod gate;
mod host;
mod observers;
mod policies;
mod work;
mod workers;

// ---- Public re-exports ----

pub use crate::core::{Config, ServiceBuilder, ServiceOrchestrator, ServiceSignal, ServiceState};
pub use error::{ServiceError, WorkError, WorkerError};
pub use events::{Event, EventKind};
pub use gate::{CancelSignal, GateView, LifecycleGate};
pub use host::{
    Command, CommandLoop, ConflictingModes, HostSignal, RunMode, ServiceHost, SignalHost,
    run_hosted,
};
pub use observers::{Observe, ObserverSet};
pub use policies::FaultPolicy;
pub use work::{BlockingWork, BlockingWorkFn, BlockingWorkRef, Work, WorkContext, WorkFn, WorkRef};
pub use workers::{
    PooledWorker, RuntimeKind, StartContext, ThreadWorker, WorkerId, WorkerRef, WorkerRuntime,
    WorkerSet, WorkerState,
};

// Optional: expose the built-in tracing observer.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
