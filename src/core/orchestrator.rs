//! # ServiceOrchestrator: fan lifecycle signals out to a fixed worker set.
//!
//! The orchestrator owns a non-empty [`WorkerSet`] and translates the four
//! host signals into broadcasts over it, in registration order. Every
//! transition is bracketed by a before/after event pair delivered to the
//! observers.
//!
//! ## Signal flow
//! ```text
//! start(args) ─► ServiceStarting ─► worker.start() × N ─► ServiceStarted
//!                                        └─(first failure)─► StartFailed ─► stop + drain
//!                                                                   └─(grace exceeded)─► GraceExceeded
//! pause()     ─► ServicePausing    ─► worker.pause()  × N ─► ServicePaused
//! resume()    ─► ServiceContinuing ─► worker.resume() × N ─► ServiceContinued
//! stop()      ─► ServiceStopping   ─► worker.stop()   × N ─► drain ─► ServiceStopped
//!                                                               └─(grace exceeded)─► GraceExceeded
//! ```
//!
//! ## Rules
//! - `stop` never returns `Ok` before every worker has completed.
//! - `pause`/`resume` are fire-and-forget: they return once every gate is toggled.
//! - Signals that make no sense in the current state return
//!   [`ServiceError::InvalidTransition`]; repeated pause/continue/stop are no-ops.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::builder::ServiceBuilder;
use crate::core::config::Config;
use crate::core::state::{ServiceSignal, ServiceState, Step};
use crate::error::ServiceError;
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::workers::{StartContext, WorkerSet};

/// Controls the lifecycle of a fixed set of workers.
///
/// Created through [`ServiceOrchestrator::builder`]; shared by reference
/// (or `Arc`) between the host and any console loop.
pub struct ServiceOrchestrator {
    cfg: Config,
    workers: WorkerSet,
    observers: Arc<ObserverSet>,
    state: Mutex<ServiceState>,
}

impl ServiceOrchestrator {
    /// Starts building a service with the given configuration.
    pub fn builder(cfg: Config) -> ServiceBuilder {
        ServiceBuilder::new(cfg)
    }

    pub(crate) fn new(cfg: Config, workers: WorkerSet, observers: ObserverSet) -> Self {
        Self {
            cfg,
            workers,
            observers: Arc::new(observers),
            state: Mutex::new(ServiceState::Created),
        }
    }

    /// Current service state.
    pub fn state(&self) -> ServiceState {
        *self.state.lock()
    }

    /// The controlled workers, in broadcast order.
    pub fn workers(&self) -> &WorkerSet {
        &self.workers
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Starts every worker with `args`.
    ///
    /// If a worker fails to start, the already-started ones are stopped and
    /// drained, the service ends `Stopped`, and the failure is returned. When
    /// the drain outlives the grace the service stays `Stopping` and a later
    /// [`stop`](Self::stop) finishes it.
    pub async fn start(&self, args: &[String]) -> Result<(), ServiceError> {
        if self.enter(ServiceSignal::Start, ServiceState::Starting)? == Step::Noop {
            return Ok(());
        }
        let args: Arc<[String]> = Arc::from(args.to_vec());
        tracing::debug!(workers = self.workers.len(), args = ?args, "service starting");
        self.emit(Event::new(EventKind::ServiceStarting).with_args(Arc::clone(&args)));

        let ctx = StartContext::new(Arc::clone(&args), Arc::clone(&self.observers));
        if let Err((worker, source)) = self.workers.start_all(&ctx) {
            tracing::error!(worker = %worker, error = %source, "worker failed to start");
            self.emit(
                Event::new(EventKind::StartFailed)
                    .with_worker(worker.as_str())
                    .with_reason(source.to_string()),
            );
            self.set(ServiceState::Stopping);
            self.workers.stop_all();
            match self.workers.drain(self.cfg.grace_limit()).await {
                Ok(()) => self.set(ServiceState::Stopped),
                Err(stuck) => self.report_grace_exceeded(&stuck),
            }
            return Err(ServiceError::StartFailed { worker, source });
        }

        self.set(ServiceState::Running);
        tracing::debug!("service started");
        self.emit(Event::new(EventKind::ServiceStarted).with_args(args));
        Ok(())
    }

    /// Closes every worker's gate. No-op when already paused.
    pub fn pause(&self) -> Result<(), ServiceError> {
        if self.enter(ServiceSignal::Pause, ServiceState::Pausing)? == Step::Noop {
            return Ok(());
        }
        self.emit(Event::new(EventKind::ServicePausing));
        self.workers.pause_all();
        self.set(ServiceState::Paused);
        tracing::debug!("service paused");
        self.emit(Event::new(EventKind::ServicePaused));
        Ok(())
    }

    /// Reopens every worker's gate. No-op when already running.
    pub fn resume(&self) -> Result<(), ServiceError> {
        if self.enter(ServiceSignal::Continue, ServiceState::Continuing)? == Step::Noop {
            return Ok(());
        }
        self.emit(Event::new(EventKind::ServiceContinuing));
        self.workers.resume_all();
        self.set(ServiceState::Running);
        tracing::debug!("service continued");
        self.emit(Event::new(EventKind::ServiceContinued));
        Ok(())
    }

    /// Stops every worker and waits for all of them to complete.
    ///
    /// With a configured grace the wait is bounded: once exceeded this returns
    /// [`ServiceError::GraceExceeded`] and the service stays `Stopping`; calling
    /// `stop` again resumes the drain.
    pub async fn stop(&self) -> Result<(), ServiceError> {
        if self.enter(ServiceSignal::Stop, ServiceState::Stopping)? == Step::Noop {
            return Ok(());
        }
        tracing::debug!("service stopping");
        self.emit(Event::new(EventKind::ServiceStopping));
        self.workers.stop_all();

        if let Err(stuck) = self.workers.drain(self.cfg.grace_limit()).await {
            self.report_grace_exceeded(&stuck);
            return Err(ServiceError::GraceExceeded {
                grace: self.cfg.grace,
                stuck,
            });
        }

        let first = {
            let mut state = self.state.lock();
            let first = *state != ServiceState::Stopped;
            *state = ServiceState::Stopped;
            first
        };
        if first {
            tracing::debug!("service stopped");
            self.emit(Event::new(EventKind::ServiceStopped));
        }
        Ok(())
    }

    /// Checks `signal` against the current state and, if it applies, moves to `transient`.
    fn enter(&self, signal: ServiceSignal, transient: ServiceState) -> Result<Step, ServiceError> {
        let mut state = self.state.lock();
        let step = state.accept(signal).inspect_err(|err| {
            tracing::debug!(error = %err, "signal rejected");
        })?;
        if step == Step::Apply {
            *state = transient;
        }
        Ok(step)
    }

    fn report_grace_exceeded(&self, stuck: &[String]) {
        tracing::warn!(grace = ?self.cfg.grace, stuck = ?stuck, "drain grace exceeded");
        self.emit(
            Event::new(EventKind::GraceExceeded)
                .with_timeout(self.cfg.grace)
                .with_reason(stuck.join(", ")),
        );
    }

    fn set(&self, to: ServiceState) {
        *self.state.lock() = to;
    }

    fn emit(&self, event: Event) {
        self.observers.emit(&event);
    }
}
