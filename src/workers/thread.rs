//! # ThreadWorker: dedicated OS threads running a blocking unit.
//!
//! Each worker owns `N ≥ 1` threads named `{worker}-{index}`. Every thread
//! runs the same loop and shares the worker's gate and stop signal:
//!
//! ```text
//! thread i:
//!   loop {
//!     ├─► stop requested?        → exit
//!     ├─► gate.may_continue()    → closed after poll interval: loop again
//!     └─► run_once_blocking()    → Exit verdict: exit
//!   }
//!   exit → completion.release(1)
//!            └─► last thread out → phase = Completed → WorkerCompleted
//! ```
//!
//! The worker is complete only when **every** thread has left its loop.
//! Completion is a flag, so waiting for it polls at `drain_poll_interval`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::WorkerError;
use crate::events::EventKind;
use crate::gate::{CancelSignal, LifecycleGate};
use crate::policies::{FaultPolicy, Verdict};
use crate::work::{BlockingWorkRef, WorkContext};
use crate::workers::runner::{LoopEnv, run_once_blocking};
use crate::workers::runtime::{RuntimeKind, StartContext, WorkerRuntime};
use crate::workers::state::{Phase, WorkerId, WorkerState};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Counts threads still inside their loop.
struct ThreadCompletion {
    remaining: AtomicUsize,
    phase: Arc<Phase>,
}

impl ThreadCompletion {
    /// Records `n` threads as exited. Returns `true` for the call that released the last one.
    fn release(&self, n: usize) -> bool {
        let prev = self.remaining.fetch_sub(n, Ordering::AcqRel);
        if prev == n {
            self.phase.complete();
            true
        } else {
            false
        }
    }
}

/// Worker whose execution unit is one or more dedicated OS threads.
pub struct ThreadWorker {
    id: WorkerId,
    name: Arc<str>,
    work: BlockingWorkRef,
    threads: usize,
    gate: LifecycleGate,
    cancel: CancelSignal,
    phase: Arc<Phase>,
    completion: Arc<ThreadCompletion>,
    poll_interval: Duration,
    drain_poll_interval: Duration,
    fault_policy: FaultPolicy,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadWorker {
    /// Creates an idle worker that will run `work` on `threads` threads (at least one).
    pub fn new(name: impl Into<Arc<str>>, work: BlockingWorkRef, threads: usize) -> Self {
        let phase = Arc::new(Phase::new());
        Self {
            id: WorkerId::next(),
            name: name.into(),
            work,
            threads: threads.max(1),
            gate: LifecycleGate::new(),
            cancel: CancelSignal::new(),
            completion: Arc::new(ThreadCompletion {
                remaining: AtomicUsize::new(0),
                phase: Arc::clone(&phase),
            }),
            phase,
            poll_interval: DEFAULT_POLL_INTERVAL,
            drain_poll_interval: DEFAULT_DRAIN_POLL_INTERVAL,
            fault_policy: FaultPolicy::default(),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// How long a paused thread blocks on the gate before re-checking for stop.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// How often `wait_completed` re-checks the completion flag.
    #[must_use]
    pub fn with_drain_poll_interval(mut self, interval: Duration) -> Self {
        self.drain_poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// What each thread does after a faulted iteration.
    #[must_use]
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Number of threads this worker runs.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Stops the threads already spawned and releases the slots of the
    /// `threads - spawned` that never will be.
    fn abandon_unspawned(&self, spawned: usize, env: &LoopEnv) {
        self.cancel.request_stop();
        self.phase.request_stop();
        if self.completion.release(self.threads - spawned) {
            env.emit(EventKind::WorkerCompleted);
        }
    }
}

#[async_trait]
impl WorkerRuntime for ThreadWorker {
    fn id(&self) -> WorkerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Thread
    }

    fn start(&self, ctx: &StartContext) -> Result<(), WorkerError> {
        if !self.phase.activate() {
            if self.phase.is_completed() {
                return Err(WorkerError::AlreadyCompleted);
            }
            return Ok(());
        }

        let env = LoopEnv {
            name: Arc::clone(&self.name),
            gate: self.gate.view(),
            cancel: self.cancel.clone(),
            poll_interval: self.poll_interval,
            fault_policy: self.fault_policy,
            observers: Arc::clone(ctx.observers()),
        };
        self.completion.remaining.store(self.threads, Ordering::Release);
        env.emit(EventKind::WorkerStarted);
        tracing::debug!(worker = %self.name, id = %self.id, threads = self.threads, "thread worker started");

        let mut handles = self.handles.lock();
        for index in 0..self.threads {
            let work_ctx = WorkContext::new(
                Arc::clone(&self.name),
                Arc::clone(ctx.args()),
                index,
                self.cancel.child_token(),
            );
            let work = Arc::clone(&self.work);
            let thread_env = env.clone();
            let completion = Arc::clone(&self.completion);

            let spawned = thread::Builder::new()
                .name(format!("{}-{index}", self.name))
                .spawn(move || thread_loop(work, work_ctx, thread_env, completion));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    tracing::error!(worker = %self.name, index, error = %source, "failed to spawn worker thread");
                    self.abandon_unspawned(index, &env);
                    return Err(WorkerError::Spawn { source });
                }
            }
        }
        Ok(())
    }

    fn stop(&self) {
        self.phase.request_stop();
        self.cancel.request_stop();
    }

    fn pause(&self) {
        self.gate.pause();
    }

    fn resume(&self) {
        self.gate.resume();
    }

    fn state(&self) -> WorkerState {
        self.phase.state(self.gate.is_open())
    }

    fn has_completed(&self) -> bool {
        self.phase.is_completed()
    }

    async fn wait_completed(&self) {
        while !self.phase.is_completed() && !self.phase.is_idle() {
            tokio::time::sleep(self.drain_poll_interval).await;
        }
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.cancel.request_stop();
        if !self.phase.is_completed() {
            return;
        }
        for handle in self.handles.get_mut().drain(..) {
            if handle.join().is_err() {
                tracing::warn!(worker = %self.name, "worker thread ended with a panic");
            }
        }
    }
}

fn thread_loop(
    work: BlockingWorkRef,
    mut ctx: WorkContext,
    env: LoopEnv,
    completion: Arc<ThreadCompletion>,
) {
    let _exit = ThreadExit {
        completion,
        env: env.clone(),
    };
    loop {
        if env.cancel.is_stop_requested() {
            break;
        }
        if !env.gate.may_continue(env.poll_interval) {
            continue;
        }
        if env.cancel.is_stop_requested() {
            break;
        }
        ctx.next_iteration();
        if run_once_blocking(work.as_ref(), &ctx, &env) == Verdict::Exit {
            break;
        }
    }
}

/// Releases the thread's completion slot however the loop is left.
struct ThreadExit {
    completion: Arc<ThreadCompletion>,
    env: LoopEnv,
}

impl Drop for ThreadExit {
    fn drop(&mut self) {
        if self.completion.release(1) {
            tracing::debug!(worker = %self.env.name, "thread worker completed");
            self.env.emit(EventKind::WorkerCompleted);
        }
    }
}
