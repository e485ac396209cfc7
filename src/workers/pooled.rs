//! # PooledWorker: one async task on the shared tokio pool.
//!
//! The execution unit is a single spawned task that loops over the unit of work:
//!
//! ```text
//! loop {
//!   ├─► stop requested?            → exit
//!   ├─► gate.may_continue_async()  → closed: re-check stop, wait again
//!   ├─► run_once_async()           → Exit verdict: exit
//!   └─► next iteration
//! }
//! exit → phase = Completed → WorkerCompleted
//! ```
//!
//! Completion is awaited through the task's join handle, shared so that
//! several waiters (drain, tests) can await it concurrently.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::runtime::Handle;

use crate::error::WorkerError;
use crate::events::EventKind;
use crate::gate::{CancelSignal, LifecycleGate};
use crate::policies::{FaultPolicy, Verdict};
use crate::work::{WorkContext, WorkRef};
use crate::workers::runner::{LoopEnv, run_once_async};
use crate::workers::runtime::{RuntimeKind, StartContext, WorkerRuntime};
use crate::workers::state::{Phase, WorkerId, WorkerState};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

type Completion = Shared<BoxFuture<'static, ()>>;

/// Worker whose execution unit is an async task on the tokio pool.
pub struct PooledWorker {
    id: WorkerId,
    name: Arc<str>,
    work: WorkRef,
    gate: LifecycleGate,
    cancel: CancelSignal,
    phase: Arc<Phase>,
    poll_interval: Duration,
    fault_policy: FaultPolicy,
    handle: Option<Handle>,
    task: OnceLock<Completion>,
}

impl PooledWorker {
    /// Creates an idle worker repeating `work`.
    pub fn new(name: impl Into<Arc<str>>, work: WorkRef) -> Self {
        Self {
            id: WorkerId::next(),
            name: name.into(),
            work,
            gate: LifecycleGate::new(),
            cancel: CancelSignal::new(),
            phase: Arc::new(Phase::new()),
            poll_interval: DEFAULT_POLL_INTERVAL,
            fault_policy: FaultPolicy::default(),
            handle: None,
            task: OnceLock::new(),
        }
    }

    /// How long a paused loop waits on the gate before re-checking for stop.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// What the loop does after a faulted iteration.
    #[must_use]
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Schedules the task on `handle` instead of the runtime `start` is called from.
    #[must_use]
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }
}

#[async_trait]
impl WorkerRuntime for PooledWorker {
    fn id(&self) -> WorkerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Pooled
    }

    fn start(&self, ctx: &StartContext) -> Result<(), WorkerError> {
        if !self.phase.activate() {
            if self.phase.is_completed() {
                return Err(WorkerError::AlreadyCompleted);
            }
            return Ok(());
        }
        let runtime = match self.handle.clone().map_or_else(Handle::try_current, Ok) {
            Ok(handle) => handle,
            Err(_) => {
                self.phase.deactivate();
                return Err(WorkerError::NoRuntime);
            }
        };

        let env = LoopEnv {
            name: Arc::clone(&self.name),
            gate: self.gate.view(),
            cancel: self.cancel.clone(),
            poll_interval: self.poll_interval,
            fault_policy: self.fault_policy,
            observers: Arc::clone(ctx.observers()),
        };
        let work_ctx = WorkContext::new(
            Arc::clone(&self.name),
            Arc::clone(ctx.args()),
            0,
            self.cancel.child_token(),
        );

        env.emit(EventKind::WorkerStarted);
        tracing::debug!(worker = %self.name, id = %self.id, "pooled worker started");

        let name = Arc::clone(&self.name);
        let join = runtime.spawn(pooled_loop(
            Arc::clone(&self.work),
            work_ctx,
            env,
            Arc::clone(&self.phase),
        ));
        let completion = join
            .map(move |res| {
                if let Err(e) = res {
                    tracing::error!(worker = %name, error = %e, "pooled worker task aborted");
                }
            })
            .boxed()
            .shared();
        let _ = self.task.set(completion);
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
        if let Some(task) = self.task.get() {
            task.clone().await;
        }
    }
}

impl Drop for PooledWorker {
    fn drop(&mut self) {
        self.cancel.request_stop();
    }
}

async fn pooled_loop(work: WorkRef, mut ctx: WorkContext, env: LoopEnv, phase: Arc<Phase>) {
    let _exit = LoopExit {
        phase,
        env: env.clone(),
    };
    loop {
        if env.cancel.is_stop_requested() {
            break;
        }
        let open = tokio::select! {
            biased;
            _ = env.cancel.stopped() => false,
            open = env.gate.may_continue_async(env.poll_interval) => open,
        };
        if !open {
            continue;
        }
        ctx.next_iteration();
        if run_once_async(work.as_ref(), &ctx, &env).await == Verdict::Exit {
            break;
        }
    }
}

/// Marks the worker completed however the loop is left.
struct LoopExit {
    phase: Arc<Phase>,
    env: LoopEnv,
}

impl Drop for LoopExit {
    fn drop(&mut self) {
        self.phase.complete();
        tracing::debug!(worker = %self.env.name, "pooled worker completed");
        self.env.emit(EventKind::WorkerCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkError;
    use crate::observers::ObserverSet;
    use crate::work::WorkFn;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn start_ctx() -> StartContext {
        StartContext::new(Arc::from(vec!["a".to_string()]), Arc::new(ObserverSet::default()))
    }

    fn counting(ticks: &Arc<AtomicU64>) -> PooledWorker {
        let counter = Arc::clone(ticks);
        let work = WorkFn::arc(move |_ctx: WorkContext| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok::<_, WorkError>(())
            }
        });
        PooledWorker::new("pooled-test", work).with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn runs_until_stopped() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        assert_eq!(worker.state(), WorkerState::Idle);

        worker.start(&start_ctx()).unwrap();
        assert_eq!(worker.state(), WorkerState::Running);
        tokio::time::sleep(Duration::from_millis(50)).await;

        worker.stop();
        worker.wait_completed().await;
        assert!(worker.has_completed());
        assert_eq!(worker.state(), WorkerState::Completed);
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn paused_worker_does_no_work() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        worker.start(&start_ctx()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        worker.pause();
        assert_eq!(worker.state(), WorkerState::Paused);
        // let an in-flight iteration finish
        tokio::time::sleep(Duration::from_millis(20)).await;
        let frozen = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), frozen);

        worker.resume();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(ticks.load(Ordering::SeqCst) > frozen);

        worker.stop();
        worker.wait_completed().await;
    }

    #[tokio::test]
    async fn stop_while_paused_completes() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        worker.pause();
        worker.start(&start_ctx()).unwrap();
        assert_eq!(worker.state(), WorkerState::Paused);

        worker.stop();
        worker.wait_completed().await;
        assert!(worker.has_completed());
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stop_before_start_completes_without_running() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        worker.stop();
        assert!(worker.has_completed());
        worker.wait_completed().await;
        assert!(matches!(
            worker.start(&start_ctx()),
            Err(WorkerError::AlreadyCompleted)
        ));
    }

    #[tokio::test]
    async fn second_start_is_noop() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        worker.start(&start_ctx()).unwrap();
        worker.start(&start_ctx()).unwrap();
        worker.stop();
        worker.wait_completed().await;
    }

    #[tokio::test]
    async fn faulted_unit_completes_worker_on_exit_policy() {
        let work = WorkFn::arc(|_ctx: WorkContext| async { Err::<(), _>(WorkError::fail("boom")) });
        let worker = PooledWorker::new("faulty", work);
        worker.start(&start_ctx()).unwrap();
        worker.wait_completed().await;
        assert!(worker.has_completed());
    }

    #[test]
    fn start_outside_runtime_fails() {
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks);
        assert!(matches!(worker.start(&start_ctx()), Err(WorkerError::NoRuntime)));
        assert_eq!(worker.state(), WorkerState::Idle);
    }

    #[test]
    fn explicit_handle_schedules_without_ambient_runtime() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let ticks = Arc::new(AtomicU64::new(0));
        let worker = counting(&ticks).with_handle(rt.handle().clone());

        worker.start(&start_ctx()).unwrap();
        assert_eq!(worker.state(), WorkerState::Running);
        std::thread::sleep(Duration::from_millis(40));

        worker.stop();
        rt.block_on(worker.wait_completed());
        assert!(worker.has_completed());
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
