//! # Run a single iteration of a unit of work.
//!
//! Executes one unit inside the worker boundary: errors **and panics** are
//! caught here, reported as `WorkerFaulted`, and turned into a loop
//! [`Verdict`] by the worker's [`FaultPolicy`].
//!
//! ## Flow
//! ```text
//! Ok(())                → Continue
//! Err(Canceled)         → Continue   (loop re-checks the stop signal next)
//! Err(Fail)             → WorkerFaulted → policy (Exit | Continue)
//! Err(Fatal)            → WorkerFaulted → Exit
//! panic                 → WorkerFaulted → policy (Exit | Continue)
//! ```
//!
//! ## Rules
//! - Nothing raised by a unit escapes this module.
//! - Exactly one `WorkerFaulted` per faulted iteration.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::error::WorkError;
use crate::events::{Event, EventKind};
use crate::gate::{CancelSignal, GateView};
use crate::observers::{ObserverSet, panic_message};
use crate::policies::{FaultPolicy, Verdict};
use crate::work::{BlockingWork, Work, WorkContext};

/// Everything an execution unit's loop needs, cloned into each task/thread.
#[derive(Clone)]
pub(crate) struct LoopEnv {
    pub name: Arc<str>,
    pub gate: GateView,
    pub cancel: CancelSignal,
    pub poll_interval: Duration,
    pub fault_policy: FaultPolicy,
    pub observers: Arc<ObserverSet>,
}

impl LoopEnv {
    pub(crate) fn emit(&self, kind: EventKind) {
        self.observers
            .emit(&Event::new(kind).with_worker(Arc::clone(&self.name)));
    }
}

/// Executes one iteration of an async unit.
pub(crate) async fn run_once_async(work: &dyn Work, ctx: &WorkContext, env: &LoopEnv) -> Verdict {
    let res = AssertUnwindSafe(work.run_once(ctx)).catch_unwind().await;
    settle(res.map_err(|p| panic_message(p.as_ref())), ctx, env)
}

/// Executes one iteration of a blocking unit on the calling thread.
pub(crate) fn run_once_blocking(work: &dyn BlockingWork, ctx: &WorkContext, env: &LoopEnv) -> Verdict {
    let res = catch_unwind(AssertUnwindSafe(|| work.run_once(ctx)));
    settle(res.map_err(|p| panic_message(p.as_ref())), ctx, env)
}

fn settle(res: Result<Result<(), WorkError>, String>, ctx: &WorkContext, env: &LoopEnv) -> Verdict {
    match res {
        Ok(Ok(())) | Ok(Err(WorkError::Canceled)) => Verdict::Continue,
        Ok(Err(err)) => {
            report_fault(env, ctx, err.to_string());
            env.fault_policy.on_error(&err)
        }
        Err(panic) => {
            report_fault(env, ctx, format!("panicked: {panic}"));
            env.fault_policy.on_panic()
        }
    }
}

fn report_fault(env: &LoopEnv, ctx: &WorkContext, reason: String) {
    tracing::warn!(
        worker = %env.name,
        iteration = ctx.iteration(),
        thread = ctx.thread_index(),
        reason = %reason,
        "unit of work faulted"
    );
    env.observers.emit(
        &Event::new(EventKind::WorkerFaulted)
            .with_worker(Arc::clone(&env.name))
            .with_iteration(ctx.iteration())
            .with_reason(reason),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::LifecycleGate;
    use crate::observers::Observe;
    use crate::work::{BlockingWorkFn, WorkFn};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Faults(Mutex<Vec<(Option<u64>, String)>>);

    impl Observe for Faults {
        fn on_event(&self, ev: &Event) {
            if ev.kind == EventKind::WorkerFaulted {
                let reason = ev.reason.as_deref().unwrap_or_default().to_string();
                self.0.lock().push((ev.iteration, reason));
            }
        }
    }

    fn env(policy: FaultPolicy, faults: Arc<Faults>) -> LoopEnv {
        LoopEnv {
            name: Arc::from("unit-test"),
            gate: LifecycleGate::new().view(),
            cancel: CancelSignal::new(),
            poll_interval: Duration::from_millis(10),
            fault_policy: policy,
            observers: Arc::new(ObserverSet::new(vec![faults as Arc<dyn Observe>])),
        }
    }

    fn ctx(env: &LoopEnv) -> WorkContext {
        let mut ctx = WorkContext::new(
            Arc::clone(&env.name),
            Arc::from(Vec::<String>::new()),
            0,
            env.cancel.child_token(),
        );
        ctx.next_iteration();
        ctx
    }

    #[test]
    fn blocking_panic_is_swallowed_and_reported() {
        let faults = Arc::new(Faults::default());
        let env = env(FaultPolicy::Exit, Arc::clone(&faults));
        let unit = BlockingWorkFn::new(|_: &WorkContext| -> Result<(), WorkError> { panic!("kaboom") });

        let verdict = run_once_blocking(&unit, &ctx(&env), &env);

        assert_eq!(verdict, Verdict::Exit);
        let seen = faults.0.lock().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Some(1));
        assert!(seen[0].1.contains("kaboom"));
    }

    #[test]
    fn skip_policy_continues_after_failure() {
        let faults = Arc::new(Faults::default());
        let env = env(FaultPolicy::Skip, Arc::clone(&faults));
        let unit = BlockingWorkFn::new(|_: &WorkContext| Err::<(), _>(WorkError::fail("flaky")));

        assert_eq!(run_once_blocking(&unit, &ctx(&env), &env), Verdict::Continue);
        assert_eq!(faults.0.lock().len(), 1);
    }

    #[tokio::test]
    async fn async_panic_is_swallowed() {
        let faults = Arc::new(Faults::default());
        let env = env(FaultPolicy::Exit, Arc::clone(&faults));
        let unit = WorkFn::new(|_ctx: WorkContext| async move {
            if true {
                panic!("async kaboom");
            }
            Ok::<(), WorkError>(())
        });

        assert_eq!(run_once_async(&unit, &ctx(&env), &env).await, Verdict::Exit);
        assert!(faults.0.lock()[0].1.contains("async kaboom"));
    }

    #[tokio::test]
    async fn canceled_is_not_reported() {
        let faults = Arc::new(Faults::default());
        let env = env(FaultPolicy::Exit, Arc::clone(&faults));
        let unit = WorkFn::new(|_ctx: WorkContext| async move { Err::<(), _>(WorkError::Canceled) });

        assert_eq!(run_once_async(&unit, &ctx(&env), &env).await, Verdict::Continue);
        assert!(faults.0.lock().is_empty());
    }
}
