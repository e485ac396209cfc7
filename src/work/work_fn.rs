//! # Function-backed units (`WorkFn`, `BlockingWorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(WorkContext) -> Fut`, producing a fresh
//! future per iteration. [`BlockingWorkFn`] wraps a plain `Fn(&WorkContext)`.
//!
//! No state is carried between iterations; if the unit needs shared state,
//! capture an `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use workvisor::{BlockingWorkFn, WorkContext, WorkError, WorkFn};
//!
//! let ticks = Arc::new(AtomicU64::new(0));
//! let counter = Arc::clone(&ticks);
//! let _pooled = WorkFn::arc(move |_ctx: WorkContext| {
//!     let counter = Arc::clone(&counter);
//!     async move {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!         Ok::<_, WorkError>(())
//!     }
//! });
//!
//! let _blocking = BlockingWorkFn::arc(|ctx: &WorkContext| {
//!     std::thread::sleep(std::time::Duration::from_millis(1));
//!     let _ = ctx.iteration();
//!     Ok(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkError;
use crate::work::unit::{BlockingWork, Work, WorkContext};

/// Function-backed async unit.
#[derive(Debug)]
pub struct WorkFn<F> {
    f: F,
}

impl<F, Fut> WorkFn<F>
where
    F: Fn(WorkContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    /// Creates a new function-backed unit.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the unit and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(WorkContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    async fn run_once(&self, ctx: &WorkContext) -> Result<(), WorkError> {
        (self.f)(ctx.clone()).await
    }
}

/// Function-backed blocking unit.
#[derive(Debug)]
pub struct BlockingWorkFn<F> {
    f: F,
}

impl<F> BlockingWorkFn<F>
where
    F: Fn(&WorkContext) -> Result<(), WorkError> + Send + Sync + 'static,
{
    /// Creates a new function-backed unit.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the unit and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> BlockingWork for BlockingWorkFn<F>
where
    F: Fn(&WorkContext) -> Result<(), WorkError> + Send + Sync + 'static,
{
    fn run_once(&self, ctx: &WorkContext) -> Result<(), WorkError> {
        (self.f)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn ctx() -> WorkContext {
        WorkContext::new(
            Arc::from("unit"),
            Arc::from(vec!["--flag".to_string()]),
            0,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn work_fn_sees_context() {
        let unit = WorkFn::new(|ctx: WorkContext| async move {
            assert_eq!(ctx.worker(), "unit");
            assert_eq!(ctx.args(), ["--flag".to_string()]);
            Err::<(), _>(WorkError::fail("nope"))
        });
        let err = unit.run_once(&ctx()).await.unwrap_err();
        assert_eq!(err.as_label(), "work_failed");
    }

    #[test]
    fn blocking_fn_runs_inline() {
        let unit = BlockingWorkFn::new(|ctx: &WorkContext| {
            assert_eq!(ctx.thread_index(), 0);
            Ok(())
        });
        assert!(unit.run_once(&ctx()).is_ok());
    }
}
