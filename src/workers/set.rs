//! # WorkerSet: the fixed, non-empty set of workers a service controls.
//!
//! Broadcast order is registration order for every operation. Start is the
//! only fallible broadcast; it stops at the first worker that fails.
//!
//! ## Drain
//! ```text
//! drain(grace)
//!   ├─► join_all(worker.wait_completed())
//!   ├─► grace = None    → wait as long as it takes
//!   └─► grace = Some(d) → timeout(d); stuck = workers with !has_completed()
//! ```

use std::time::Duration;

use futures::future::join_all;

use crate::error::{ServiceError, WorkerError};
use crate::workers::runtime::{StartContext, WorkerRef};

/// Ordered collection of at least one worker.
pub struct WorkerSet {
    workers: Vec<WorkerRef>,
}

impl WorkerSet {
    /// Builds the set; an empty list is rejected.
    pub fn new(workers: Vec<WorkerRef>) -> Result<Self, ServiceError> {
        if workers.is_empty() {
            return Err(ServiceError::EmptyWorkerSet);
        }
        Ok(Self { workers })
    }

    /// Number of workers in the set.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Always `false` for a built set.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Workers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkerRef> {
        self.workers.iter()
    }

    /// Worker names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.workers.iter().map(|w| w.name().to_string()).collect()
    }

    /// Starts workers in order; returns the first failure with the worker's name.
    pub(crate) fn start_all(&self, ctx: &StartContext) -> Result<(), (String, WorkerError)> {
        for worker in &self.workers {
            worker
                .start(ctx)
                .map_err(|err| (worker.name().to_string(), err))?;
        }
        Ok(())
    }

    pub(crate) fn stop_all(&self) {
        self.workers.iter().for_each(|w| w.stop());
    }

    pub(crate) fn pause_all(&self) {
        self.workers.iter().for_each(|w| w.pause());
    }

    pub(crate) fn resume_all(&self) {
        self.workers.iter().for_each(|w| w.resume());
    }

    /// Waits for every worker to complete.
    ///
    /// With a grace limit, returns the names of the workers still running
    /// once it expires.
    pub(crate) async fn drain(&self, grace: Option<Duration>) -> Result<(), Vec<String>> {
        let all = join_all(self.workers.iter().map(|w| w.wait_completed()));
        let Some(grace) = grace else {
            all.await;
            return Ok(());
        };
        if tokio::time::timeout(grace, all).await.is_ok() {
            return Ok(());
        }
        let stuck: Vec<String> = self
            .workers
            .iter()
            .filter(|w| !w.has_completed())
            .map(|w| w.name().to_string())
            .collect();
        if stuck.is_empty() { Ok(()) } else { Err(stuck) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkError;
    use crate::observers::ObserverSet;
    use crate::work::{WorkContext, WorkFn};
    use crate::workers::PooledWorker;
    use std::sync::Arc;

    fn sleeper(name: &str, per_iteration: Duration) -> WorkerRef {
        let work = WorkFn::arc(move |_ctx: WorkContext| async move {
            tokio::time::sleep(per_iteration).await;
            Ok::<_, WorkError>(())
        });
        Arc::new(PooledWorker::new(name, work).with_poll_interval(Duration::from_millis(5)))
    }

    fn start_ctx() -> StartContext {
        StartContext::new(Arc::from(Vec::<String>::new()), Arc::new(ObserverSet::default()))
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(WorkerSet::new(Vec::new()), Err(ServiceError::EmptyWorkerSet)));
    }

    #[tokio::test]
    async fn names_follow_registration_order() {
        let set = WorkerSet::new(vec![
            sleeper("b", Duration::from_millis(1)),
            sleeper("a", Duration::from_millis(1)),
        ])
        .unwrap();
        assert_eq!(set.names(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn drain_waits_for_the_slowest_worker() {
        let set = WorkerSet::new(vec![
            sleeper("fast", Duration::from_millis(1)),
            sleeper("slow", Duration::from_millis(120)),
        ])
        .unwrap();
        set.start_all(&start_ctx()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        set.stop_all();
        set.drain(None).await.unwrap();
        assert!(set.iter().all(|w| w.has_completed()));
    }

    #[tokio::test]
    async fn drain_reports_stuck_workers_after_grace() {
        let set = WorkerSet::new(vec![
            sleeper("fast", Duration::from_millis(1)),
            sleeper("slow", Duration::from_millis(300)),
        ])
        .unwrap();
        set.start_all(&start_ctx()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        set.stop_all();
        let stuck = set.drain(Some(Duration::from_millis(50))).await.unwrap_err();
        assert_eq!(stuck, vec!["slow".to_string()]);

        set.drain(None).await.unwrap();
    }
}
