use std::sync::Arc;

use crate::core::{Config, ServiceOrchestrator};
use crate::error::ServiceError;
use crate::observers::{ObserverSet, Observe};
use crate::work::{BlockingWorkRef, WorkRef};
use crate::workers::{PooledWorker, ThreadWorker, WorkerRef, WorkerSet};

/// Builder for a [`ServiceOrchestrator`] and its worker set.
///
/// Workers are broadcast to in the order they are added.
pub struct ServiceBuilder {
    cfg: Config,
    workers: Vec<WorkerRef>,
    observers: Vec<Arc<dyn Observe>>,
}

impl ServiceBuilder {
    /// Creates an empty builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            workers: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Adds a pooled worker repeating `work`, configured from the builder's [`Config`].
    pub fn pooled(mut self, name: impl Into<Arc<str>>, work: WorkRef) -> Self {
        let worker = PooledWorker::new(name, work)
            .with_poll_interval(self.cfg.poll_interval_clamped())
            .with_fault_policy(self.cfg.fault_policy);
        self.workers.push(Arc::new(worker));
        self
    }

    /// Adds a thread worker running `work` on `threads` dedicated threads.
    pub fn thread(mut self, name: impl Into<Arc<str>>, work: BlockingWorkRef, threads: usize) -> Self {
        let worker = ThreadWorker::new(name, work, threads)
            .with_poll_interval(self.cfg.poll_interval_clamped())
            .with_drain_poll_interval(self.cfg.drain_poll_interval)
            .with_fault_policy(self.cfg.fault_policy);
        self.workers.push(Arc::new(worker));
        self
    }

    /// Adds an already-built worker (any [`WorkerRuntime`](crate::WorkerRuntime)).
    pub fn worker(mut self, worker: WorkerRef) -> Self {
        self.workers.push(worker);
        self
    }

    /// Sets lifecycle observers, notified in the given order.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds the orchestrator.
    ///
    /// Fails with [`ServiceError::EmptyWorkerSet`] when no worker was added.
    pub fn build(self) -> Result<ServiceOrchestrator, ServiceError> {
        let workers = WorkerSet::new(self.workers)?;
        tracing::debug!(workers = ?workers.names(), observers = self.observers.len(), "service built");
        Ok(ServiceOrchestrator::new(
            self.cfg,
            workers,
            ObserverSet::new(self.observers),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkError;
    use crate::work::{BlockingWorkFn, WorkContext, WorkFn};
    use crate::workers::RuntimeKind;
    use std::time::Duration;

    #[test]
    fn empty_builder_is_rejected() {
        let err = ServiceBuilder::new(Config::default()).build().err().unwrap();
        assert!(matches!(err, ServiceError::EmptyWorkerSet));
    }

    #[test]
    fn workers_keep_insertion_order_and_kind() {
        let pooled = WorkFn::arc(|_ctx: WorkContext| async { Ok::<_, WorkError>(()) });
        let blocking = BlockingWorkFn::arc(|_: &WorkContext| Ok(()));
        let svc = ServiceBuilder::new(Config {
            poll_interval: Duration::from_millis(5),
            ..Config::default()
        })
        .thread("t", blocking, 2)
        .pooled("p", pooled)
        .build()
        .unwrap();

        let kinds: Vec<_> = svc.workers().iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec![RuntimeKind::Thread, RuntimeKind::Pooled]);
        assert_eq!(svc.workers().names(), vec!["t".to_string(), "p".to_string()]);
    }
}
