//! # Host collaborator: feeds lifecycle signals into the orchestrator.
//!
//! A host (service manager, OS signals, a test script) yields [`HostSignal`]s;
//! [`run_hosted`] applies them to a [`ServiceOrchestrator`] until the service
//! has stopped.
//!
//! ```text
//! host.next_signal() ─► Start(args) ─► orchestrator.start(args) ─► host.report_start(&result)
//!                    ─► Pause       ─► orchestrator.pause()
//!                    ─► Continue    ─► orchestrator.resume()
//!                    ─► Stop        ─► orchestrator.stop()  (drain) ─► return
//!                    ─► None        ─► orchestrator.stop()  (drain) ─► return
//! ```
//!
//! Rejected signals are logged and the loop keeps going. A start that
//! failed inside a worker is reported to the host and ends the loop; the
//! orchestrator has already stopped the workers by then.

use async_trait::async_trait;

use crate::core::ServiceOrchestrator;
use crate::error::ServiceError;

/// Lifecycle request coming from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    /// Start all workers with these arguments.
    Start(Vec<String>),
    Stop,
    Pause,
    Continue,
}

/// Source of lifecycle signals, plus a way to report whether start was accepted.
#[async_trait]
pub trait ServiceHost: Send {
    /// Waits for the next signal. `None` means the host went away.
    async fn next_signal(&mut self) -> Option<HostSignal>;

    /// Reports the outcome of a start request back to the host.
    fn report_start(&mut self, outcome: &Result<(), ServiceError>) {
        match outcome {
            Ok(()) => tracing::info!("start accepted"),
            Err(e) => tracing::error!(error = %e, label = e.as_label(), "start rejected"),
        }
    }
}

/// Drives `svc` from `host` until the service has stopped.
///
/// Returns the start failure, or the outcome of the final drain.
pub async fn run_hosted<H>(svc: &ServiceOrchestrator, host: &mut H) -> Result<(), ServiceError>
where
    H: ServiceHost + ?Sized,
{
    while let Some(signal) = host.next_signal().await {
        tracing::debug!(signal = ?signal, state = %svc.state(), "host signal");
        match signal {
            HostSignal::Start(args) => {
                let outcome = svc.start(&args).await;
                host.report_start(&outcome);
                match outcome {
                    Err(e @ ServiceError::StartFailed { .. }) => return Err(e),
                    Err(e) => tracing::warn!(error = %e, "start rejected"),
                    Ok(()) => {}
                }
            }
            HostSignal::Pause => {
                if let Err(e) = svc.pause() {
                    tracing::warn!(error = %e, "pause rejected");
                }
            }
            HostSignal::Continue => {
                if let Err(e) = svc.resume() {
                    tracing::warn!(error = %e, "continue rejected");
                }
            }
            HostSignal::Stop => return svc.stop().await,
        }
    }
    tracing::info!("host closed; stopping service");
    svc.stop().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ServiceState};
    use crate::error::WorkError;
    use crate::work::{WorkContext, WorkFn};
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct Scripted {
        signals: VecDeque<HostSignal>,
        starts: Vec<bool>,
    }

    #[async_trait]
    impl ServiceHost for Scripted {
        async fn next_signal(&mut self) -> Option<HostSignal> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.signals.pop_front()
        }

        fn report_start(&mut self, outcome: &Result<(), ServiceError>) {
            self.starts.push(outcome.is_ok());
        }
    }

    fn service(ticks: &Arc<AtomicU64>) -> ServiceOrchestrator {
        let counter = Arc::clone(ticks);
        let work = WorkFn::arc(move |ctx: WorkContext| {
            let counter = Arc::clone(&counter);
            async move {
                assert_eq!(ctx.args(), ["--fast".to_string()]);
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
                Ok::<_, WorkError>(())
            }
        });
        ServiceOrchestrator::builder(Config {
            poll_interval: Duration::from_millis(5),
            ..Config::default()
        })
        .pooled("hosted", work)
        .build()
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn script_runs_to_stop() {
        let ticks = Arc::new(AtomicU64::new(0));
        let svc = service(&ticks);
        let mut host = Scripted {
            signals: VecDeque::from(vec![
                HostSignal::Start(vec!["--fast".into()]),
                HostSignal::Pause,
                HostSignal::Pause,
                HostSignal::Continue,
                HostSignal::Stop,
            ]),
            starts: Vec::new(),
        };

        run_hosted(&svc, &mut host).await.unwrap();

        assert_eq!(host.starts, vec![true]);
        assert_eq!(svc.state(), ServiceState::Stopped);
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn host_going_away_still_drains() {
        let ticks = Arc::new(AtomicU64::new(0));
        let svc = service(&ticks);
        let mut host = Scripted {
            signals: VecDeque::from(vec![HostSignal::Start(vec!["--fast".into()])]),
            starts: Vec::new(),
        };

        run_hosted(&svc, &mut host).await.unwrap();

        assert_eq!(svc.state(), ServiceState::Stopped);
        assert!(svc.workers().iter().all(|w| w.has_completed()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_signals_do_not_end_the_loop() {
        let ticks = Arc::new(AtomicU64::new(0));
        let svc = service(&ticks);
        let mut host = Scripted {
            signals: VecDeque::from(vec![
                HostSignal::Continue,
                HostSignal::Start(vec!["--fast".into()]),
                HostSignal::Stop,
            ]),
            starts: Vec::new(),
        };

        run_hosted(&svc, &mut host).await.unwrap();
        assert_eq!(host.starts, vec![true]);
        assert_eq!(svc.state(), ServiceState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_start_is_reported_and_the_loop_goes_on() {
        let ticks = Arc::new(AtomicU64::new(0));
        let svc = service(&ticks);
        let mut host = Scripted {
            signals: VecDeque::from(vec![
                HostSignal::Start(vec!["--fast".into()]),
                HostSignal::Start(vec!["--fast".into()]),
                HostSignal::Stop,
            ]),
            starts: Vec::new(),
        };

        run_hosted(&svc, &mut host).await.unwrap();

        assert_eq!(host.starts, vec![true, false]);
        assert_eq!(svc.state(), ServiceState::Stopped);
        assert!(svc.workers().iter().all(|w| w.has_completed()));
    }
}
