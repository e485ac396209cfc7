//! # OS signal host.
//!
//! [`SignalHost`] turns process signals into [`HostSignal`]s. Its first signal
//! is always `Start(args)`, so a plain process behaves like a service that was
//! started by its manager.
//!
//! ## Unix
//! - **SIGINT**, **SIGTERM**, **SIGQUIT** → `Stop`
//! - **SIGUSR1** → `Pause`
//! - **SIGUSR2** → `Continue`
//!
//! Additionally, [`tokio::signal::ctrl_c`] is awaited as a fallback `Stop`.
//!
//! ## Windows
//! On non-Unix platforms only [`tokio::signal::ctrl_c`] is awaited (→ `Stop`).

use async_trait::async_trait;

use super::collaborator::{HostSignal, ServiceHost};

/// Host driven by OS signals.
pub struct SignalHost {
    args: Option<Vec<String>>,
    #[cfg(unix)]
    listeners: unix::Listeners,
}

impl SignalHost {
    /// Registers signal listeners. Must be called inside a tokio runtime.
    ///
    /// Returns `Err` if signal registration fails.
    pub fn new(args: Vec<String>) -> std::io::Result<Self> {
        Ok(Self {
            args: Some(args),
            #[cfg(unix)]
            listeners: unix::Listeners::register()?,
        })
    }
}

#[async_trait]
impl ServiceHost for SignalHost {
    async fn next_signal(&mut self) -> Option<HostSignal> {
        if let Some(args) = self.args.take() {
            return Some(HostSignal::Start(args));
        }
        self.wait_os_signal().await
    }
}

impl SignalHost {
    #[cfg(unix)]
    async fn wait_os_signal(&mut self) -> Option<HostSignal> {
        self.listeners.next().await
    }

    #[cfg(not(unix))]
    async fn wait_os_signal(&mut self) -> Option<HostSignal> {
        tokio::signal::ctrl_c().await.ok().map(|()| HostSignal::Stop)
    }
}

#[cfg(unix)]
mod unix {
    use tokio::signal::unix::{Signal, SignalKind, signal};

    use super::HostSignal;

    pub(super) struct Listeners {
        sigint: Signal,
        sigterm: Signal,
        sigquit: Signal,
        sigusr1: Signal,
        sigusr2: Signal,
    }

    impl Listeners {
        pub(super) fn register() -> std::io::Result<Self> {
            Ok(Self {
                sigint: signal(SignalKind::interrupt())?,
                sigterm: signal(SignalKind::terminate())?,
                sigquit: signal(SignalKind::quit())?,
                sigusr1: signal(SignalKind::user_defined1())?,
                sigusr2: signal(SignalKind::user_defined2())?,
            })
        }

        pub(super) async fn next(&mut self) -> Option<HostSignal> {
            tokio::select! {
                Ok(()) = tokio::signal::ctrl_c() => Some(HostSignal::Stop),
                Some(()) = self.sigint.recv() => Some(HostSignal::Stop),
                Some(()) = self.sigterm.recv() => Some(HostSignal::Stop),
                Some(()) = self.sigquit.recv() => Some(HostSignal::Stop),
                Some(()) = self.sigusr1.recv() => Some(HostSignal::Pause),
                Some(()) = self.sigusr2.recv() => Some(HostSignal::Continue),
                else => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_signal_is_start_with_args() {
        let mut host = SignalHost::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(
            host.next_signal().await,
            Some(HostSignal::Start(vec!["a".to_string(), "b".to_string()]))
        );
    }
}
