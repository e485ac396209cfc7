//! # LifecycleGate: the pause/continue flag of a worker.
//!
//! The gate is a boolean "may continue" flag, **open by default**. The
//! controller side closes it with [`LifecycleGate::pause`] and opens it with
//! [`LifecycleGate::resume`]; the worker side only ever waits on it through a
//! [`GateView`].
//!
//! ## Architecture
//! ```text
//!  controller ── pause()/resume() ──► LifecycleGate
//!                                        │  Mutex<bool> + Condvar   (thread waiters)
//!                                        │  watch::Sender<bool>     (task waiters)
//!                                        ▼
//!  worker loop ── may_continue(t) ───► GateView (read-only)
//! ```
//!
//! ## Rules
//! - Both waiter kinds are released on the same `resume()` call (no polling latency).
//! - State is boolean: any number of `pause()` calls is undone by one `resume()`.
//! - A `GateView` cannot change the gate.

use std::{sync::Arc, time::Duration};

use parking_lot::{Condvar, Mutex};
use tokio::{sync::watch, time};

struct Inner {
    open: Mutex<bool>,
    cond: Condvar,
    tx: watch::Sender<bool>,
}

/// Controller-side handle of a worker's pause/continue gate.
pub struct LifecycleGate {
    inner: Arc<Inner>,
}

impl LifecycleGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                open: Mutex::new(true),
                cond: Condvar::new(),
                tx,
            }),
        }
    }

    /// Closes the gate; waiters keep timing out until [`resume`](Self::resume).
    pub fn pause(&self) {
        let mut open = self.inner.open.lock();
        *open = false;
        self.inner.tx.send_replace(false);
    }

    /// Opens the gate and wakes every blocked waiter.
    pub fn resume(&self) {
        let mut open = self.inner.open.lock();
        *open = true;
        self.inner.tx.send_replace(true);
        self.inner.cond.notify_all();
    }

    /// Non-blocking read of the current flag.
    pub fn is_open(&self) -> bool {
        *self.inner.open.lock()
    }

    /// Returns the read-only side handed to the execution unit.
    pub fn view(&self) -> GateView {
        GateView {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only side of a [`LifecycleGate`], owned by the worker's execution unit.
#[derive(Clone)]
pub struct GateView {
    inner: Arc<Inner>,
}

impl GateView {
    /// Non-blocking read of the current flag.
    pub fn is_open(&self) -> bool {
        *self.inner.open.lock()
    }

    /// Blocks the calling thread for up to `timeout` waiting for the gate to be open.
    ///
    /// Returns `true` as soon as the gate is (or becomes) open, `false` if it
    /// stayed closed for the whole timeout.
    pub fn may_continue(&self, timeout: Duration) -> bool {
        let mut open = self.inner.open.lock();
        if *open {
            return true;
        }
        self.inner
            .cond
            .wait_while_for(&mut open, |open| !*open, timeout);
        *open
    }

    /// Async counterpart of [`may_continue`](Self::may_continue) for pooled tasks.
    pub async fn may_continue_async(&self, timeout: Duration) -> bool {
        let mut rx = self.inner.tx.subscribe();
        matches!(
            time::timeout(timeout, rx.wait_for(|open| *open)).await,
            Ok(Ok(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Instant};

    #[test]
    fn gate_is_open_by_default() {
        let gate = LifecycleGate::new();
        assert!(gate.is_open());
        assert!(gate.view().may_continue(Duration::from_millis(1)));
    }

    #[test]
    fn paused_gate_times_out() {
        let gate = LifecycleGate::new();
        gate.pause();

        let started = Instant::now();
        assert!(!gate.view().may_continue(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn toggling_is_boolean_not_counted() {
        let gate = LifecycleGate::new();
        gate.pause();
        gate.pause();
        gate.resume();
        assert!(gate.is_open());

        gate.pause();
        gate.resume();
        gate.pause();
        gate.resume();
        assert!(gate.view().is_open());
    }

    #[test]
    fn resume_releases_blocked_thread_promptly() {
        let gate = LifecycleGate::new();
        gate.pause();
        let view = gate.view();

        let waiter = thread::spawn(move || {
            let started = Instant::now();
            let open = view.may_continue(Duration::from_secs(5));
            (open, started.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        gate.resume();

        let (open, waited) = waiter.join().unwrap();
        assert!(open);
        assert!(waited < Duration::from_secs(1), "waited {waited:?}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn async_waiter_released_by_resume() {
        let gate = LifecycleGate::new();
        gate.pause();
        let view = gate.view();

        let waiter = tokio::spawn(async move { view.may_continue_async(Duration::from_secs(5)).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        gate.resume();

        let open = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(open);
    }

    #[tokio::test]
    async fn async_waiter_times_out_when_paused() {
        let gate = LifecycleGate::new();
        gate.pause();
        assert!(!gate.view().may_continue_async(Duration::from_millis(20)).await);
    }
}
