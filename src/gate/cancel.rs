//! # CancelSignal: one-shot cooperative stop request.
//!
//! Thin wrapper over [`CancellationToken`]. Once requested, a stop can never be
//! withdrawn; requesting it again has no further effect.

use tokio_util::sync::CancellationToken;

/// One-shot, monotonic stop request observed by a worker's loop.
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    /// Creates a signal in the "not requested" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop. Idempotent.
    pub fn request_stop(&self) {
        self.token.cancel();
    }

    /// Non-blocking liveness check used at the top of every loop iteration.
    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once a stop has been requested.
    pub async fn stopped(&self) {
        self.token.cancelled().await;
    }

    /// Token handed to units of work so long-running units can bail out early.
    ///
    /// This is a child token: cancelling it does not request a worker stop.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent_and_terminal() {
        let signal = CancelSignal::new();
        assert!(!signal.is_stop_requested());

        signal.request_stop();
        signal.request_stop();
        assert!(signal.is_stop_requested());
        assert!(signal.clone().is_stop_requested());
    }

    #[test]
    fn child_token_follows_parent_but_not_back() {
        let signal = CancelSignal::new();
        let child = signal.child_token();
        child.cancel();
        assert!(!signal.is_stop_requested());

        let child = signal.child_token();
        signal.request_stop();
        assert!(child.is_cancelled());
    }
}
