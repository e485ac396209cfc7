//! # Core observer trait
//!
//! `Observe` is the extension point for plugging lifecycle hooks into the
//! orchestrator. Observers are called **synchronously**, in registration
//! order, on the thread that produced the event: the control path for service
//! events, the worker's task or thread for worker events.
//!
//! ## Contract
//! - Keep `on_event` short and non-blocking; a slow observer slows the signal path.
//! - Panics are caught by the [`ObserverSet`](crate::ObserverSet) and do not reach callers.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use workvisor::{Event, EventKind, Observe};
//!
//! #[derive(Default)]
//! struct FaultCounter(AtomicUsize);
//!
//! impl Observe for FaultCounter {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::WorkerFaulted {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "fault-counter" }
//! }
//! ```

use crate::events::Event;

/// Contract for lifecycle observers.
pub trait Observe: Send + Sync + 'static {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
