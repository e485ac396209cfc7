//! # Lifecycle observers.
//!
//! Observers are the notification-hook list of the orchestrator: every service
//! transition is bracketed by a before/after event pair, and workers report their
//! own start, completion, and swallowed faults.
//!
//! ```text
//! ServiceOrchestrator ─┐
//!                      ├─► ObserverSet::emit(&Event) ─► observer 1, observer 2, ... (in order)
//! worker loops ────────┘
//! ```

#[cfg(feature = "logging")]
mod log;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;
pub(crate) use set::panic_message;
pub use set::ObserverSet;
