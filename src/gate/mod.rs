//! Per-worker control signals.
//!
//! - [`LifecycleGate`] / [`GateView`]: pause/continue flag (controller writes, worker reads)
//! - [`CancelSignal`]: one-shot cooperative stop request

mod cancel;
mod lifecycle;

pub use cancel::CancelSignal;
pub use lifecycle::{GateView, LifecycleGate};
