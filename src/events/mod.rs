//! Lifecycle events: data model.
//!
//! ## Quick reference
//! - **Publishers**: `ServiceOrchestrator` (service events, start failures, grace),
//!   worker loops (worker events), `ObserverSet` (observer panics).
//! - **Consumers**: every [`Observe`](crate::Observe) registered on the orchestrator,
//!   called synchronously and in registration order.

mod event;

pub use event::{Event, EventKind};
