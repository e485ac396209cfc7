//! # ObserverSet: ordered synchronous fan-out over observers
//!
//! [`ObserverSet`] delivers each [`Event`] to every observer in registration
//! order before `emit` returns.
//!
//! ## What it guarantees
//! - Registration order is delivery order for every event.
//! - `emit` returns only after all observers saw the event.
//! - Panics inside observers are caught and logged; remaining observers still run,
//!   and they additionally receive an `ObserverPanicked` event.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        ├──► observer 1 .on_event()   (catch_unwind)
//!        ├──► observer 2 .on_event()   (catch_unwind)
//!        └──► observer N .on_event()   (catch_unwind)
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::Event;

use super::Observe;

/// Ordered list of observers shared by the orchestrator and its workers.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observe>>,
}

impl ObserverSet {
    /// Creates a set from observers in notification order.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        Self { observers }
    }

    /// Delivers one event to every observer, in order.
    pub fn emit(&self, event: &Event) {
        for (idx, observer) in self.observers.iter().enumerate() {
            let delivered = catch_unwind(AssertUnwindSafe(|| observer.on_event(event)));
            if let Err(payload) = delivered {
                let info = panic_message(payload.as_ref());
                tracing::error!(
                    observer = observer.name(),
                    event = ?event.kind,
                    info = %info,
                    "observer panicked"
                );
                self.notify_panic(idx, observer.name(), info);
            }
        }
    }

    /// Tells every other observer that `observers[skip]` panicked.
    ///
    /// Panics raised while handling this notice are logged and dropped.
    fn notify_panic(&self, skip: usize, name: &'static str, info: String) {
        let notice = Event::observer_panicked(name, info);
        for (idx, observer) in self.observers.iter().enumerate() {
            if idx == skip {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| observer.on_event(&notice))).is_err() {
                tracing::error!(observer = observer.name(), "observer panicked on panic notice");
            }
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

/// Best-effort extraction of a panic payload message.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
