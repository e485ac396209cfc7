//! Service core: configuration, state machine and orchestration.
//!
//! The public API from this module is [`ServiceOrchestrator`] (built through
//! [`ServiceBuilder`]), its [`Config`], and the [`ServiceState`] /
//! [`ServiceSignal`] vocabulary.
//!
//! Internal modules:
//! - [`orchestrator`]: fans lifecycle signals out to the worker set and drains on stop;
//! - [`state`]: service states, signals and the transition table;
//! - [`builder`]: assembles workers and observers into an orchestrator;
//! - [`config`]: poll intervals, drain grace and default fault policy.

mod builder;
mod config;
mod orchestrator;
mod state;

pub use builder::ServiceBuilder;
pub use config::Config;
pub use orchestrator::ServiceOrchestrator;
pub use state::{ServiceSignal, ServiceState};
