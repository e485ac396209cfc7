//! # Host integration.
//!
//! Everything outside the orchestrator that produces lifecycle signals:
//! - [`ServiceHost`] / [`run_hosted`] - generic host collaborator loop
//! - [`SignalHost`] - OS signals as host
//! - [`CommandLoop`] - interactive console (P / R / Q)
//! - [`RunMode`] - service vs install/uninstall selection

mod collaborator;
mod console;
mod mode;
mod signals;

pub use collaborator::{HostSignal, ServiceHost, run_hosted};
pub use console::{Command, CommandLoop};
pub use mode::{ConflictingModes, RunMode};
pub use signals::SignalHost;
