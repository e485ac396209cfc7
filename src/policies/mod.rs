//! # Policies for worker loops.
//!
//! - [`FaultPolicy`] decides whether a worker keeps looping after a faulted unit of work.

mod fault;

pub use fault::FaultPolicy;
pub(crate) use fault::Verdict;
