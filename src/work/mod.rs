//! # Unit-of-work abstractions.
//!
//! - [`Work`] / [`WorkFn`] - async unit repeated by a pooled worker
//! - [`BlockingWork`] / [`BlockingWorkFn`] - blocking unit repeated by a thread worker
//! - [`WorkContext`] - per-iteration context (worker name, args, cancellation)

mod unit;
mod work_fn;

pub use unit::{BlockingWork, BlockingWorkRef, Work, WorkContext, WorkRef};
pub use work_fn::{BlockingWorkFn, WorkFn};
