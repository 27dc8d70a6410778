//! Cooperative suspension for I/O-bound session tasks.
//!
//! Sessions own a [`YieldContext`] and pass it to every suspension point,
//! so the deadline travels with the call instead of living in task-local
//! state.

mod yielder;

pub use yielder::{yield_or_wait, YieldContext, YieldMode, YieldOutcome};
