//! Scheduling: the readiness state machine that gates provider polling and
//! the named recurring-task registry it drives.

pub mod readiness;
pub mod registry;

pub use readiness::{completion_boundary, Readiness, ReadinessMachine, WatchAction};
pub use registry::TaskRegistry;
