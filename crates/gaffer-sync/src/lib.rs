//! Entity reconciliation: generic diff-sync planning plus the passes that
//! apply it to fixtures, players, stat events and gameweek results.

pub mod diff;
pub mod error;
pub mod reconciler;

pub use diff::{plan, SyncMode, SyncPlan};
pub use error::{SyncError, SyncResult};
pub use reconciler::Reconciler;
