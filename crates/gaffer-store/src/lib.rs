//! PostgreSQL persistence for the gaffer pipeline.
//!
//! One [`Store`] over a connection pool; repositories are grouped by
//! entity. Reconciliation plans, card batches and aggregation runs each
//! land in a single transaction.

mod aggregates;
mod cards;
pub mod error;
mod events;
mod fixtures;
mod memberships;
mod players;
mod results;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::Store;
