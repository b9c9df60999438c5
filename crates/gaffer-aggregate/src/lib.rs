//! Leaderboard aggregation: penalty rule, incremental running totals and
//! card expiry.

pub mod engine;
pub mod error;
pub mod service;

pub use engine::{compute_rows, penalized_users, zero_point_users, PENALTY_THRESHOLD};
pub use error::{AggregateError, AggregateResult};
pub use service::AggregateService;
