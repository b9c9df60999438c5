//! Core domain types for the gaffer penalty-card pipeline.
//!
//! This crate provides the entities shared across the pipeline stages:
//! - `Fixture`, `Player`, `StatEvent`: provider-sourced entities
//! - `GameweekResult`: a user's points and 15 ordered picks
//! - `Card`: a penalty marker with a content-hash identity
//! - `AggregatedResult`: the append-only leaderboard row

pub mod card;
pub mod error;
pub mod result;
pub mod stat;
pub mod types;

pub use card::{Card, CardKind};
pub use error::{CoreError, Result};
pub use result::{GameweekResult, SQUAD_SIZE, STARTING_XI};
pub use stat::{StatEvent, StatKind};
pub use types::{AggregatedResult, Fixture, LeagueMembership, Player, UserRef};
