//! Provider gateway: typed access to the fantasy data API.
//!
//! Exposes the [`ProviderClient`] trait plus the wire-format payloads and
//! their conversions into domain types.

pub mod client;
pub mod dto;
pub mod error;

pub use client::{FplClient, ProviderClient};
pub use dto::{
    BootstrapResponse, DeadlineEvent, ElementDto, EventStatusResponse, FixtureDto, FixtureStatDto,
    PicksResponse, StatusEntry,
};
pub use error::{ProviderError, ProviderResult};
