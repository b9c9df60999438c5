//! HTTP client for the fantasy data provider.
//!
//! All pipeline stages talk to the provider through the [`ProviderClient`]
//! trait so tests can substitute canned responses; [`FplClient`] is the
//! production implementation over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use gaffer_core::GameweekResult;

use crate::dto::{BootstrapResponse, EventStatusResponse, FixtureDto, PicksResponse};
use crate::error::{ProviderError, ProviderResult};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-side provider operations used by the sync and card stages.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Fetch gameweek deadlines and the full player roster.
    async fn fetch_bootstrap(&self) -> ProviderResult<BootstrapResponse>;

    /// Fetch the season's fixtures, scheduled or not.
    async fn fetch_fixtures(&self) -> ProviderResult<Vec<FixtureDto>>;

    /// Fetch the settlement signal for the current gameweek. An empty
    /// status list is an error: the caller cannot tell which gameweek the
    /// signal covers.
    async fn fetch_event_status(&self) -> ProviderResult<EventStatusResponse>;

    /// Fetch one user's picks for one gameweek.
    async fn fetch_picks(
        &self,
        team_id: i64,
        user_id: &str,
        gameweek: i32,
    ) -> ProviderResult<GameweekResult>;
}

/// Production provider client.
pub struct FplClient {
    client: Client,
    base_url: String,
}

impl FplClient {
    /// Create a new client against the given API base URL
    /// (e.g., "https://fantasy.premierleague.com/api").
    pub fn new(base_url: impl Into<String>) -> ProviderResult<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Fetching from provider");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProviderClient for FplClient {
    async fn fetch_bootstrap(&self) -> ProviderResult<BootstrapResponse> {
        let bootstrap: BootstrapResponse = self.get_json("/bootstrap-static/").await?;
        info!(
            gameweeks = bootstrap.events.len(),
            players = bootstrap.elements.len(),
            "Fetched bootstrap data"
        );
        Ok(bootstrap)
    }

    async fn fetch_fixtures(&self) -> ProviderResult<Vec<FixtureDto>> {
        let fixtures: Vec<FixtureDto> = self.get_json("/fixtures/").await?;
        info!(fixtures = fixtures.len(), "Fetched fixtures");
        Ok(fixtures)
    }

    async fn fetch_event_status(&self) -> ProviderResult<EventStatusResponse> {
        let status: EventStatusResponse = self.get_json("/event-status/").await?;
        if status.status.is_empty() {
            return Err(ProviderError::EmptyStatus);
        }
        debug!(leagues = %status.leagues, "Fetched event status");
        Ok(status)
    }

    async fn fetch_picks(
        &self,
        team_id: i64,
        user_id: &str,
        gameweek: i32,
    ) -> ProviderResult<GameweekResult> {
        let path = format!("/entry/{team_id}/event/{gameweek}/picks/");
        let picks: PicksResponse = self.get_json(&path).await?;
        picks.into_result(team_id, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = FplClient::new("https://example.test/api/").unwrap();
        assert_eq!(client.base_url, "https://example.test/api");
    }
}
