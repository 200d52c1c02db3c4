use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use super::schedule::parse_schedule;
use super::{GameListing, LiveFeed, LiveFeedSource, ScheduleSource};

pub const DEFAULT_API_BASE: &str = "https://statsapi.mlb.com";

/// Client for the public MLB Stats API
pub struct StatsApiClient {
    api_base: String,
    sport_id: u32,
    client: Client,
}

impl StatsApiClient {
    pub fn new(api_base: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Diamondcast/0.1.0")
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            sport_id: 1,
            client,
        })
    }

    pub fn with_sport_id(mut self, sport_id: u32) -> Self {
        self.sport_id = sport_id;
        self
    }

    fn schedule_url(&self) -> String {
        format!("{}/api/v1/schedule", self.api_base)
    }

    fn live_feed_url(&self, game_pk: u64) -> String {
        format!("{}/api/v1.1/game/{}/feed/live", self.api_base, game_pk)
    }
}

#[async_trait::async_trait]
impl ScheduleSource for StatsApiClient {
    async fn fetch_schedule(&self, season: u16) -> Result<Vec<GameListing>> {
        let response = self
            .client
            .get(self.schedule_url())
            .query(&[("sportId", self.sport_id.to_string()), ("season", season.to_string())])
            .send()
            .await
            .context("schedule HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("schedule fetch failed with status: {}", status);
        }

        let body = response
            .text()
            .await
            .context("failed to read schedule response body")?;
        parse_schedule(&body)
    }
}

#[async_trait::async_trait]
impl LiveFeedSource for StatsApiClient {
    async fn fetch_live_feed(&self, game_pk: u64) -> Result<Option<LiveFeed>> {
        let response = self
            .client
            .get(self.live_feed_url(game_pk))
            .send()
            .await
            .context("live feed HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            warn!(game_pk, status = status.as_u16(), "failed to fetch live feed");
            return Ok(None);
        }

        let doc: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse live feed response")?;
        Ok(Some(LiveFeed::new(doc)))
    }
}
