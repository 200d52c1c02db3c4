use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod feed;
pub mod remote;
pub mod schedule;

pub use feed::LiveFeed;
pub use schedule::Schedule;

/// One scheduled game, flattened out of the season schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    pub away_team: String,
    pub home_team: String,
    pub game_pk: u64,
    pub game_date: String,
}

/// Source of the season schedule
#[async_trait::async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch_schedule(&self, season: u16) -> Result<Vec<GameListing>>;
}

/// Source of live game feed documents
#[async_trait::async_trait]
pub trait LiveFeedSource: Send + Sync {
    /// `Ok(None)` when the upstream answered with a non-success status.
    async fn fetch_live_feed(&self, game_pk: u64) -> Result<Option<LiveFeed>>;
}
