use std::sync::Arc;

use tracing::{info, warn};

use crate::mlb::feed::{extract_game_details, extract_metadata, extract_plays};
use crate::mlb::{GameListing, LiveFeedSource, Schedule};
use crate::narration::{NarrationError, NarrationResult, Narrator};
use crate::summary::compose_summary;

/// Everything the page needs for one narrated game
#[derive(Debug, Clone)]
pub struct GameReport {
    pub game: GameListing,
    /// Composed plain-text summary that was sent for narration
    pub summary: String,
    pub narration: NarrationResult,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("game {0} is not in the schedule")]
    UnknownGame(u64),
    #[error("live feed for game {0} is unavailable")]
    FeedUnavailable(u64),
    #[error("failed to fetch live feed for game {game_pk}: {error:#}")]
    FeedFetch {
        game_pk: u64,
        error: anyhow::Error,
    },
    #[error(transparent)]
    Narration(#[from] NarrationError),
}

/// Per-request pipeline: listing lookup, live feed, summary, narration.
pub struct GameReporter {
    schedule: Arc<Schedule>,
    feeds: Arc<dyn LiveFeedSource>,
    narrator: Narrator,
}

impl GameReporter {
    pub fn new(schedule: Arc<Schedule>, feeds: Arc<dyn LiveFeedSource>, narrator: Narrator) -> Self {
        Self {
            schedule,
            feeds,
            narrator,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[tracing::instrument(skip(self))]
    pub async fn report(&self, game_pk: u64) -> Result<GameReport, ReportError> {
        let game = self
            .schedule
            .find(game_pk)
            .cloned()
            .ok_or(ReportError::UnknownGame(game_pk))?;

        let feed = match self.feeds.fetch_live_feed(game_pk).await {
            Ok(Some(feed)) => feed,
            Ok(None) => return Err(ReportError::FeedUnavailable(game_pk)),
            Err(error) => {
                warn!(error = %error, "live feed request failed");
                return Err(ReportError::FeedFetch { game_pk, error });
            }
        };

        let metadata = extract_metadata(&feed);
        let details = extract_game_details(&feed);
        let plays = extract_plays(&feed);
        let summary = compose_summary(&metadata, &details, &plays);
        info!(plays = plays.len() - 1, chars = summary.len(), "game summary composed");

        let narration = self.narrator.narrate(&summary).await?;

        Ok(GameReport {
            game,
            summary,
            narration,
        })
    }
}
