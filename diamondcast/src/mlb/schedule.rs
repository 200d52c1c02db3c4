//! Season schedule loading and the read-only listing store built from it.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{GameListing, ScheduleSource};

const UNKNOWN_TEAM: &str = "Unknown";

/// Fetch the season schedule once. Any failure is logged and degrades to an
/// empty listing so the server can still start.
pub async fn load_schedule<S: ScheduleSource + ?Sized>(source: &S, season: u16) -> Vec<GameListing> {
    match source.fetch_schedule(season).await {
        Ok(games) => {
            info!(season, games = games.len(), "schedule loaded");
            games
        }
        Err(e) => {
            warn!(season, error = %e, "failed to load schedule, continuing with an empty listing");
            Vec::new()
        }
    }
}

/// Parse a `/api/v1/schedule` response body into listings.
pub fn parse_schedule(body: &str) -> Result<Vec<GameListing>> {
    let doc: ScheduleResponse =
        serde_json::from_str(body).context("Failed to parse schedule response")?;
    Ok(flatten_schedule(doc))
}

/// Flattens dates -> games, keeping date order and in-date listing order.
/// Games without a numeric `gamePk` are skipped; missing team names become "Unknown".
pub fn flatten_schedule(doc: ScheduleResponse) -> Vec<GameListing> {
    doc.dates
        .into_iter()
        .flat_map(|date| {
            let game_date = date.date;
            date.games
                .into_iter()
                .filter_map(move |game| listing_from_game(&game, &game_date))
        })
        .collect()
}

fn listing_from_game(game: &Value, game_date: &str) -> Option<GameListing> {
    let Some(game_pk) = game.get("gamePk").and_then(Value::as_u64) else {
        warn!(game_date, "schedule entry has no gamePk, skipping");
        return None;
    };
    let team_name = |side: &str| {
        game.pointer(&format!("/teams/{side}/team/name"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_TEAM)
            .to_string()
    };

    Some(GameListing {
        away_team: team_name("away"),
        home_team: team_name("home"),
        game_pk,
        game_date: game_date.to_string(),
    })
}

/// Immutable listing of the season's games, shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    games: Vec<GameListing>,
    index: HashMap<u64, usize>,
}

impl Schedule {
    pub fn new(games: Vec<GameListing>) -> Self {
        let mut index = HashMap::with_capacity(games.len());
        for (pos, game) in games.iter().enumerate() {
            if index.contains_key(&game.game_pk) {
                warn!(game_pk = game.game_pk, "duplicate game_pk in schedule, keeping first");
                continue;
            }
            index.insert(game.game_pk, pos);
        }
        Self { games, index }
    }

    pub fn games(&self) -> &[GameListing] {
        &self.games
    }

    pub fn find(&self, game_pk: u64) -> Option<&GameListing> {
        self.index.get(&game_pk).map(|&pos| &self.games[pos])
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

// Stats API schedule wire format
#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    date: String,
    // raw values: a malformed game is skipped, not fatal
    #[serde(default)]
    games: Vec<Value>,
}
