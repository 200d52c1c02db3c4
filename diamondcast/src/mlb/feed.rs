//! # Live feed projections
//!
//! The `/api/v1.1/game/{game_pk}/feed/live` document is large and loosely shaped,
//! so it is kept as a raw JSON value and projected into the three views the
//! summary needs. Every lookup tolerates missing or mistyped fields.

use std::ops::Deref;

use serde_json::Value;

/// Raw live-feed document for a single game
#[derive(Debug, Clone)]
pub struct LiveFeed(Value);

impl LiveFeed {
    pub fn new(doc: Value) -> Self {
        LiveFeed(doc)
    }

    fn str_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    fn u32_at(&self, pointer: &str) -> Option<u32> {
        self.0
            .pointer(pointer)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    fn strings_at(&self, pointer: &str) -> Vec<String> {
        self.0
            .pointer(pointer)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Deref for LiveFeed {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Value> for LiveFeed {
    fn from(value: Value) -> Self {
        LiveFeed(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetadata {
    pub timestamp: String,
    pub game_events: Vec<String>,
    pub logical_events: Vec<String>,
}

/// League record of a team; either side may be missing from the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub status: String,
    pub datetime: String,
    pub away_team: String,
    pub home_team: String,
    pub away_record: TeamRecord,
    pub home_record: TeamRecord,
    /// Runs from the live linescore, absent before the game starts
    pub away_score: Option<u32>,
    pub home_score: Option<u32>,
}

/// Most recently observed away/home scores while walking the plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningScore {
    pub away: u64,
    pub home: u64,
}

impl RunningScore {
    /// Overwrite each side independently when the play result carries it.
    pub fn observe(&mut self, result: &Value) {
        if let Some(away) = result.get("awayScore").and_then(Value::as_u64) {
            self.away = away;
        }
        if let Some(home) = result.get("homeScore").and_then(Value::as_u64) {
            self.home = home;
        }
    }

    pub fn final_line(&self) -> String {
        format!(
            "Final Score: Away Team {} - Home Team {}",
            self.away, self.home
        )
    }
}

pub fn extract_metadata(doc: &LiveFeed) -> GameMetadata {
    GameMetadata {
        timestamp: doc.str_at("/metaData/timeStamp").unwrap_or_default().to_string(),
        game_events: doc.strings_at("/metaData/gameEvents"),
        logical_events: doc.strings_at("/metaData/logicalEvents"),
    }
}

pub fn extract_game_details(doc: &LiveFeed) -> GameDetails {
    let team_name = |side: &str| {
        doc.str_at(&format!("/gameData/teams/{side}/name"))
            .unwrap_or("Unknown")
            .to_string()
    };
    let record = |side: &str| TeamRecord {
        wins: doc.u32_at(&format!("/gameData/teams/{side}/record/leagueRecord/wins")),
        losses: doc.u32_at(&format!("/gameData/teams/{side}/record/leagueRecord/losses")),
    };

    GameDetails {
        status: doc
            .str_at("/gameData/status/detailedState")
            .unwrap_or_default()
            .to_string(),
        datetime: doc
            .str_at("/gameData/datetime/dateTime")
            .unwrap_or_default()
            .to_string(),
        away_team: team_name("away"),
        home_team: team_name("home"),
        away_record: record("away"),
        home_record: record("home"),
        away_score: doc.u32_at("/liveData/linescore/teams/away/runs"),
        home_score: doc.u32_at("/liveData/linescore/teams/home/runs"),
    }
}

/// One line per play in source order, followed by a single final-score line.
pub fn extract_plays(doc: &LiveFeed) -> Vec<String> {
    let plays = doc
        .pointer("/liveData/plays/allPlays")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut score = RunningScore::default();
    let mut lines = Vec::with_capacity(plays.len() + 1);

    for play in plays {
        let result = &play["result"];
        let description = result["description"].as_str().unwrap_or_default();
        let inning = play["about"]["inning"]
            .as_u64()
            .map(|n| n.to_string())
            .unwrap_or_default();

        score.observe(result);
        lines.push(format!("Inning {inning}: {description}"));
    }

    lines.push(score.final_line());
    lines
}
