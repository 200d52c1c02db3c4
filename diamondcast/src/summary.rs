// Plain-text game summary sent to the narration model
use std::fmt::Display;

use crate::mlb::feed::{GameDetails, GameMetadata, TeamRecord};

const NOT_AVAILABLE: &str = "N/A";

/// Render the extracted views into a single newline-joined report.
/// Pure: identical inputs always give an identical string.
pub fn compose_summary(metadata: &GameMetadata, details: &GameDetails, plays: &[String]) -> String {
    let mut summary = Vec::with_capacity(plays.len() + 11);

    summary.push("=== Game Summary ===".to_string());
    summary.push(format!("Timestamp: {}", metadata.timestamp));
    summary.push(format!("Game Status: {}", details.status));
    summary.push(format!("Game Date and Time: {}", details.datetime));
    summary.push(team_line("Away", &details.away_team, &details.away_record));
    summary.push(team_line("Home", &details.home_team, &details.home_record));
    summary.push(format!("Game Events: {}", metadata.game_events.join(", ")));
    summary.push(format!("Logical Events: {}", metadata.logical_events.join(", ")));
    summary.push(format!(
        "Current Score: Away Team {} - Home Team {}",
        or_na(details.away_score),
        or_na(details.home_score)
    ));

    summary.push(String::new());
    summary.push("=== Play-by-Play ===".to_string());
    summary.extend(plays.iter().cloned());

    summary.join("\n")
}

fn team_line(side: &str, name: &str, record: &TeamRecord) -> String {
    format!(
        "{side} Team: {name} - Record: {} Wins - {} Losses",
        or_na(record.wins),
        or_na(record.losses)
    )
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
