use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rocket::form::Form;
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde::Serialize;

use common::Config;

use crate::mlb::{GameListing, Schedule};
use crate::report::{GameReporter, ReportError};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub season: u16,
    pub schedule: Arc<Schedule>,
    pub reporter: Arc<GameReporter>,
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    season: u16,
    games_count: usize,
}

/// Form submitted by the page when a game is picked.
#[derive(rocket::FromForm)]
struct GameSelection {
    game_pk: String,
}

/// Narrated game returned to the page.
#[derive(Debug, Serialize)]
pub struct GameSummaryResponse {
    pub game_pk: u64,
    pub game_date: String,
    pub away_team: String,
    pub home_team: String,
    pub summary: String,
    /// URL path of the narration audio, e.g. `/audio/narration-<id>.mp3`
    pub audio_path: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (Status, Json<ErrorResponse>);

fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        let status = match err {
            ReportError::UnknownGame(_) => Status::NotFound,
            ReportError::FeedUnavailable(_)
            | ReportError::FeedFetch { .. }
            | ReportError::Narration(_) => Status::BadGateway,
        };
        api_error(status, err.to_string())
    }
}

/// Redirect root to static index.html
#[get("/")]
async fn index_redirect() -> Redirect {
    Redirect::to("/static/index.html")
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        season: state.season,
        games_count: state.schedule.len(),
    })
}

/// Season listing shown in the game picker.
#[get("/api/v1/games")]
async fn list_games(state: &State<AppState>) -> Json<Vec<GameListing>> {
    Json(state.schedule.games().to_vec())
}

#[post("/game_summary", data = "<selection>")]
async fn game_summary(
    state: &State<AppState>,
    selection: Form<GameSelection>,
) -> Result<Json<GameSummaryResponse>, ApiError> {
    let game_pk = selection.game_pk.trim().parse::<u64>().map_err(|_| {
        api_error(
            Status::NotFound,
            format!("game {} is not in the schedule", selection.game_pk),
        )
    })?;

    let report = state.reporter.report(game_pk).await.map_err(|e| {
        tracing::error!(game_pk, error = %e, "failed to build game report");
        ApiError::from(e)
    })?;

    Ok(Json(GameSummaryResponse {
        game_pk,
        game_date: report.game.game_date,
        away_team: report.game.away_team,
        home_team: report.game.home_team,
        summary: report.narration.refined_text,
        audio_path: format!("/audio/{}", report.narration.audio_file),
    }))
}

/// Assemble the Rocket instance: routes, managed state and file servers.
pub fn build_rocket(
    figment: rocket::figment::Figment,
    state: AppState,
    static_dir: &Path,
    audio_dir: &Path,
) -> Result<Rocket<Build>> {
    std::fs::create_dir_all(audio_dir)
        .with_context(|| format!("Failed to create audio directory: {}", audio_dir.display()))?;

    let mut rocket = rocket::custom(figment).manage(state).mount(
        "/",
        routes![index_redirect, health, status, list_games, game_summary],
    );

    if static_dir.is_dir() {
        rocket = rocket.mount("/static", FileServer::from(static_dir));
    } else {
        tracing::warn!(dir = %static_dir.display(), "static directory not found, page will not be served");
    }

    Ok(rocket.mount("/audio", FileServer::from(audio_dir)))
}

/// Start the HTTP server and run until shutdown.
pub async fn launch_rocket(config: &Config, state: AppState, audio_dir: PathBuf) -> Result<()> {
    let mut fig = rocket::Config::figment();
    if let Some(bind) = &config.server.bind {
        fig = fig.merge(("address", bind.clone()));
    }
    if let Some(port) = config.server.port {
        fig = fig.merge(("port", port));
    }

    let static_dir = PathBuf::from(config.server.static_dir.as_deref().unwrap_or("static"));
    let rocket = build_rocket(fig, state, &static_dir, &audio_dir)?;

    // Launch Rocket - this will run until shutdown (SIGINT/SIGTERM etc.)
    tracing::info!("Starting Rocket HTTP server");
    rocket
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
