mod mocks;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use diamondcast::llm::{LlmProvider, UnconfiguredLlmProvider};
use diamondcast::mlb::{GameListing, Schedule};
use diamondcast::narration::{AudioStore, Narrator};
use diamondcast::report::GameReporter;
use diamondcast::server::{build_rocket, AppState};
use diamondcast::speech::{SpeechSynthesizer, UnconfiguredSynthesizer};
use mocks::{listing, two_play_feed, MockFeeds, MockLlm, MockSpeech};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;

async fn client(llm: MockLlm, speech: MockSpeech, root: &Path) -> Client {
    client_with(Arc::new(llm), Arc::new(speech), root).await
}

async fn client_with(
    llm: Arc<dyn LlmProvider>,
    speech: Arc<dyn SpeechSynthesizer>,
    root: &Path,
) -> Client {
    let schedule = Arc::new(Schedule::new(vec![listing(100), listing(101)]));
    let narrator = Narrator::new(llm, speech, AudioStore::new(root.join("audio")));
    let reporter = GameReporter::new(
        schedule.clone(),
        Arc::new(MockFeeds::new(two_play_feed())),
        narrator,
    );
    let state = AppState {
        started_at: Utc::now(),
        season: 2024,
        schedule,
        reporter: Arc::new(reporter),
    };

    let static_dir = root.join("static");
    std::fs::create_dir_all(&static_dir).expect("static dir");
    std::fs::write(static_dir.join("index.html"), "<h1>Diamondcast</h1>").expect("index");

    let rocket = build_rocket(
        rocket::Config::figment(),
        state,
        &static_dir,
        &root.join("audio"),
    )
    .expect("build rocket");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

async fn default_client(root: &Path) -> Client {
    client(MockLlm::new("What a game."), MockSpeech::new(b"ID3"), root).await
}

#[rocket::async_test]
async fn test_health_and_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = default_client(dir.path()).await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.as_deref(), Some("OK"));

    let response = client.get("/api/v1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("status json");
    assert_eq!(body["season"], 2024);
    assert_eq!(body["games_count"], 2);
}

#[rocket::async_test]
async fn test_index_serves_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = default_client(dir.path()).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(
        response.headers().get_one("Location"),
        Some("/static/index.html")
    );

    let response = client.get("/static/index.html").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn test_list_games() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = default_client(dir.path()).await;

    let response = client.get("/api/v1/games").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let games: Vec<GameListing> = response.into_json().await.expect("games json");
    assert_eq!(games, vec![listing(100), listing(101)]);
}

#[rocket::async_test]
async fn test_game_summary_and_audio() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = default_client(dir.path()).await;

    let response = client
        .post("/game_summary")
        .header(ContentType::Form)
        .body("game_pk=100")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.expect("summary json");
    assert_eq!(body["game_pk"], 100);
    assert_eq!(body["away_team"], "Away Team");
    assert_eq!(body["summary"], "What a game.");

    let audio_path = body["audio_path"].as_str().expect("audio_path");
    assert!(audio_path.starts_with("/audio/narration-"));
    assert!(audio_path.ends_with(".mp3"));

    let response = client.get(audio_path.to_string()).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_bytes().await, Some(b"ID3".to_vec()));
}

#[rocket::async_test]
async fn test_unknown_game_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = default_client(dir.path()).await;

    for body in ["game_pk=999", "game_pk=not-a-number"] {
        let response = client
            .post("/game_summary")
            .header(ContentType::Form)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let json: Value = response.into_json().await.expect("error json");
        assert!(json["error"].as_str().unwrap().contains("not in the schedule"));
    }
}

#[rocket::async_test]
async fn test_narration_failure_is_bad_gateway() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = client(
        MockLlm::new("What a game."),
        MockSpeech::failing("Speech API error 503"),
        dir.path(),
    )
    .await;

    let response = client
        .post("/game_summary")
        .header(ContentType::Form)
        .body("game_pk=101")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadGateway);

    let json: Value = response.into_json().await.expect("error json");
    assert!(json["error"].as_str().unwrap().contains("speech synthesis failed"));

    let written = std::fs::read_dir(dir.path().join("audio")).unwrap().count();
    assert_eq!(written, 0);
}

#[rocket::async_test]
async fn test_missing_credentials_keep_listing_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_with(
        Arc::new(UnconfiguredLlmProvider::new("API key env var 'OPENAI_API_KEY' not set")),
        Arc::new(UnconfiguredSynthesizer::new("API key env var 'OPENAI_API_KEY' not set")),
        dir.path(),
    )
    .await;

    let response = client.get("/api/v1/games").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let games: Vec<GameListing> = response.into_json().await.expect("games json");
    assert_eq!(games.len(), 2);

    let response = client
        .post("/game_summary")
        .header(ContentType::Form)
        .body("game_pk=100")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadGateway);

    let json: Value = response.into_json().await.expect("error json");
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("not configured"));
    assert!(error.contains("OPENAI_API_KEY"));
}
