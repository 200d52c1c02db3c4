/*
diamondcast - single-binary main.rs
Loads the season schedule once, then starts the Rocket HTTP server that narrates games on demand.
*/

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use common::{api_key_from_env, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use diamondcast::llm::remote::{RemoteLlmProvider, DEFAULT_CHAT_URL};
use diamondcast::llm::{LlmProvider, UnconfiguredLlmProvider};
use diamondcast::mlb::remote::{StatsApiClient, DEFAULT_API_BASE};
use diamondcast::mlb::schedule::load_schedule;
use diamondcast::mlb::Schedule;
use diamondcast::narration::{AudioStore, Narrator};
use diamondcast::report::GameReporter;
use diamondcast::server::{launch_rocket, AppState};
use diamondcast::speech::remote::{RemoteSpeechProvider, DEFAULT_SPEECH_URL};
use diamondcast::speech::{SpeechSynthesizer, UnconfiguredSynthesizer};

#[derive(Parser, Debug)]
#[command(name = "diamondcast", about = "Narrated MLB game summaries server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the season loaded at startup
    #[arg(long)]
    season: Option<u16>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // API keys usually live in .env during development
    if let Err(e) = dotenv::dotenv() {
        info!(%e, "no .env file loaded");
    }

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(default_path.as_path()) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    if let Some(season) = args.season {
        config.mlb.season = season;
    }
    info!(default = ?default_path, override_config = ?override_path, season = config.mlb.season, "configuration loaded");

    let stats_api = Arc::new(
        StatsApiClient::new(
            config.mlb.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            config.mlb.timeout_seconds.unwrap_or(30),
        )?
        .with_sport_id(config.mlb.sport_id.unwrap_or(1)),
    );

    // One-shot schedule load; an empty listing still lets the server start
    let schedule = Arc::new(Schedule::new(
        load_schedule(stats_api.as_ref(), config.mlb.season).await,
    ));
    info!(games = schedule.len(), "schedule ready");

    // Missing credentials only disable narration; the page and listing stay up
    let llm: Arc<dyn LlmProvider> = match create_llm_provider(&config.llm) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to initialize LLM provider: {:#}", e);
            Arc::new(UnconfiguredLlmProvider::new(format!("{:#}", e)))
        }
    };
    let speech: Arc<dyn SpeechSynthesizer> = match create_speech_provider(&config.speech) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to initialize speech provider: {:#}", e);
            Arc::new(UnconfiguredSynthesizer::new(format!("{:#}", e)))
        }
    };

    let audio_dir = PathBuf::from(&config.audio.dir);
    let mut audio = AudioStore::new(&audio_dir);
    if let Some(keep) = config.audio.keep_latest {
        audio = audio.with_keep_latest(keep);
    }

    let reporter = GameReporter::new(schedule.clone(), stats_api, Narrator::new(llm, speech, audio));

    let state = AppState {
        started_at: Utc::now(),
        season: config.mlb.season,
        schedule,
        reporter: Arc::new(reporter),
    };

    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(&config, state, audio_dir).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Create the chat-completion provider used for narration
fn create_llm_provider(llm_config: &common::RemoteLlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let api_key = api_key_from_env(llm_config.api_key_env.as_deref())?;
    let model = llm_config.model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string());
    let api_url = llm_config.api_url.clone().unwrap_or_else(|| DEFAULT_CHAT_URL.to_string());

    info!(%model, %api_url, "LLM provider initialized");
    let provider = RemoteLlmProvider::new(api_url, api_key, model)
        .with_defaults(
            llm_config.timeout_seconds.unwrap_or(60),
            llm_config.max_tokens,
            llm_config.temperature,
        )
        .with_organization(llm_config.organization.clone());
    Ok(Arc::new(provider))
}

/// Create the text-to-speech provider used for narration audio
fn create_speech_provider(speech_config: &common::SpeechConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    let api_key = api_key_from_env(speech_config.api_key_env.as_deref())?;
    let model = speech_config.model.clone().unwrap_or_else(|| "tts-1".to_string());
    let voice = speech_config.voice.clone().unwrap_or_else(|| "alloy".to_string());
    let api_url = speech_config
        .api_url
        .clone()
        .unwrap_or_else(|| DEFAULT_SPEECH_URL.to_string());

    info!(%model, %voice, %api_url, "speech provider initialized");
    let provider = RemoteSpeechProvider::new(api_url, api_key, model, voice)
        .with_response_format(speech_config.response_format.as_deref().unwrap_or("mp3"))
        .with_timeout(speech_config.timeout_seconds.unwrap_or(120))
        .with_organization(speech_config.organization.clone());
    Ok(Arc::new(provider))
}
