/*!
common/src/lib.rs

Shared configuration types for diamondcast.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default + override merging
- Helpers to resolve API secrets from the environment
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP server configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    /// Directory holding index.html and friends, mounted at `/static`
    pub static_dir: Option<String>,
}

/// MLB Stats API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlbConfig {
    /// Root of the Stats API, e.g. "https://statsapi.mlb.com"
    pub api_base: Option<String>,
    /// Season whose schedule is loaded at startup
    pub season: u16,
    /// 1 = MLB
    pub sport_id: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Remote LLM config (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub organization: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
}

/// Remote text-to-speech config (OpenAI-compatible audio/speech)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub organization: Option<String>,
    pub model: Option<String>,
    pub voice: Option<String>,
    /// "mp3", "opus", "aac", "flac", "wav"
    pub response_format: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Where synthesized narration audio is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub dir: String,
    /// Number of most recent narration files kept on disk
    pub keep_latest: Option<usize>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub mlb: MlbConfig,
    #[serde(default)]
    pub llm: RemoteLlmConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    pub audio: AudioConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// Read an API key from the environment variable named in the config,
/// falling back to `OPENAI_API_KEY`.
pub fn api_key_from_env(api_key_env: Option<&str>) -> Result<String> {
    let var = api_key_env.unwrap_or("OPENAI_API_KEY");
    std::env::var(var).with_context(|| format!("API key env var '{}' not set", var))
}
