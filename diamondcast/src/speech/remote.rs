use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use super::{SpeechAudio, SpeechSynthesizer};

pub const DEFAULT_SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Remote TTS provider using the OpenAI-compatible `audio/speech` endpoint
pub struct RemoteSpeechProvider {
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
    response_format: String,
    organization: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl RemoteSpeechProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
            response_format: "mp3".to_string(),
            organization: None,
            timeout: Duration::from_secs(120),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_response_format(mut self, response_format: impl Into<String>) -> Self {
        self.response_format = response_format.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for RemoteSpeechProvider {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        let req_body = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: &self.response_format,
        };

        let mut http_request = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&req_body);
        if let Some(org) = &self.organization {
            http_request = http_request.header("OpenAI-Organization", org);
        }

        // the deadline covers the audio download as well as the request
        let exchange = async {
            let response = http_request
                .send()
                .await
                .context("Speech HTTP request failed")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Speech API error {}: {}", status, body);
            }

            let bytes = response
                .bytes()
                .await
                .context("Failed to read speech response body")?;
            Ok::<_, anyhow::Error>(bytes)
        };

        let bytes = tokio::time::timeout(self.timeout, exchange)
            .await
            .context("Speech request timed out")??;

        Ok(SpeechAudio {
            bytes: bytes.to_vec(),
            extension: self.response_format.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}
