//! Narration pipeline: summary -> chat completion -> speech -> audio file.
//!
//! Both external calls must succeed before anything touches the disk, so a
//! failed request never leaves a half-written narration behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::{LlmProvider, LlmRequest};
use crate::speech::SpeechSynthesizer;

pub const NARRATION_SYSTEM_PROMPT: &str = "You are a helpful assistant whose job is to create \
summaries of Major League Baseball games based on the information provided to you. \
Do not use markdown.";

const AUDIO_FILE_PREFIX: &str = "narration-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationResult {
    pub refined_text: String,
    /// Base name of the audio file inside the audio directory
    pub audio_file: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("narration request failed: {0:#}")]
    Completion(anyhow::Error),
    #[error("narration model returned empty text")]
    EmptyNarration,
    #[error("speech synthesis failed: {0:#}")]
    Synthesis(anyhow::Error),
    #[error("speech synthesis returned no audio")]
    EmptyAudio,
    #[error("failed to persist narration audio: {0}")]
    Persist(#[from] std::io::Error),
}

/// Directory of synthesized narration files, one unique file per request.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    keep_latest: usize,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep_latest: 20,
        }
    }

    pub fn with_keep_latest(mut self, keep_latest: usize) -> Self {
        self.keep_latest = keep_latest.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh name and return that base name.
    /// The file only appears under its final name once fully written.
    pub async fn persist(&self, bytes: &[u8], extension: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let id = Uuid::new_v4();
        let file_name = format!("{AUDIO_FILE_PREFIX}{id}.{extension}");
        let tmp_path = self.dir.join(format!(".{id}.tmp"));
        let final_path = self.dir.join(&file_name);

        if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        if let Err(e) = self.prune(&final_path).await {
            warn!(error = %e, dir = ?self.dir, "failed to prune old narration files");
        }

        Ok(file_name)
    }

    /// Remove the oldest narration files beyond `keep_latest`. Never touches
    /// `current` or anything written after it, so files returned by concurrent
    /// requests survive; the directory can briefly exceed `keep_latest`.
    async fn prune(&self, current: &Path) -> std::io::Result<()> {
        let current_modified = tokio::fs::metadata(current).await?.modified()?;

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let path = entry.path();
            if !name.to_string_lossy().starts_with(AUDIO_FILE_PREFIX) || path == current {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            files.push((modified, path));
        }

        // `current` takes one of the slots
        let keep_others = self.keep_latest - 1;
        if files.len() <= keep_others {
            return Ok(());
        }

        files.sort_by(|a, b| b.0.cmp(&a.0));
        for (modified, path) in files.into_iter().skip(keep_others) {
            if modified > current_modified {
                continue;
            }
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }
}

/// Rewrites a game summary into narration text and synthesizes it.
pub struct Narrator {
    llm: Arc<dyn LlmProvider>,
    speech: Arc<dyn SpeechSynthesizer>,
    audio: AudioStore,
}

impl Narrator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        speech: Arc<dyn SpeechSynthesizer>,
        audio: AudioStore,
    ) -> Self {
        Self { llm, speech, audio }
    }

    pub fn audio_store(&self) -> &AudioStore {
        &self.audio
    }

    pub async fn narrate(&self, summary_text: &str) -> Result<NarrationResult, NarrationError> {
        let request = LlmRequest {
            system: Some(NARRATION_SYSTEM_PROMPT.to_string()),
            prompt: summary_text.to_string(),
            ..Default::default()
        };

        let response = self
            .llm
            .generate(request)
            .await
            .map_err(NarrationError::Completion)?;

        let refined_text = response.content.trim().to_string();
        if refined_text.is_empty() {
            return Err(NarrationError::EmptyNarration);
        }
        info!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "narration text generated"
        );

        let audio = self
            .speech
            .synthesize(&refined_text)
            .await
            .map_err(NarrationError::Synthesis)?;
        if audio.bytes.is_empty() {
            return Err(NarrationError::EmptyAudio);
        }

        let audio_file = self.audio.persist(&audio.bytes, &audio.extension).await?;
        info!(audio_file = %audio_file, bytes = audio.bytes.len(), "narration audio saved");

        Ok(NarrationResult {
            refined_text,
            audio_file,
        })
    }
}
