use anyhow::Result;

pub mod remote;

/// Text-to-speech capability
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio>;
}

/// Encoded audio returned by a synthesizer
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    /// File extension matching the encoding, e.g. "mp3"
    pub extension: String,
}

/// Stand-in used when the real synthesizer could not be built at startup.
pub struct UnconfiguredSynthesizer {
    reason: String,
}

impl UnconfiguredSynthesizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for UnconfiguredSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SpeechAudio> {
        anyhow::bail!("speech provider not configured: {}", self.reason)
    }
}
