use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod remote;

/// Core trait for chat-completion providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a given prompt
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    /// Instruction sent as the system message, ahead of the prompt
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Stand-in used when the real provider could not be built at startup.
/// Every call fails with the startup reason so the rest of the server keeps working.
pub struct UnconfiguredLlmProvider {
    reason: String,
}

impl UnconfiguredLlmProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for UnconfiguredLlmProvider {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse> {
        anyhow::bail!("LLM provider not configured: {}", self.reason)
    }
}
