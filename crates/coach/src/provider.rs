//! The seam between conversations and a concrete LLM backend.

use async_trait::async_trait;

use crate::error::CoachError;
use crate::message::ChatMessage;

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g. `"gemini"`).
    fn name(&self) -> &'static str;

    /// Produce the model's next reply to `transcript`.
    ///
    /// The last entry of `transcript` is the user's new message. An empty
    /// string is a valid reply.
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, CoachError>;
}

/// Stand-in used when no usable API key is configured. Every call fails
/// with the configuration problem, so the rest of the server keeps working.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredProvider {
    missing: bool,
}

impl UnconfiguredProvider {
    pub fn missing_key() -> Self {
        Self { missing: true }
    }

    pub fn invalid_key() -> Self {
        Self { missing: false }
    }
}

#[async_trait]
impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        _transcript: &[ChatMessage],
    ) -> Result<String, CoachError> {
        Err(if self.missing {
            CoachError::MissingApiKey
        } else {
            CoachError::InvalidApiKey
        })
    }
}
