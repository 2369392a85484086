//! The fitness coach: a stateful chat bridge to a hosted LLM.
//!
//! - [`provider::LlmProvider`] -- backend seam; [`gemini::GeminiProvider`] is
//!   the production implementation.
//! - [`conversation::Conversation`] -- one transcript.
//! - [`registry::ConversationRegistry`] -- one conversation per user.

use std::sync::Arc;

pub mod conversation;
pub mod error;
pub mod gemini;
pub mod message;
pub mod provider;
pub mod registry;

pub use conversation::Conversation;
pub use error::CoachError;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use message::{ChatMessage, Role};
pub use provider::{LlmProvider, UnconfiguredProvider};
pub use registry::{CoachReply, ConversationRegistry};

/// Build the configured provider.
///
/// A missing or unusable key does not stop the server: the coach falls back
/// to an [`UnconfiguredProvider`] that reports the problem on every call.
pub fn build_provider(config: GeminiConfig) -> Arc<dyn LlmProvider> {
    match GeminiProvider::new(config) {
        Ok(provider) => {
            tracing::info!(model = provider.model(), "Coach provider configured");
            Arc::new(provider)
        }
        Err(CoachError::InvalidApiKey) => {
            tracing::warn!("GEMINI_API_KEY is not a Gemini key; coach disabled");
            Arc::new(UnconfiguredProvider::invalid_key())
        }
        Err(CoachError::MissingApiKey) => {
            tracing::warn!("GEMINI_API_KEY not set; coach disabled");
            Arc::new(UnconfiguredProvider::missing_key())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build coach HTTP client; coach disabled");
            Arc::new(UnconfiguredProvider::missing_key())
        }
    }
}
