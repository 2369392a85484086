//! A single chat session with the coach.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoachError;
use crate::message::{normalize_user_text, ChatMessage};
use crate::provider::LlmProvider;

/// Stored in place of an empty model reply.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "...";

/// An ordered transcript with an identity.
///
/// The transcript only ever grows by complete exchanges: a user message
/// and the model's reply are appended together or not at all.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    id: Uuid,
    started_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `text` and record the exchange.
    ///
    /// On any error the transcript is left exactly as it was.
    pub async fn send(
        &mut self,
        provider: &dyn LlmProvider,
        system_prompt: &str,
        text: &str,
    ) -> Result<String, CoachError> {
        let text = normalize_user_text(text)?;

        let mut transcript = self.messages.clone();
        transcript.push(ChatMessage::user(text));

        let reply = provider.complete(system_prompt, &transcript).await?;
        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY_PLACEHOLDER.to_string()
        } else {
            reply
        };

        transcript.push(ChatMessage::model(reply.clone()));
        self.messages = transcript;
        Ok(reply)
    }

    /// Discard this conversation and start a fresh one.
    #[must_use]
    pub fn reset(self) -> Conversation {
        Conversation::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use assert_matches::assert_matches;

    use super::*;
    use crate::message::Role;

    /// Replays canned results and records what it was asked.
    pub(crate) struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, CoachError>>>,
        pub(crate) seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(replies: Vec<Result<String, CoachError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            transcript: &[ChatMessage],
        ) -> Result<String, CoachError> {
            self.seen.lock().unwrap().push(transcript.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(CoachError::EmptyResponse))
        }
    }

    #[tokio::test]
    async fn successful_send_appends_exchange() {
        let provider = ScriptedProvider::new(vec![Ok("Do squats.".into())]);
        let mut conv = Conversation::new();

        let reply = conv.send(&provider, "coach", "  What now? ").await.unwrap();

        assert_eq!(reply, "Do squats.");
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[0], ChatMessage::user("What now?"));
        assert_eq!(conv.messages()[1].role, Role::Model);
    }

    #[tokio::test]
    async fn provider_sees_full_history() {
        let provider = ScriptedProvider::new(vec![Ok("one".into()), Ok("two".into())]);
        let mut conv = Conversation::new();
        conv.send(&provider, "", "first").await.unwrap();
        conv.send(&provider, "", "second").await.unwrap();

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 3);
        assert_eq!(seen[1][2], ChatMessage::user("second"));
    }

    #[tokio::test]
    async fn empty_reply_becomes_placeholder() {
        let provider = ScriptedProvider::new(vec![Ok("   ".into())]);
        let mut conv = Conversation::new();
        let reply = conv.send(&provider, "", "hello").await.unwrap();
        assert_eq!(reply, EMPTY_REPLY_PLACEHOLDER);
        assert_eq!(conv.messages()[1].text, EMPTY_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn failure_leaves_transcript_untouched() {
        let provider = ScriptedProvider::new(vec![
            Ok("hi".into()),
            Err(CoachError::Api {
                status: 503,
                message: "overloaded".into(),
            }),
        ]);
        let mut conv = Conversation::new();
        conv.send(&provider, "", "hello").await.unwrap();

        let result = conv.send(&provider, "", "again").await;
        assert_matches!(result, Err(CoachError::Api { status: 503, .. }));
        assert_eq!(conv.messages().len(), 2);
    }

    #[tokio::test]
    async fn blank_text_never_reaches_provider() {
        let provider = ScriptedProvider::new(vec![]);
        let mut conv = Conversation::new();
        assert_matches!(
            conv.send(&provider, "", "   ").await,
            Err(CoachError::InvalidMessage(_))
        );
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_starts_a_new_conversation() {
        let provider = ScriptedProvider::new(vec![Ok("hi".into())]);
        let mut conv = Conversation::new();
        conv.send(&provider, "", "hello").await.unwrap();
        let old_id = conv.id();

        let fresh = conv.reset();
        assert_ne!(fresh.id(), old_id);
        assert!(fresh.messages().is_empty());
    }
}
