//! Per-user conversation slots.
//!
//! Each user owns at most one live [`Conversation`]. A slot is guarded by its
//! own async mutex, so a user's messages are handled one at a time while
//! different users never wait on each other. Slots left idle are dropped by
//! [`ConversationRegistry::prune_idle`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ironquest_core::types::DbId;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::error::CoachError;
use crate::provider::LlmProvider;

/// The model's answer and the conversation it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct CoachReply {
    pub reply: String,
    pub conversation_id: Uuid,
}

struct Slot {
    conversation: Conversation,
    last_active: Instant,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            conversation: Conversation::new(),
            last_active: Instant::now(),
        }
    }
}

#[derive(Default)]
pub struct ConversationRegistry {
    slots: Mutex<HashMap<DbId, Arc<Mutex<Slot>>>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, user_id: DbId) -> Arc<Mutex<Slot>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(user_id).or_default())
    }

    /// Number of users with a live slot.
    pub async fn slot_count(&self) -> usize {
        self.slots.lock().await.len()
    }

    /// Drop every slot untouched for at least `max_idle`, returning how many
    /// were dropped. Slots a request is still holding are kept.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        // New handles are only cloned under the map lock, so a count of one
        // means no request can be using the slot.
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(slot) => slot.last_active.elapsed() < max_idle,
                Err(_) => true,
            }
        });
        before - slots.len()
    }

    /// A copy of the user's current conversation, creating it if needed.
    pub async fn snapshot(&self, user_id: DbId) -> Conversation {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;
        slot.last_active = Instant::now();
        slot.conversation.clone()
    }

    /// Send `text` on behalf of `user_id`.
    ///
    /// A provider failure discards the user's conversation so the next
    /// message starts over; a rejected message leaves it alone.
    pub async fn send(
        &self,
        user_id: DbId,
        provider: &dyn LlmProvider,
        system_prompt: &str,
        text: &str,
    ) -> Result<CoachReply, CoachError> {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;
        slot.last_active = Instant::now();
        let conversation = &mut slot.conversation;

        match conversation.send(provider, system_prompt, text).await {
            Ok(reply) => Ok(CoachReply {
                reply,
                conversation_id: conversation.id(),
            }),
            Err(err) => {
                if err.is_provider_failure() {
                    let failed = std::mem::take(conversation);
                    tracing::warn!(
                        user_id,
                        conversation_id = %failed.id(),
                        provider = provider.name(),
                        error = %err,
                        "Coach request failed, conversation reset"
                    );
                    *conversation = failed.reset();
                }
                Err(err)
            }
        }
    }

    /// Drop the user's conversation and start a fresh one.
    pub async fn reset(&self, user_id: DbId) -> Uuid {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;
        slot.last_active = Instant::now();
        let old = std::mem::take(&mut slot.conversation);
        slot.conversation = old.reset();
        slot.conversation.id()
    }
}
