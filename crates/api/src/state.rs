use std::sync::Arc;

use ironquest_coach::{ConversationRegistry, LlmProvider};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ironquest_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend the coach talks to.
    pub coach: Arc<dyn LlmProvider>,
    /// Live coach conversations, one per user.
    pub conversations: Arc<ConversationRegistry>,
}

impl AppState {
    pub fn new(
        pool: ironquest_db::DbPool,
        config: ServerConfig,
        coach: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            coach,
            conversations: Arc::new(ConversationRegistry::new()),
        }
    }
}
