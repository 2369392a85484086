//! Route definitions for the `/quests` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::quests;
use crate::state::AppState;

/// Routes mounted at `/quests`.
///
/// ```text
/// GET    /                -> list_quests
/// POST   /                -> create_quest (admin)
/// DELETE /{id}            -> delete_quest (admin)
/// POST   /{id}/complete   -> complete_quest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::list_quests).post(quests::create_quest))
        .route("/{id}", delete(quests::delete_quest))
        .route("/{id}/complete", post(quests::complete_quest))
}
