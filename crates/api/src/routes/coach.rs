//! Route definitions for the `/coach` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coach;
use crate::state::AppState;

/// Routes mounted at `/coach`.
///
/// ```text
/// GET    /conversation  -> get_conversation
/// DELETE /conversation  -> reset_conversation
/// POST   /messages      -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/conversation",
            get(coach::get_conversation).delete(coach::reset_conversation),
        )
        .route("/messages", post(coach::send_message))
}
