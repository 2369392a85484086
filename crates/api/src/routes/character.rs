//! Route definitions for the `/character` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/character`.
///
/// ```text
/// GET  /         -> get_character
/// POST /upgrade  -> upgrade_attribute
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::get_character))
        .route("/upgrade", post(character::upgrade_attribute))
}
