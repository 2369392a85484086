//! Route definitions for the `/workouts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::workouts;
use crate::state::AppState;

/// Routes mounted at `/workouts`.
///
/// ```text
/// GET  /               -> list_workouts
/// POST /               -> save_workout
/// GET  /dashboard      -> dashboard
/// GET  /suggestions    -> suggestions
/// GET  /previous-sets  -> previous_exercise_sets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workouts::list_workouts).post(workouts::save_workout),
        )
        .route("/dashboard", get(workouts::dashboard))
        .route("/suggestions", get(workouts::suggestions))
        .route("/previous-sets", get(workouts::previous_exercise_sets))
}
