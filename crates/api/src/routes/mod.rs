pub mod admin;
pub mod auth;
pub mod character;
pub mod coach;
pub mod health;
pub mod quests;
pub mod workouts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /character                                       character sheet
/// /character/upgrade                               spend a skill point (POST)
///
/// /workouts                                        list, save
/// /workouts/dashboard                              volume / max-weight series
/// /workouts/suggestions                            exercise name autocomplete
/// /workouts/previous-sets?exercise=                last sets for an exercise
///
/// /quests                                          list, create (admin)
/// /quests/{id}                                     delete (admin)
/// /quests/{id}/complete                            complete (POST)
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}/toggle-ban                     ban / unban (admin only)
///
/// /coach/conversation                              get, reset (DELETE)
/// /coach/messages                                  send a message (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/character", character::router())
        .nest("/workouts", workouts::router())
        .nest("/quests", quests::router())
        .nest("/admin", admin::router())
        .nest("/coach", coach::router())
}
