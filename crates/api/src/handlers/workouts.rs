//! Handlers for the `/workouts` resource: logging sessions and reading
//! history-derived views (dashboard, suggestions, previous sets).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ironquest_core::dashboard::{summarize, DashboardSummary};
use ironquest_core::progression::{levels_gained, CharacterStats};
use ironquest_core::reward::{compute_reward, WorkoutReward};
use ironquest_core::types::Timestamp;
use ironquest_core::workout::{
    exercise_suggestions, prepare_exercises, previous_sets, ExerciseDraft, WorkoutSession,
    WorkoutSet,
};
use ironquest_db::models::workout::CreateWorkoutSession;
use ironquest_db::repositories::{CharacterRepo, WorkoutRepo};
use serde::{Deserialize, Serialize};

use super::character::persist_stats;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::{ExerciseNameParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /workouts`.
#[derive(Debug, Deserialize)]
pub struct SaveWorkoutRequest {
    /// Defaults to the time the request is handled. Recorded only; history
    /// is ordered by save.
    #[serde(default)]
    pub performed_at: Option<Timestamp>,
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Serialize)]
pub struct SaveWorkoutResponse {
    pub session: WorkoutSession,
    pub reward: WorkoutReward,
    pub stats: CharacterStats,
    pub levels_gained: u32,
}

/// GET /api/v1/workouts?limit=&offset=
///
/// The user's sessions, most recently saved first.
pub async fn list_workouts(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<WorkoutSession>>>> {
    let sessions =
        WorkoutRepo::list_for_user(&state.pool, user.user_id, params.limit(), params.offset())
            .await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/workouts
///
/// Save a finished session and award its experience. The session insert
/// and the stats update commit together or not at all.
pub async fn save_workout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<SaveWorkoutRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SaveWorkoutResponse>>)> {
    let exercises = prepare_exercises(input.exercises)?;
    let reward = compute_reward(&exercises);

    let mut tx = state.pool.begin().await?;

    let stored = CharacterRepo::get_or_default(&mut *tx, user.user_id).await?;
    let stats = stored.stats.apply_experience(reward.gained_exp);

    let session = WorkoutRepo::create(
        &mut *tx,
        &CreateWorkoutSession {
            user_id: user.user_id,
            performed_at: input.performed_at.unwrap_or_else(Utc::now),
            exercises,
            gained_exp: reward.gained_exp,
        },
    )
    .await?;

    persist_stats(&mut tx, user.user_id, &stats, stored.version).await?;
    tx.commit().await?;

    let gained_levels = levels_gained(&stored.stats, &stats);
    tracing::info!(
        user_id = user.user_id,
        session_id = session.id,
        gained_exp = reward.gained_exp,
        completed_sets = reward.completed_sets,
        "Workout saved",
    );
    if gained_levels > 0 {
        tracing::info!(user_id = user.user_id, level = stats.level, "Level up");
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SaveWorkoutResponse {
                session,
                reward,
                stats,
                levels_gained: gained_levels,
            },
        }),
    ))
}

/// GET /api/v1/workouts/dashboard
///
/// Volume and max-weight series over the user's whole history.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let history = WorkoutRepo::list_all_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: summarize(&history),
    }))
}

/// GET /api/v1/workouts/suggestions
///
/// Exercise names for autocomplete, drawn from the user's history. Users
/// with no history get the default catalogue.
pub async fn suggestions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let history = WorkoutRepo::list_all_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: exercise_suggestions(&history),
    }))
}

/// GET /api/v1/workouts/previous-sets?exercise=
///
/// The sets from the most recent session containing the exercise, or
/// `null` if the user has never logged it.
pub async fn previous_exercise_sets(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ExerciseNameParams>,
) -> AppResult<Json<DataResponse<Option<Vec<WorkoutSet>>>>> {
    let history = WorkoutRepo::list_all_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: previous_sets(&history, &params.exercise),
    }))
}
