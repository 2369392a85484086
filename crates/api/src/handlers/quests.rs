//! Handlers for the `/quests` resource.
//!
//! Any user can list and complete quests; creating and deleting them
//! requires the `admin` role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ironquest_core::error::CoreError;
use ironquest_core::progression::{levels_gained, CharacterStats};
use ironquest_core::quest::{validate_new_quest, QuestType};
use ironquest_core::types::DbId;
use ironquest_db::models::quest::{CreateQuest, QuestWithStatus};
use ironquest_db::repositories::{CharacterRepo, QuestRepo};
use serde::{Deserialize, Serialize};

use super::character::persist_stats;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Request body for `POST /quests`.
#[derive(Debug, Deserialize)]
pub struct CreateQuestRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reward_exp: u32,
    pub reward_points: u32,
    /// `daily`, `weekly` or `achievement`.
    #[serde(rename = "type")]
    pub quest_type: String,
}

#[derive(Debug, Serialize)]
pub struct CompleteQuestResponse {
    pub quest: QuestWithStatus,
    pub stats: CharacterStats,
    /// `false` when the quest was already completed; no reward was paid.
    pub newly_completed: bool,
    pub levels_gained: u32,
}

/// GET /api/v1/quests
///
/// All quests, newest first, each flagged with the caller's completion.
pub async fn list_quests(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<QuestWithStatus>>>> {
    let quests = QuestRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: quests }))
}

/// POST /api/v1/quests
pub async fn create_quest(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateQuestRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestWithStatus>>)> {
    let quest_type: QuestType = input.quest_type.parse()?;
    validate_new_quest(
        &input.title,
        &input.description,
        input.reward_exp,
        input.reward_points,
    )?;

    let quest = QuestRepo::create(
        &state.pool,
        &CreateQuest {
            title: input.title,
            description: input.description,
            reward_exp: input.reward_exp,
            reward_points: input.reward_points,
            quest_type,
        },
        admin.user_id,
    )
    .await?;

    tracing::info!(quest_id = quest.id, admin_id = admin.user_id, "Quest created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: QuestWithStatus {
                quest,
                is_completed: false,
            },
        }),
    ))
}

/// DELETE /api/v1/quests/{id}
///
/// Completion records for the quest are removed with it.
pub async fn delete_quest(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SuccessResponse>>> {
    if !QuestRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Quest",
            id,
        }));
    }

    tracing::info!(quest_id = id, admin_id = admin.user_id, "Quest deleted");
    Ok(Json(DataResponse {
        data: SuccessResponse { success: true },
    }))
}

/// POST /api/v1/quests/{id}/complete
///
/// Mark the quest completed for the caller and pay its reward. Completing
/// an already-completed quest succeeds without paying again.
pub async fn complete_quest(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompleteQuestResponse>>> {
    let mut tx = state.pool.begin().await?;

    let mut quest = QuestRepo::find_for_user(&mut *tx, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quest",
            id,
        }))?;

    let stored = CharacterRepo::get_or_default(&mut *tx, user.user_id).await?;
    let (status, fired) = quest.status().complete();

    // The insert is the source of truth; a concurrent completion that won
    // the race makes it a no-op.
    let newly_completed = fired && QuestRepo::mark_completed(&mut *tx, user.user_id, id).await?;

    let stats = if newly_completed {
        let stats = quest.quest.reward()?.apply(stored.stats);
        persist_stats(&mut tx, user.user_id, &stats, stored.version).await?;
        stats
    } else {
        stored.stats
    };
    tx.commit().await?;

    quest.is_completed = status.is_completed();
    let gained_levels = levels_gained(&stored.stats, &stats);

    if newly_completed {
        tracing::info!(
            user_id = user.user_id,
            quest_id = id,
            levels_gained = gained_levels,
            "Quest completed",
        );
    }

    Ok(Json(DataResponse {
        data: CompleteQuestResponse {
            quest,
            stats,
            newly_completed,
            levels_gained: gained_levels,
        },
    }))
}
