//! Handlers for the `/character` resource (stats and attribute upgrades).

use axum::extract::State;
use axum::Json;
use ironquest_core::error::CoreError;
use ironquest_core::progression::{Attribute, CharacterStats};
use ironquest_core::types::DbId;
use ironquest_db::repositories::CharacterRepo;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /character/upgrade`.
#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    /// One of `strength`, `agility`, `stamina`, `intelligence`.
    pub attribute: String,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub stats: CharacterStats,
    /// `false` when the user had no skill points; nothing was written.
    pub upgraded: bool,
}

/// GET /api/v1/character
///
/// Return the user's character sheet. Users who have never earned anything
/// get the starting sheet.
pub async fn get_character(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<CharacterStats>>> {
    let stored = CharacterRepo::get_or_default(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: stored.stats }))
}

/// POST /api/v1/character/upgrade
///
/// Spend one skill point on an attribute.
pub async fn upgrade_attribute(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<UpgradeRequest>,
) -> AppResult<Json<DataResponse<UpgradeResponse>>> {
    let attribute: Attribute = input.attribute.parse()?;

    let mut tx = state.pool.begin().await?;
    let stored = CharacterRepo::get_or_default(&mut *tx, user.user_id).await?;

    let Some(stats) = stored.stats.upgrade_attribute(attribute) else {
        return Ok(Json(DataResponse {
            data: UpgradeResponse {
                stats: stored.stats,
                upgraded: false,
            },
        }));
    };

    persist_stats(&mut tx, user.user_id, &stats, stored.version).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = user.user_id,
        attribute = %attribute,
        value = stats.attribute(attribute),
        "Attribute upgraded",
    );

    Ok(Json(DataResponse {
        data: UpgradeResponse {
            stats,
            upgraded: true,
        },
    }))
}

/// Write `stats` inside `tx`, failing with 409 if another request changed
/// the sheet since it was read at `expected_version`.
pub(crate) async fn persist_stats(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: DbId,
    stats: &CharacterStats,
    expected_version: Option<i64>,
) -> AppResult<()> {
    if CharacterRepo::save(&mut **tx, user_id, stats, expected_version).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Conflict(
            "Character was modified by another request. Retry.".into(),
        )))
    }
}
