//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::Json;
use ironquest_core::account::ensure_bannable;
use ironquest_core::error::CoreError;
use ironquest_core::types::DbId;
use ironquest_db::models::user::UserResponse;
use ironquest_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
///
/// Every account, oldest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/users/{id}/toggle-ban
///
/// Flip a user's ban flag. Admin accounts cannot be banned.
pub async fn toggle_ban(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    ensure_bannable(&target.role)?;

    let updated = UserRepo::set_banned(&state.pool, id, !target.is_banned)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        is_banned = updated.is_banned,
        "User ban toggled",
    );

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}
