//! Handlers for the `/coach` resource: a per-user chat with the AI coach.

use axum::extract::State;
use axum::Json;
use ironquest_coach::{CoachReply, Conversation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /coach/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub conversation_id: Uuid,
}

/// GET /api/v1/coach/conversation
///
/// The caller's current transcript. Starts an empty one if none exists.
pub async fn get_conversation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Conversation>>> {
    let conversation = state.conversations.snapshot(user.user_id).await;
    Ok(Json(DataResponse { data: conversation }))
}

/// POST /api/v1/coach/messages
///
/// Send a message and wait for the coach's reply. A provider failure
/// resets the conversation and maps to 502.
pub async fn send_message(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<DataResponse<CoachReply>>> {
    let reply = state
        .conversations
        .send(
            user.user_id,
            state.coach.as_ref(),
            &state.config.coach.system_prompt,
            &input.text,
        )
        .await?;
    Ok(Json(DataResponse { data: reply }))
}

/// DELETE /api/v1/coach/conversation
///
/// Discard the transcript and start over.
pub async fn reset_conversation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<ResetResponse>>> {
    let conversation_id = state.conversations.reset(user.user_id).await;
    tracing::debug!(user_id = user.user_id, %conversation_id, "Coach conversation reset");
    Ok(Json(DataResponse {
        data: ResetResponse { conversation_id },
    }))
}
