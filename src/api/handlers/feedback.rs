//! Message feedback handler

use axum::extract::Extension;
use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::FeedbackRequest;

/// POST /api/feedback - record feedback for a bot message. Resubmitting for
/// the same message replaces the stored emoji.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if req.feedback_emoji.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Feedback emoji is required".to_string(),
        ));
    }
    if req.message_index < 0 {
        return Err(ApiError::BadRequest(
            "Message index must be non-negative".to_string(),
        ));
    }

    state
        .database
        .upsert_feedback(
            auth.user_id,
            req.session_id,
            req.message_index,
            &req.feedback_emoji,
        )
        .await?;

    Ok(Json(ApiResponse::success(())))
}
