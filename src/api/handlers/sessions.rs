//! Chat session handlers

use axum::extract::Extension;
use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::CreateSessionRequest;
use crate::api::types::RenameSessionRequest;
use crate::models::ChatMessage;
use crate::models::ChatSession;

/// GET /api/sessions - list the caller's chat sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Vec<ChatSession>>>, ApiError> {
    let sessions = state.database.list_sessions(auth.user_id).await?;
    Ok(Json(ApiResponse::success(sessions)))
}

/// POST /api/sessions - create a new chat session
pub async fn create_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<ChatSession>>, ApiError> {
    let title = req.title.as_deref().unwrap_or("New Chat");
    let session = state.database.create_session(auth.user_id, title).await?;

    info!("Created session {} for user {}", session.id, auth.user_id);
    Ok(Json(ApiResponse::success(session)))
}

/// PATCH /api/sessions/:id - rename a session
pub async fn rename_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let renamed = state
        .database
        .rename_session(auth.user_id, session_id, &req.title)
        .await?;

    if renamed {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::NotFound("Session not found".to_string()))
    }
}

/// DELETE /api/sessions/:id - delete a session and its messages
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .database
        .delete_session(auth.user_id, session_id)
        .await?;

    if deleted {
        info!("Deleted session {} for user {}", session_id, auth.user_id);
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::NotFound("Session not found".to_string()))
    }
}

/// GET /api/sessions/:id/messages - load a session's message log
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let messages = state
        .database
        .list_messages(auth.user_id, session_id)
        .await?;
    Ok(Json(ApiResponse::success(messages)))
}
