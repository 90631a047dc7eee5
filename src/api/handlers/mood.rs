//! Mood tracking handlers

use std::str::FromStr;

use axum::extract::Extension;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::MoodRangeQuery;
use crate::api::types::MoodUpsertRequest;
use crate::models::MoodEntry;
use crate::models::MoodType;

/// GET /api/mood - list mood entries, optionally bounded by ?start and ?end
pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(range): Query<MoodRangeQuery>,
) -> Result<Json<ApiResponse<Vec<MoodEntry>>>, ApiError> {
    let moods = state
        .database
        .list_moods(auth.user_id, range.start, range.end)
        .await?;
    Ok(Json(ApiResponse::success(moods)))
}

/// POST /api/mood - create or replace the mood entry for a date
pub async fn upsert_mood(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<MoodUpsertRequest>,
) -> Result<Json<ApiResponse<MoodEntry>>, ApiError> {
    let mood = MoodType::from_str(&req.mood)
        .map_err(|_| ApiError::BadRequest(format!("Invalid mood type: {}", req.mood)))?;

    let entry = state
        .database
        .upsert_mood(auth.user_id, req.date, mood, req.note.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(entry)))
}

/// DELETE /api/mood/:id - delete a mood entry
pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state.database.delete_mood(auth.user_id, id).await?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::NotFound("Mood entry not found".to_string()))
    }
}
