//! Profile handlers

use axum::extract::Extension;
use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::models::Profile;
use crate::models::ProfileUpdate;
use crate::models::VALID_STRESS_LEVELS;

/// GET /api/profile - fetch the caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state
        .database
        .get_profile(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /api/profile - partially update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    if let Some(age) = update.age {
        if !(13..=120).contains(&age) {
            return Err(ApiError::BadRequest(
                "Age must be between 13 and 120".to_string(),
            ));
        }
    }

    if let Some(stress_level) = &update.stress_level {
        if !VALID_STRESS_LEVELS.contains(&stress_level.as_str()) {
            return Err(ApiError::BadRequest("Invalid stress level".to_string()));
        }
    }

    let profile = state
        .database
        .update_profile(auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ApiResponse::success(profile)))
}
