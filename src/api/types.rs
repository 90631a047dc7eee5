//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::models::AssessmentResponses;
use crate::models::ConversationTurn;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error with an HTTP status. Validation problems carry a
/// field-level message; internal failures surface a generic one (details go
/// to the server log).
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<crate::AnimoaError> for ApiError {
    fn from(e: crate::AnimoaError) -> Self {
        tracing::error!("Request failed: {e}");
        Self::Internal("Internal server error".to_string())
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Chat request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Feedback submission for a bot message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub session_id: Uuid,
    pub feedback_emoji: String,
    pub message_index: i32,
}

/// New chat session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Session rename request
#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub title: String,
}

/// Date-range query for mood entries
#[derive(Debug, Deserialize)]
pub struct MoodRangeQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Mood upsert request. The mood value is validated against the mood enum in
/// the handler so a bad value comes back as a field-level 400.
#[derive(Debug, Deserialize)]
pub struct MoodUpsertRequest {
    pub date: NaiveDate,
    pub mood: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Assessment creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCreateRequest {
    pub responses: AssessmentResponses,
    #[serde(default)]
    pub include_chat_history: bool,
}

/// Wellness report request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    pub assessment_id: Uuid,
}
