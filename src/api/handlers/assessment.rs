//! Assessment handlers: questionnaire CRUD, recommendation generation and
//! the PDF report export

use axum::extract::Extension;
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::AssessmentCreateRequest;
use crate::api::types::PdfRequest;
use crate::assessment::format_chat_context;
use crate::assessment::RecommendationService;
use crate::models::Assessment;
use crate::pdf::generate_wellness_report;

/// How many recent messages are folded into the prompt when the caller asks
/// for chat context
const CHAT_CONTEXT_MESSAGES: i64 = 20;

/// GET /api/assessments - list the caller's assessments
pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Vec<Assessment>>>, ApiError> {
    let assessments = state.database.list_assessments(auth.user_id).await?;
    Ok(Json(ApiResponse::success(assessments)))
}

/// POST /api/assessments - store a questionnaire and generate
/// recommendations for it
pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<AssessmentCreateRequest>,
) -> Result<Json<ApiResponse<Assessment>>, ApiError> {
    info!(
        "POST /api/assessments: include_chat_history={}",
        req.include_chat_history
    );

    let profile = state.database.get_profile(auth.user_id).await?;

    let chat_context = if req.include_chat_history {
        let recent = state
            .database
            .recent_conversation(auth.user_id, CHAT_CONTEXT_MESSAGES)
            .await?;
        format_chat_context(&recent)
    } else {
        String::new()
    };

    let service = RecommendationService::new(
        &state.retriever,
        &state.llm,
        state.similarity_threshold,
        state.match_count,
    );
    let recommendations = service
        .generate(&req.responses, profile.as_ref(), &chat_context)
        .await;

    let assessment = state
        .database
        .insert_assessment(
            auth.user_id,
            &req.responses,
            &recommendations,
            req.include_chat_history,
        )
        .await?;

    Ok(Json(ApiResponse::success(assessment)))
}

/// GET /api/assessments/:id - fetch one assessment
pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Assessment>>, ApiError> {
    let assessment = state
        .database
        .get_assessment(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;

    Ok(Json(ApiResponse::success(assessment)))
}

/// DELETE /api/assessments/:id - delete an assessment
pub async fn delete_assessment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state.database.delete_assessment(auth.user_id, id).await?;

    if deleted {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::NotFound("Assessment not found".to_string()))
    }
}

/// POST /api/pdf - render an assessment's wellness report as a PDF download
pub async fn export_pdf(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<PdfRequest>,
) -> Result<Response, ApiError> {
    let assessment = state
        .database
        .get_assessment(auth.user_id, req.assessment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;

    let profile = state.database.get_profile(auth.user_id).await?;

    let pdf_bytes = generate_wellness_report(&assessment, profile.as_ref())?;

    let id_prefix: String = assessment.id.to_string().chars().take(8).collect();
    let disposition = format!("attachment; filename=\"animoa-wellness-report-{id_prefix}.pdf\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf_bytes,
    )
        .into_response())
}
