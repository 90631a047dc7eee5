/// API request handlers
use std::sync::Arc;

use axum::Json;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::chat::ChatService;
use crate::database::Database;
use crate::llm::CompletionClient;
use crate::rag::KnowledgeRetriever;

// Re-export sub-modules
pub mod assessment;
pub mod chat;
pub mod feedback;
pub mod mood;
pub mod profile;
pub mod sessions;

// Re-export handlers
pub use assessment::*;
pub use chat::*;
pub use feedback::*;
pub use mood::*;
pub use profile::*;
pub use sessions::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub retriever: Arc<KnowledgeRetriever>,
    pub llm: Arc<CompletionClient>,
    pub chat_service: Arc<ChatService>,
    pub similarity_threshold: f32,
    pub match_count: usize,
}

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
