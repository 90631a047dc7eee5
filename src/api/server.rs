//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::auth::TokenValidator;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::llm::CompletionClient;
use crate::rag::KnowledgeRetriever;
use crate::Result;

/// Start the API server
pub async fn serve_api(config: &AppConfig) -> Result<()> {
    info!("Starting Animoa API server...");

    // Initialize services
    let database = Arc::new(Database::from_config(config).await?);
    let embeddings = Arc::new(EmbeddingClient::from_config(config)?);
    let retriever = Arc::new(KnowledgeRetriever::new(database.clone(), embeddings));
    let llm = Arc::new(CompletionClient::from_config(config)?);
    let chat_service = Arc::new(ChatService::from_services(
        retriever.clone(),
        llm.clone(),
        database.clone(),
        config,
    ));

    let state = AppState {
        database,
        retriever,
        llm,
        chat_service,
        similarity_threshold: config.rag_similarity_threshold(),
        match_count: config.rag_match_count(),
    };

    let validator = TokenValidator::new(config.jwt_secret());
    let api_router = routes::api_routes(state, validator);

    let mut app = Router::new().nest("/api", api_router);

    // Add middleware layers
    app = app
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if config.cors_enabled() {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Start server
    let addr = format!("{}:{}", config.server_host(), config.server_port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET    /api/health                 - Health check");
    info!("  POST   /api/chat                   - Streaming companion chat (SSE)");
    info!("  POST   /api/feedback               - Message feedback");
    info!("  GET    /api/sessions               - List chat sessions");
    info!("  POST   /api/sessions               - Create chat session");
    info!("  PATCH  /api/sessions/:id           - Rename session");
    info!("  DELETE /api/sessions/:id           - Delete session");
    info!("  GET    /api/sessions/:id/messages  - Session message log");
    info!("  GET    /api/mood                   - List mood entries");
    info!("  POST   /api/mood                   - Upsert mood for a date");
    info!("  DELETE /api/mood/:id               - Delete mood entry");
    info!("  GET    /api/assessments            - List assessments");
    info!("  POST   /api/assessments            - Create assessment");
    info!("  GET    /api/assessments/:id        - Get assessment");
    info!("  DELETE /api/assessments/:id        - Delete assessment");
    info!("  POST   /api/pdf                    - Wellness report PDF");
    info!("  GET    /api/profile                - Get profile");
    info!("  PUT    /api/profile                - Update profile");

    axum::serve(listener, app).await?;

    Ok(())
}
