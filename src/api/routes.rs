//! API route definitions

use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::auth;
use super::auth::TokenValidator;
use super::handlers;
use super::handlers::AppState;

/// Create the RESTful API router. Everything except the health check sits
/// behind the bearer-token middleware.
pub fn api_routes(state: AppState, validator: TokenValidator) -> Router {
    let protected = Router::new()
        // Chat
        .route("/chat", post(handlers::chat))
        .route("/feedback", post(handlers::submit_feedback))
        // Sessions
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/:id",
            delete(handlers::delete_session).patch(handlers::rename_session),
        )
        .route("/sessions/:id/messages", get(handlers::list_messages))
        // Mood tracking
        .route("/mood", get(handlers::list_moods).post(handlers::upsert_mood))
        .route("/mood/:id", delete(handlers::delete_mood))
        // Assessments
        .route(
            "/assessments",
            get(handlers::list_assessments).post(handlers::create_assessment),
        )
        .route(
            "/assessments/:id",
            get(handlers::get_assessment).delete(handlers::delete_assessment),
        )
        .route("/pdf", post(handlers::export_pdf))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .layer(middleware::from_fn_with_state(
            validator,
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
}
