//! Streaming chat handler

use std::convert::Infallible;

use axum::extract::Extension;
use axum::extract::State;
use axum::response::sse::Event;
use axum::response::sse::Sse;
use axum::Json;
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::auth::AuthContext;
use crate::api::types::ApiError;
use crate::api::types::ChatRequest;
use crate::chat::pipeline::ChatTurn;

/// POST /api/chat - stream one companion reply as server-sent events
pub async fn chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    info!(
        "POST /api/chat: session={:?}, {} history turns",
        req.session_id,
        req.conversation_history.len()
    );

    // Profile lookup is best-effort personalization; a missing row just
    // means an unpersonalized prompt
    let profile = state.database.get_profile(auth.user_id).await?;

    let turn = ChatTurn {
        user_id: auth.user_id,
        session_id: req.session_id,
        history: req.conversation_history,
        message: req.message,
    };

    let chunks = state
        .chat_service
        .stream_turn(profile.as_ref(), turn)
        .await
        .map_err(|e| {
            error!("Chat turn failed before streaming: {e}");
            ApiError::Internal("Failed to generate response".to_string())
        })?;

    let stream = chunks.map(|chunk| {
        let event = match serde_json::to_string(&chunk) {
            Ok(json) => Event::default().data(json),
            Err(e) => {
                error!("Failed to encode stream chunk: {e}");
                Event::default().data(r#"{"error":"Streaming failed"}"#)
            }
        };
        Ok(event)
    });

    Ok(Sse::new(stream))
}
