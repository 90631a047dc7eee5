//! Post-turn persistence hooks
//!
//! Invoked as a detached task after the terminal stream chunk has been
//! queued. Failures here are logged and dropped; the reply has already been
//! delivered and storage problems must not surface into it. No retry is
//! attempted, so a caller that re-sends a turn after a partial failure may
//! duplicate message rows.

use std::sync::Arc;

use tracing::error;
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::models::Sender;
use crate::Result;

/// Maximum auto-title length derived from a session's first message
const TITLE_MAX_CHARS: usize = 40;

/// Derive a session title from its first user message
pub fn derive_session_title(message: &str) -> String {
    if message.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        message.to_string()
    }
}

/// Persist a completed turn: the user message, the assistant reply, and a
/// one-time session title derived from the first user message.
pub async fn on_turn_complete(
    database: Arc<Database>,
    session_id: Uuid,
    user_id: Uuid,
    user_message: String,
    assistant_reply: String,
) {
    if let Err(e) = persist_turn(
        &database,
        session_id,
        user_id,
        &user_message,
        &assistant_reply,
    )
    .await
    {
        error!("Failed to persist chat turn for session {session_id}: {e}");
    }
}

async fn persist_turn(
    database: &Database,
    session_id: Uuid,
    user_id: Uuid,
    user_message: &str,
    assistant_reply: &str,
) -> Result<()> {
    database
        .insert_message(user_id, session_id, user_message, Sender::User)
        .await?;
    database
        .insert_message(user_id, session_id, assistant_reply, Sender::Bot)
        .await?;

    // First user message in the session names it; later turns never rename
    let user_count = database.count_user_messages(session_id).await?;
    if user_count == 1 {
        let title = derive_session_title(user_message);
        database
            .rename_session(user_id, session_id, &title)
            .await?;
        info!("Auto-titled session {session_id}: {title}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_title_verbatim() {
        assert_eq!(derive_session_title("hello"), "hello");
    }

    #[test]
    fn test_exactly_forty_chars_not_truncated() {
        let message = "a".repeat(40);
        assert_eq!(derive_session_title(&message), message);
    }

    #[test]
    fn test_long_message_truncated_with_ellipsis() {
        let message = "a".repeat(41);
        let title = derive_session_title(&message);
        assert_eq!(title.chars().count(), 43);
        assert!(title.ends_with("..."));
        assert!(title.starts_with(&"a".repeat(40)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let message = "ё".repeat(50);
        let title = derive_session_title(&message);
        assert!(title.starts_with(&"ё".repeat(40)));
        assert!(title.ends_with("..."));
    }
}
