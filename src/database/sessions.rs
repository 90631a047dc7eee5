use uuid::Uuid;

use super::Database;
use crate::models::ChatMessage;
use crate::models::ChatSession;
use crate::models::Sender;
use crate::Result;

impl Database {
    /// List a user's chat sessions, newest first
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<ChatSession>> {
        let sessions = sqlx::query_as::<_, ChatSession>(
            "SELECT * FROM chat_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(sessions)
    }

    /// Create a new chat session
    pub async fn create_session(&self, user_id: Uuid, title: &str) -> Result<ChatSession> {
        let session = sqlx::query_as::<_, ChatSession>(
            "INSERT INTO chat_sessions (user_id, title) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(self.pool())
        .await?;

        Ok(session)
    }

    /// Update a session's title. Returns false if the session does not exist
    /// or belongs to another user.
    pub async fn rename_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        title: &str,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE chat_sessions SET title = $3 WHERE id = $2 AND user_id = $1")
                .bind(user_id)
                .bind(session_id)
                .bind(title)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a session and its messages. Messages go first because of the
    /// foreign key constraint.
    pub async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> Result<bool> {
        sqlx::query("DELETE FROM chat_history WHERE session_id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(session_id)
            .execute(self.pool())
            .await?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(session_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load a session's message log in chronological order
    pub async fn list_messages(&self, user_id: Uuid, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_history WHERE session_id = $2 AND user_id = $1
             ORDER BY timestamp ASC",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_all(self.pool())
        .await?;

        Ok(messages)
    }

    /// Append a message to a session's log
    pub async fn insert_message(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        message: &str,
        sender: Sender,
    ) -> Result<ChatMessage> {
        let message = sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_history (user_id, session_id, message, sender)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(message)
        .bind(sender)
        .fetch_one(self.pool())
        .await?;

        Ok(message)
    }

    /// Count the `user`-sender messages already stored for a session
    pub async fn count_user_messages(&self, session_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM chat_history WHERE session_id = $1 AND sender = 'user'",
        )
        .bind(session_id)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    /// Store feedback for a bot message, atomically replacing any previous
    /// feedback for the same message index. Relies on the partial unique
    /// index on (session_id, feedback_for_message_index).
    pub async fn upsert_feedback(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        message_index: i32,
        feedback_emoji: &str,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO chat_history
                (user_id, session_id, message, sender, feedback_for_message_index)
            VALUES ($1, $2, $3, 'feedback', $4)
            ON CONFLICT (session_id, feedback_for_message_index) WHERE sender = 'feedback'
            DO UPDATE SET message = EXCLUDED.message
            ",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(feedback_emoji)
        .bind(message_index)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch the most recent user/bot messages for a user across sessions,
    /// oldest first, for assessment context
    pub async fn recent_conversation(&self, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        let mut messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_history
             WHERE user_id = $1 AND sender IN ('user', 'bot')
             ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        messages.reverse();
        Ok(messages)
    }
}
