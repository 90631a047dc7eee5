use super::Database;
use crate::Result;

impl Database {
    /// Check if database schema is initialized
    /// Returns true if all required tables exist
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        let required_tables = vec![
            "profiles",
            "chat_sessions",
            "chat_history",
            "mood_logs",
            "questionnaire_responses",
            "knowledge_base",
        ];

        for table_name in required_tables {
            let result = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = $1
                )
                ",
            )
            .bind(table_name)
            .fetch_one(self.pool())
            .await?;

            if !result {
                tracing::debug!("Missing required table: {}", table_name);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        // pgvector extension for knowledge-base similarity search
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(self.pool())
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL,
                full_name TEXT,
                age INTEGER,
                stress_level TEXT,
                goals TEXT,
                interests TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_sessions (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                title TEXT NOT NULL DEFAULT 'New Chat',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_history (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                session_id UUID NOT NULL REFERENCES chat_sessions(id),
                message TEXT NOT NULL,
                sender TEXT NOT NULL CHECK (sender IN ('user', 'bot', 'feedback')),
                feedback_for_message_index INTEGER,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_history_session
             ON chat_history (session_id, timestamp)",
        )
        .execute(self.pool())
        .await?;

        // One feedback row per (session, message index); the feedback upsert
        // relies on this for its ON CONFLICT target
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_chat_history_feedback
             ON chat_history (session_id, feedback_for_message_index)
             WHERE sender = 'feedback'",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS mood_logs (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                date DATE NOT NULL,
                mood TEXT NOT NULL CHECK
                    (mood IN ('very_happy', 'happy', 'neutral', 'sad', 'very_sad')),
                note TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (user_id, date)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS questionnaire_responses (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL,
                responses JSONB NOT NULL,
                recommendations TEXT,
                used_chat_history BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS knowledge_base (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                category TEXT NOT NULL,
                subcategory TEXT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{}',
                severity_relevance TEXT[] NOT NULL DEFAULT '{}',
                assessment_domains TEXT[] NOT NULL DEFAULT '{}',
                source TEXT,
                embedding vector(384)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_knowledge_base_embedding
             ON knowledge_base USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
        )
        .execute(self.pool())
        .await?;

        tracing::info!("Database schema initialized");
        Ok(())
    }
}
