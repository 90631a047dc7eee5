use uuid::Uuid;

use super::Database;
use crate::models::Assessment;
use crate::models::AssessmentResponses;
use crate::Result;

impl Database {
    /// List a user's assessments, newest first
    pub async fn list_assessments(&self, user_id: Uuid) -> Result<Vec<Assessment>> {
        let assessments = sqlx::query_as::<_, Assessment>(
            "SELECT * FROM questionnaire_responses WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(assessments)
    }

    /// Get a single assessment by id
    pub async fn get_assessment(&self, user_id: Uuid, id: Uuid) -> Result<Option<Assessment>> {
        let assessment = sqlx::query_as::<_, Assessment>(
            "SELECT * FROM questionnaire_responses WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(assessment)
    }

    /// Persist an assessment together with its generated recommendations
    pub async fn insert_assessment(
        &self,
        user_id: Uuid,
        responses: &AssessmentResponses,
        recommendations: &str,
        used_chat_history: bool,
    ) -> Result<Assessment> {
        let assessment = sqlx::query_as::<_, Assessment>(
            r"
            INSERT INTO questionnaire_responses
                (user_id, responses, recommendations, used_chat_history)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(sqlx::types::Json(responses))
        .bind(recommendations)
        .bind(used_chat_history)
        .fetch_one(self.pool())
        .await?;

        Ok(assessment)
    }

    /// Delete an assessment by id
    pub async fn delete_assessment(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM questionnaire_responses WHERE id = $2 AND user_id = $1")
                .bind(user_id)
                .bind(id)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
