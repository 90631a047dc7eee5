use chrono::NaiveDate;
use uuid::Uuid;

use super::Database;
use crate::models::MoodEntry;
use crate::models::MoodType;
use crate::Result;

impl Database {
    /// List mood entries for a user, newest first, optionally bounded by a
    /// date range
    pub async fn list_moods(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<MoodEntry>> {
        let moods = sqlx::query_as::<_, MoodEntry>(
            r"
            SELECT * FROM mood_logs
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date DESC
            ",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        Ok(moods)
    }

    /// Create or replace the mood entry for a calendar date. One entry per
    /// user per date, enforced by the unique constraint.
    pub async fn upsert_mood(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        mood: MoodType,
        note: Option<&str>,
    ) -> Result<MoodEntry> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r"
            INSERT INTO mood_logs (user_id, date, mood, note)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, date)
            DO UPDATE SET mood = EXCLUDED.mood, note = EXCLUDED.note
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(date)
        .bind(mood)
        .bind(note)
        .fetch_one(self.pool())
        .await?;

        Ok(entry)
    }

    /// Delete a mood entry by id
    pub async fn delete_mood(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mood_logs WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
