use uuid::Uuid;

use super::Database;
use crate::models::Profile;
use crate::models::ProfileUpdate;
use crate::Result;

impl Database {
    /// Get a user's profile
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(profile)
    }

    /// Apply a partial profile update, writing only the fields that are set.
    /// Returns the updated row.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                age = COALESCE($3, age),
                stress_level = COALESCE($4, stress_level),
                goals = COALESCE($5, goals),
                interests = COALESCE($6, interests)
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(update.full_name)
        .bind(update.age)
        .bind(update.stress_level)
        .bind(update.goals)
        .bind(update.interests)
        .fetch_optional(self.pool())
        .await?;

        Ok(profile)
    }
}
