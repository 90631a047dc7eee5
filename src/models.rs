//! Domain models shared across the API, database and pipeline layers

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A user profile row. Owned by the profile endpoints; the chat pipeline only
/// reads the personalization subset (name, stress level, goals, interests).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub stress_level: Option<String>,
    pub goals: Option<String>,
    pub interests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update; only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub stress_level: Option<String>,
    pub goals: Option<String>,
    pub interests: Option<String>,
}

/// Accepted values for `Profile::stress_level`
pub const VALID_STRESS_LEVELS: [&str; 4] = ["Low", "Moderate", "High", "Very High"];

/// A titled conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Who wrote a persisted chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    Feedback,
}

/// A persisted chat message. The `feedback` variant reuses the `message`
/// column for the emoji and is keyed by `feedback_for_message_index`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub message: String,
    pub sender: Sender,
    pub feedback_for_message_index: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// Role of a client-replayed conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of client-supplied conversation history. Ephemeral; the
/// authoritative record is the persisted message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

/// Daily mood rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MoodType {
    VeryHappy,
    Happy,
    Neutral,
    Sad,
    VerySad,
}

impl std::str::FromStr for MoodType {
    type Err = crate::AnimoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_happy" => Ok(Self::VeryHappy),
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "sad" => Ok(Self::Sad),
            "very_sad" => Ok(Self::VerySad),
            other => Err(crate::AnimoaError::Validation(format!(
                "Invalid mood type: {other}"
            ))),
        }
    }
}

/// One mood entry per user per calendar date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mood: MoodType,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw self-assessment answers (PHQ-2 and GAD-2 frequency answers plus
/// sleep, support and free-text coping)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponses {
    pub mood: String,
    pub interest: String,
    pub anxiety: String,
    pub worry: String,
    pub sleep: String,
    pub support: String,
    #[serde(default)]
    pub coping: Option<String>,
}

/// A stored assessment with its generated recommendations
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub responses: sqlx::types::Json<AssessmentResponses>,
    pub recommendations: Option<String>,
    pub used_chat_history: bool,
    pub created_at: DateTime<Utc>,
}

/// A knowledge-base entry ranked by similarity to a query. Produced
/// transiently per retrieval; never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeSnippet {
    pub id: Uuid,
    pub category: String,
    pub subcategory: Option<String>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub severity_relevance: Vec<String>,
    pub assessment_domains: Vec<String>,
    pub source: Option<String>,
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_serde_lowercase() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(turn.role, TurnRole::Assistant);

        let json = serde_json::to_string(&ConversationTurn {
            role: TurnRole::User,
            content: "hello".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn test_mood_type_serde_snake_case() {
        let mood: MoodType = serde_json::from_str(r#""very_happy""#).unwrap();
        assert_eq!(mood, MoodType::VeryHappy);
        assert!(serde_json::from_str::<MoodType>(r#""ecstatic""#).is_err());
    }

    #[test]
    fn test_assessment_responses_optional_coping() {
        let responses: AssessmentResponses = serde_json::from_str(
            r#"{"mood":"not_at_all","interest":"several_days","anxiety":"not_at_all",
                "worry":"not_at_all","sleep":"good","support":"strong"}"#,
        )
        .unwrap();
        assert!(responses.coping.is_none());
    }
}
