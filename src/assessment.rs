//! Assessment scoring and recommendation generation
//!
//! Turns PHQ-2/GAD-2 style questionnaire answers into a single non-streaming
//! completion call, primed with knowledge retrieved for the reported
//! symptoms and optionally with recent chat context.

use tracing::error;

use crate::llm::ChatMessage;
use crate::llm::CompletionClient;
use crate::models::AssessmentResponses;
use crate::models::ChatMessage as PersistedMessage;
use crate::models::Profile;
use crate::models::Sender;
use crate::rag::context::build_assessment_query;
use crate::rag::context::relevant_domains;
use crate::rag::format_knowledge_context;
use crate::rag::KnowledgeRetriever;
use crate::rag::RetrieveOptions;

const RECOMMENDATION_MAX_TOKENS: u32 = 1000;
const RECOMMENDATION_TEMPERATURE: f32 = 0.7;

/// Shown instead of recommendations when the completion call fails; the
/// assessment itself is still stored.
const RECOMMENDATIONS_UNAVAILABLE: &str =
    "Unable to generate recommendations at this time. Please try again later.";

/// Human-readable label for a frequency answer (mood, interest, anxiety,
/// worry questions)
pub fn frequency_label(answer: &str) -> &str {
    match answer {
        "not_at_all" => "Not at all",
        "several_days" => "Several days",
        "more_than_half" => "More than half the days",
        "nearly_every_day" => "Nearly every day",
        other => other,
    }
}

/// Human-readable label for a sleep-quality answer
pub fn sleep_label(answer: &str) -> &str {
    match answer {
        "very_good" => "Very good",
        "good" => "Good",
        "fair" => "Fair",
        "poor" => "Poor",
        "very_poor" => "Very poor",
        other => other,
    }
}

/// Human-readable label for a social-support answer
pub fn support_label(answer: &str) -> &str {
    match answer {
        "strong" => "Strong support network",
        "moderate" => "Moderate support",
        "limited" => "Limited support",
        "none" => "Little to no support",
        other => other,
    }
}

fn frequency_score(answer: &str) -> i32 {
    match answer {
        "several_days" => 1,
        "more_than_half" => 2,
        "nearly_every_day" => 3,
        _ => 0,
    }
}

/// PHQ-2 depression screening score (0-6)
pub fn phq2_score(responses: &AssessmentResponses) -> i32 {
    frequency_score(&responses.mood) + frequency_score(&responses.interest)
}

/// GAD-2 anxiety screening score (0-6)
pub fn gad2_score(responses: &AssessmentResponses) -> i32 {
    frequency_score(&responses.anxiety) + frequency_score(&responses.worry)
}

/// System prompt for the recommendation call, with retrieved techniques
/// injected when retrieval found anything
fn system_prompt(knowledge_context: &str) -> String {
    let mut prompt = String::from(
        "You are a compassionate mental wellness advisor. Based on the user's assessment responses,
provide personalized, actionable recommendations. Be warm, supportive, and practical.",
    );

    if !knowledge_context.is_empty() {
        prompt.push_str(
            "\n\nYou have access to curated, evidence-based wellness techniques below. PRIORITIZE \
             recommending specific techniques and exercises from these resources over generic \
             advice. Reference them naturally and explain how to do them step by step.",
        );
        prompt.push_str(knowledge_context);
    }

    prompt.push_str(
        "\n\nStructure your response as follows:
1. **Overall Assessment**: Brief summary of their current state (2-3 sentences)
2. **Key Insights**: What patterns or areas need attention (2-3 bullet points)
3. **Personalized Recommendations**: Specific, actionable suggestions (3-5 items)
4. **Daily Practices**: Simple activities they can start today (2-3 items)
5. **Encouragement**: A supportive closing message

Keep the tone conversational and hopeful. Avoid clinical language like PHQ, GAD, or screening scores.
Remember: This is supportive guidance, not a medical diagnosis.",
    );

    prompt
}

/// Build the user prompt describing the answers, profile and chat context
fn build_user_prompt(
    responses: &AssessmentResponses,
    profile: Option<&Profile>,
    chat_context: &str,
) -> String {
    let mut prompt = format!(
        "Please analyze these assessment responses and provide personalized wellness recommendations:

**PHQ-2 (Depression Screening)**
- Feeling down, depressed, or hopeless: {}
- Little interest or pleasure in doing things: {}

**GAD-2 (Anxiety Screening)**
- Feeling nervous, anxious, or on edge: {}
- Not being able to stop or control worrying: {}

**Additional Factors**
- Sleep quality: {}
- Social support: {}
- Current coping strategies: {}",
        frequency_label(&responses.mood),
        frequency_label(&responses.interest),
        frequency_label(&responses.anxiety),
        frequency_label(&responses.worry),
        sleep_label(&responses.sleep),
        support_label(&responses.support),
        responses.coping.as_deref().unwrap_or("Not specified"),
    );

    if let Some(profile) = profile {
        prompt.push_str("\n\n**User Profile**");
        if let Some(full_name) = &profile.full_name {
            prompt.push_str(&format!("\n- Name: {full_name}"));
        }
        if let Some(age) = profile.age {
            prompt.push_str(&format!("\n- Age: {age}"));
        }
        if let Some(stress_level) = &profile.stress_level {
            prompt.push_str(&format!("\n- Self-reported stress level: {stress_level}"));
        }
        if let Some(goals) = &profile.goals {
            prompt.push_str(&format!("\n- Wellness goals: {goals}"));
        }
        if let Some(interests) = &profile.interests {
            prompt.push_str(&format!("\n- Interests: {interests}"));
        }
    }

    prompt.push_str(chat_context);
    prompt
}

/// Render recent persisted messages into a context block for the prompt
pub fn format_chat_context(messages: &[PersistedMessage]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let conversations = messages
        .iter()
        .map(|m| {
            let speaker = if m.sender == Sender::User {
                "User"
            } else {
                "Animoa"
            };
            format!("{speaker}: {}", m.message)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n\nRecent conversation context:\n{conversations}")
}

/// Recommendation generator combining retrieval and the completion API
pub struct RecommendationService<'a> {
    retriever: &'a KnowledgeRetriever,
    llm: &'a CompletionClient,
    similarity_threshold: f32,
    match_count: usize,
}

impl<'a> RecommendationService<'a> {
    pub fn new(
        retriever: &'a KnowledgeRetriever,
        llm: &'a CompletionClient,
        similarity_threshold: f32,
        match_count: usize,
    ) -> Self {
        Self {
            retriever,
            llm,
            similarity_threshold,
            match_count,
        }
    }

    /// Generate recommendations text for a set of responses.
    ///
    /// Retrieval failures degrade to a context-free prompt; a completion
    /// failure degrades to a fixed apology string so the assessment record
    /// can still be stored.
    pub async fn generate(
        &self,
        responses: &AssessmentResponses,
        profile: Option<&Profile>,
        chat_context: &str,
    ) -> String {
        let query = build_assessment_query(responses);
        let snippets = self
            .retriever
            .retrieve(
                &query,
                &RetrieveOptions {
                    match_count: self.match_count,
                    domains: Some(relevant_domains(responses)),
                    similarity_threshold: self.similarity_threshold,
                    ..RetrieveOptions::default()
                },
            )
            .await;
        let knowledge_context = format_knowledge_context(&snippets);

        let messages = vec![
            ChatMessage::system(system_prompt(&knowledge_context)),
            ChatMessage::user(build_user_prompt(responses, profile, chat_context)),
        ];

        match self
            .llm
            .complete(&messages, RECOMMENDATION_TEMPERATURE, RECOMMENDATION_MAX_TOKENS)
            .await
        {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!("Recommendation generation failed: {e}");
                RECOMMENDATIONS_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses() -> AssessmentResponses {
        AssessmentResponses {
            mood: "several_days".to_string(),
            interest: "not_at_all".to_string(),
            anxiety: "nearly_every_day".to_string(),
            worry: "more_than_half".to_string(),
            sleep: "poor".to_string(),
            support: "limited".to_string(),
            coping: Some("long walks".to_string()),
        }
    }

    #[test]
    fn test_scores() {
        let responses = responses();
        assert_eq!(phq2_score(&responses), 1);
        assert_eq!(gad2_score(&responses), 5);
    }

    #[test]
    fn test_scores_unknown_answers_count_zero() {
        let mut responses = responses();
        responses.mood = "sometimes".to_string();
        responses.interest = "not_at_all".to_string();
        assert_eq!(phq2_score(&responses), 0);
    }

    #[test]
    fn test_user_prompt_labels_answers() {
        let prompt = build_user_prompt(&responses(), None, "");
        assert!(prompt.contains("Feeling down, depressed, or hopeless: Several days"));
        assert!(prompt.contains("Sleep quality: Poor"));
        assert!(prompt.contains("Social support: Limited support"));
        assert!(prompt.contains("Current coping strategies: long walks"));
        assert!(!prompt.contains("**User Profile**"));
    }

    #[test]
    fn test_system_prompt_includes_context_when_present() {
        let plain = system_prompt("");
        assert!(!plain.contains("curated, evidence-based wellness techniques"));

        let primed = system_prompt("\n\n---\n[1] Grounding\nName five things you can see\n---");
        assert!(primed.contains("curated, evidence-based wellness techniques"));
        assert!(primed.contains("Grounding"));
    }
}
