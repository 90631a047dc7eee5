//! Prompt construction for the companion persona

use crate::models::ConversationTurn;
use crate::models::Profile;
use crate::models::TurnRole;

use super::ChatMessage;

/// Base persona for the chat companion
const BASE_SYSTEM_PROMPT: &str = "You are Animoa, a warm and empathetic wellness companion. Your responses should feel like
talking with a supportive friend who genuinely cares about helping people feel better. Be conversational
and natural - avoid sounding clinical or robotic.

Key approach:
- Be genuinely curious about the person's feelings and experiences
- Respond with warmth, understanding, and gentle encouragement
- Ask thoughtful follow-up questions that help people explore their thoughts
- Keep your responses concise and focused (2-3 sentences is often enough)
- Use a calming, positive tone that makes people feel comfortable sharing

Your goal is to create a safe space for reflection and emotional support through natural conversation.";

/// Build the system prompt, personalized with whichever profile fields are
/// present. Field order is fixed (name, stress level, goals, interests) so
/// prompts are deterministic.
pub fn system_prompt(profile: Option<&Profile>) -> String {
    let mut prompt = BASE_SYSTEM_PROMPT.to_string();

    if let Some(profile) = profile {
        prompt.push_str("\n\nAbout this user:");
        if let Some(full_name) = &profile.full_name {
            prompt.push_str(&format!("\n- Name: {full_name}"));
        }
        if let Some(stress_level) = &profile.stress_level {
            prompt.push_str(&format!("\n- Current stress level: {stress_level}"));
        }
        if let Some(goals) = &profile.goals {
            prompt.push_str(&format!("\n- Mental wellness goals: {goals}"));
        }
        if let Some(interests) = &profile.interests {
            prompt.push_str(&format!("\n- Interests: {interests}"));
        }
        prompt.push_str("\n\nUse this context to provide more personalized support.");
    }

    prompt
}

/// System prompt with retrieved knowledge appended. An empty context adds
/// nothing, so a failed retrieval costs no prompt tokens.
pub fn system_prompt_with_rag(profile: Option<&Profile>, knowledge_context: &str) -> String {
    let mut prompt = system_prompt(profile);

    if !knowledge_context.is_empty() {
        prompt.push_str(
            "\n\nYou have access to evidence-based mental health resources below. When relevant \
             to the conversation, naturally weave in specific techniques, exercises, or insights \
             from these resources. Do NOT list them mechanically or say \"according to my \
             resources.\" Instead, share them conversationally as if they are part of your \
             knowledge. If the resources are not relevant to what the user is discussing, simply \
             ignore them.",
        );
        prompt.push_str(knowledge_context);
    }

    prompt
}

/// Build the ordered message list for a completion request: exactly one
/// system message, the caller-supplied history verbatim, then the new user
/// turn.
pub fn assemble(
    profile: Option<&Profile>,
    knowledge_context: &str,
    history: &[ConversationTurn],
    new_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    messages.push(ChatMessage::system(system_prompt_with_rag(
        profile,
        knowledge_context,
    )));

    for turn in history {
        let message = match turn.role {
            TurnRole::User => ChatMessage::user(turn.content.clone()),
            TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
        };
        messages.push(message);
    }

    messages.push(ChatMessage::user(new_message));

    messages
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::llm::ChatRole;

    fn profile_with(full_name: Option<&str>, stress_level: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            full_name: full_name.map(ToString::to_string),
            age: None,
            stress_level: stress_level.map(ToString::to_string),
            goals: None,
            interests: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_minimal() {
        let messages = assemble(None, "", &[], "hello");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(!messages[0].content.contains("About this user"));
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "hello");
    }

    #[test]
    fn test_assemble_preserves_history_order() {
        let history = vec![
            ConversationTurn {
                role: TurnRole::User,
                content: "I had a rough day".to_string(),
            },
            ConversationTurn {
                role: TurnRole::Assistant,
                content: "I'm sorry to hear that".to_string(),
            },
        ];

        let messages = assemble(None, "", &history, "thanks for listening");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "I had a rough day");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[3].content, "thanks for listening");
    }

    #[test]
    fn test_personalization_lines_only_for_present_fields() {
        let profile = profile_with(Some("Jamie"), None);
        let prompt = system_prompt(Some(&profile));

        assert!(prompt.contains("- Name: Jamie"));
        assert!(!prompt.contains("stress level"));
        assert!(!prompt.contains("goals"));
    }

    #[test]
    fn test_personalization_field_order() {
        let mut profile = profile_with(Some("Jamie"), Some("High"));
        profile.goals = Some("sleep better".to_string());
        let prompt = system_prompt(Some(&profile));

        let name_pos = prompt.find("- Name:").unwrap();
        let stress_pos = prompt.find("- Current stress level:").unwrap();
        let goals_pos = prompt.find("- Mental wellness goals:").unwrap();
        assert!(name_pos < stress_pos && stress_pos < goals_pos);
    }

    #[test]
    fn test_rag_suffix_only_when_context_nonempty() {
        let without = system_prompt_with_rag(None, "");
        assert!(!without.contains("evidence-based mental health resources"));

        let with = system_prompt_with_rag(None, "\n\n---\n[1] Box breathing\n...\n---");
        assert!(with.contains("evidence-based mental health resources"));
        assert!(with.contains("Box breathing"));
    }
}
