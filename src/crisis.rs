//! Crisis keyword detection
//!
//! A deliberately simple tripwire: case-insensitive substring matching
//! against a fixed phrase list. There is no scoring and no negation handling
//! ("I do not want to die" still matches), so a hit should open a resource
//! dialog, never gate or alter the conversation.

/// Phrases that indicate a potential mental health emergency
pub const CRISIS_KEYWORDS: [&str; 16] = [
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "don't want to live",
    "no reason to live",
    "better off dead",
    "self-harm",
    "self harm",
    "hurt myself",
    "cutting myself",
    "overdose",
    "end it all",
    "take my life",
    "not worth living",
];

/// Crisis support resources shown to the user when a signal is detected
pub struct CrisisResources {
    pub title: &'static str,
    pub message: &'static str,
}

pub const CRISIS_RESOURCES: CrisisResources = CrisisResources {
    title: "Crisis Support Resources",
    message: "If you're experiencing a mental health crisis, please reach out for help:\n\n\
**988 Suicide & Crisis Lifeline** - Call or text **988** (Available 24/7)\n\n\
**Crisis Text Line** - Text **HOME** to **741741**\n\n\
**International Association for Suicide Prevention** - https://www.iasp.info/resources/Crisis_Centres/\n\n\
**Emergency Services** - Call **911** if you're in immediate danger\n\n\
---\n\n\
**You are not alone. Professional help is available right now.**\n\n\
Animoa cares about your wellbeing, but I'm an AI companion and not a substitute for \
professional mental health care. Please reach out to the resources above if you're in crisis.",
};

/// Check whether a message contains a crisis-related phrase
pub fn contains_crisis_signal(message: &str) -> bool {
    if message.is_empty() {
        return false;
    }

    let message_lower = message.to_lowercase();
    CRISIS_KEYWORDS
        .iter()
        .any(|keyword| message_lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_crisis_phrases() {
        assert!(contains_crisis_signal("I want to end it all"));
        assert!(contains_crisis_signal("sometimes I think about suicide"));
        assert!(contains_crisis_signal("i've been cutting myself"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains_crisis_signal("SUICIDE"));
        assert!(contains_crisis_signal("I Want To Die"));
    }

    #[test]
    fn test_ignores_ordinary_messages() {
        assert!(!contains_crisis_signal("I love hiking"));
        assert!(!contains_crisis_signal(""));
        assert!(!contains_crisis_signal("work has been stressful lately"));
    }

    #[test]
    fn test_no_negation_handling() {
        // Known limitation: negated phrases still match
        assert!(contains_crisis_signal("I do not want to die"));
    }
}
