//! Formatting retrieved knowledge into prompt fragments

use crate::models::AssessmentResponses;
use crate::models::KnowledgeSnippet;

/// Render retrieved snippets as a delimited prompt block. Empty input yields
/// an empty string so no prompt tokens are spent when retrieval found
/// nothing. Input order (similarity order) is preserved.
pub fn format_knowledge_context(snippets: &[KnowledgeSnippet]) -> String {
    if snippets.is_empty() {
        return String::new();
    }

    let entries = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let source = s
                .source
                .as_ref()
                .map(|src| format!("\n(Source: {src})"))
                .unwrap_or_default();
            format!("[{}] {}\n{}{}", i + 1, s.title, s.content, source)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("\n\n---\nRelevant Evidence-Based Resources:\n{entries}\n---")
}

/// Build a natural-language search query from assessment responses,
/// phrased for embedding similarity against the knowledge base.
pub fn build_assessment_query(responses: &AssessmentResponses) -> String {
    let mut parts: Vec<String> = Vec::new();

    let severity = |answer: &str| match answer {
        "not_at_all" => "minimal",
        "several_days" => "mild",
        "more_than_half" => "moderate",
        "nearly_every_day" => "severe",
        _ => "some",
    };

    if responses.mood != "not_at_all" || responses.interest != "not_at_all" {
        parts.push(format!(
            "{} depression symptoms, low mood, reduced interest in activities",
            severity(&responses.mood)
        ));
    }
    if responses.anxiety != "not_at_all" || responses.worry != "not_at_all" {
        parts.push(format!(
            "{} anxiety, nervousness, difficulty controlling worry",
            severity(&responses.anxiety)
        ));
    }
    if responses.sleep == "poor" || responses.sleep == "very_poor" {
        parts.push("poor sleep quality, sleep difficulties".to_string());
    }
    if responses.support == "limited" || responses.support == "none" {
        parts.push("limited social support, feeling isolated".to_string());
    }

    parts.push("coping strategies and evidence-based techniques for mental wellness".to_string());

    parts.join(". ")
}

/// Determine which assessment domains to filter retrieval on
pub fn relevant_domains(responses: &AssessmentResponses) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();

    if responses.mood != "not_at_all" || responses.interest != "not_at_all" {
        domains.push("depression".to_string());
    }
    if responses.anxiety != "not_at_all" || responses.worry != "not_at_all" {
        domains.push("anxiety".to_string());
    }
    if matches!(responses.sleep.as_str(), "poor" | "very_poor" | "fair") {
        domains.push("sleep".to_string());
    }
    if matches!(responses.support.as_str(), "limited" | "none") {
        domains.push("social_support".to_string());
    }

    if domains.is_empty() {
        domains.push("depression".to_string());
        domains.push("anxiety".to_string());
    }
    domains
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn snippet(title: &str, content: &str, source: Option<&str>) -> KnowledgeSnippet {
        KnowledgeSnippet {
            id: Uuid::new_v4(),
            category: "coping".to_string(),
            subcategory: None,
            title: title.to_string(),
            content: content.to_string(),
            tags: vec![],
            severity_relevance: vec![],
            assessment_domains: vec![],
            source: source.map(ToString::to_string),
            similarity: 0.8,
        }
    }

    fn responses(mood: &str, anxiety: &str, sleep: &str, support: &str) -> AssessmentResponses {
        AssessmentResponses {
            mood: mood.to_string(),
            interest: mood.to_string(),
            anxiety: anxiety.to_string(),
            worry: anxiety.to_string(),
            sleep: sleep.to_string(),
            support: support.to_string(),
            coping: None,
        }
    }

    #[test]
    fn test_format_empty_is_empty_string() {
        assert_eq!(format_knowledge_context(&[]), "");
    }

    #[test]
    fn test_format_lists_snippets_in_order() {
        let context = format_knowledge_context(&[
            snippet("Box breathing", "Breathe in for four counts", None),
            snippet("Sleep hygiene", "Keep a consistent bedtime", Some("NIH")),
        ]);

        assert!(context.starts_with("\n\n---\nRelevant Evidence-Based Resources:"));
        assert!(context.ends_with("---"));
        let first = context.find("[1] Box breathing").unwrap();
        let second = context.find("[2] Sleep hygiene").unwrap();
        assert!(first < second);
        assert!(context.contains("Breathe in for four counts"));
        assert!(context.contains("(Source: NIH)"));
    }

    #[test]
    fn test_assessment_query_reflects_severity() {
        let query =
            build_assessment_query(&responses("nearly_every_day", "not_at_all", "good", "strong"));
        assert!(query.contains("severe depression symptoms"));
        assert!(!query.contains("anxiety, nervousness"));
        assert!(query.contains("coping strategies"));
    }

    #[test]
    fn test_relevant_domains_defaults_when_all_clear() {
        let domains = relevant_domains(&responses("not_at_all", "not_at_all", "good", "strong"));
        assert_eq!(domains, vec!["depression", "anxiety"]);
    }

    #[test]
    fn test_relevant_domains_includes_sleep_and_support() {
        let domains =
            relevant_domains(&responses("several_days", "several_days", "poor", "limited"));
        assert_eq!(
            domains,
            vec!["depression", "anxiety", "sleep", "social_support"]
        );
    }
}
