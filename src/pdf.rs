//! Wellness report PDF generation via `printpdf`
//!
//! Fixed A4 layout: header, PHQ-2/GAD-2 scores, labeled responses, the
//! generated recommendations and a disclaimer footer.

use std::io::BufWriter;

use printpdf::BuiltinFont;
use printpdf::IndirectFontRef;
use printpdf::Mm;
use printpdf::PdfDocument;
use printpdf::PdfDocumentReference;
use printpdf::PdfLayerReference;

use crate::assessment;
use crate::errors::AnimoaError;
use crate::models::Assessment;
use crate::models::Profile;
use crate::Result;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: Mm = Mm(20.0);
const TOP_Y: Mm = Mm(277.0);
const BOTTOM_Y: Mm = Mm(20.0);

/// Cursor-style page writer that opens a fresh page when space runs out
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl ReportWriter {
    fn new(title: &str) -> Self {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        Self { doc, layer, y: TOP_Y }
    }

    fn ensure_space(&mut self, needed: Mm) {
        if (self.y - needed).0 < BOTTOM_Y.0 {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
    }

    fn text(&mut self, text: &str, size: f64, indent: Mm, font: &IndirectFontRef, advance: Mm) {
        self.ensure_space(advance);
        self.layer
            .use_text(text, size as f32, MARGIN + indent, self.y, font);
        self.y -= advance;
    }

    fn space(&mut self, amount: Mm) {
        self.y -= amount;
    }
}

/// Render the wellness report for a stored assessment. Returns the PDF bytes.
pub fn generate_wellness_report(
    assessment: &Assessment,
    profile: Option<&Profile>,
) -> Result<Vec<u8>> {
    let mut writer = ReportWriter::new("Animoa Wellness Report");

    let font = writer
        .doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AnimoaError::Pdf(format!("Font error: {e}")))?;
    let bold = writer
        .doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AnimoaError::Pdf(format!("Font error: {e}")))?;

    let responses = &assessment.responses.0;

    // Header
    writer.text("Animoa Wellness Report", 22.0, Mm(0.0), &bold, Mm(10.0));
    let date_str = assessment.created_at.format("%A, %B %e, %Y").to_string();
    writer.text(&date_str, 10.0, Mm(0.0), &font, Mm(4.5));
    if let Some(full_name) = profile.and_then(|p| p.full_name.as_deref()) {
        writer.text(
            &format!("Prepared for: {full_name}"),
            10.0,
            Mm(0.0),
            &font,
            Mm(4.5),
        );
    }
    writer.space(Mm(6.0));

    // Scores
    writer.text("Assessment Scores", 14.0, Mm(0.0), &bold, Mm(8.0));
    writer.text(
        &format!(
            "PHQ-2 (Depression Screening): {} / 6",
            assessment::phq2_score(responses)
        ),
        11.0,
        Mm(0.0),
        &font,
        Mm(6.0),
    );
    writer.text(
        &format!(
            "GAD-2 (Anxiety Screening): {} / 6",
            assessment::gad2_score(responses)
        ),
        11.0,
        Mm(0.0),
        &font,
        Mm(6.0),
    );
    writer.space(Mm(4.0));

    // Responses
    writer.text("Your Responses", 14.0, Mm(0.0), &bold, Mm(8.0));

    let mut response_items: Vec<(&str, String)> = vec![
        (
            "Feeling down, depressed, or hopeless",
            assessment::frequency_label(&responses.mood).to_string(),
        ),
        (
            "Little interest or pleasure in doing things",
            assessment::frequency_label(&responses.interest).to_string(),
        ),
        (
            "Feeling nervous, anxious, or on edge",
            assessment::frequency_label(&responses.anxiety).to_string(),
        ),
        (
            "Not being able to stop or control worrying",
            assessment::frequency_label(&responses.worry).to_string(),
        ),
        (
            "Sleep quality",
            assessment::sleep_label(&responses.sleep).to_string(),
        ),
        (
            "Social support",
            assessment::support_label(&responses.support).to_string(),
        ),
    ];
    if let Some(coping) = &responses.coping {
        response_items.push(("Coping strategies", coping.clone()));
    }

    for (question, answer) in response_items {
        writer.text(question, 10.0, Mm(0.0), &font, Mm(5.0));
        writer.text(&answer, 10.0, Mm(4.0), &bold, Mm(7.0));
    }
    writer.space(Mm(4.0));

    // Recommendations
    if let Some(recommendations) = &assessment.recommendations {
        writer.text("Personalized Recommendations", 14.0, Mm(0.0), &bold, Mm(8.0));
        for paragraph in recommendations.lines() {
            if paragraph.trim().is_empty() {
                writer.space(Mm(3.0));
                continue;
            }
            for line in wrap_text(paragraph, 95) {
                writer.text(&line, 10.0, Mm(0.0), &font, Mm(5.0));
            }
        }
    }

    // Disclaimer
    writer.space(Mm(8.0));
    let disclaimer = "Disclaimer: This report is for informational purposes only and is not a \
        substitute for professional medical advice, diagnosis, or treatment. If you are \
        experiencing a mental health crisis, please contact the 988 Suicide and Crisis Lifeline \
        (call or text 988) or go to your nearest emergency room.";
    for line in wrap_text(disclaimer, 110) {
        writer.text(&line, 8.0, Mm(0.0), &font, Mm(4.0));
    }
    writer.space(Mm(2.0));
    writer.text(
        "Generated by Animoa - Your Mental Wellness Companion",
        8.0,
        Mm(0.0),
        &font,
        Mm(4.0),
    );

    let mut buf = BufWriter::new(Vec::new());
    writer
        .doc
        .save(&mut buf)
        .map_err(|e| AnimoaError::Pdf(format!("Save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| AnimoaError::Pdf(format!("Buffer error: {e}")))
}

/// Greedy word wrap at a character budget per line
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::AssessmentResponses;

    fn sample_assessment() -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            responses: sqlx::types::Json(AssessmentResponses {
                mood: "several_days".to_string(),
                interest: "not_at_all".to_string(),
                anxiety: "more_than_half".to_string(),
                worry: "several_days".to_string(),
                sleep: "fair".to_string(),
                support: "moderate".to_string(),
                coping: Some("journaling".to_string()),
            }),
            recommendations: Some("Try a short daily walk.\n\nKeep a gratitude journal.".to_string()),
            used_chat_history: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six seven", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("", 80).is_empty());
    }

    #[test]
    fn test_report_renders_pdf_bytes() {
        let bytes = generate_wellness_report(&sample_assessment(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_report_survives_long_recommendations() {
        let mut assessment = sample_assessment();
        assessment.recommendations =
            Some("A very long recommendation line. ".repeat(200));
        let bytes = generate_wellness_report(&assessment, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
