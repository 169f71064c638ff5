use crate::error::Result;
use crate::models::result::TestResult;
use crate::models::test::TestDefinition;
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::path::PathBuf;
use tracing::{error, info};

const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 20.0;
const LINE_HEIGHT_MM: f64 = 8.0;

/// Renders a result report as a PDF. Generation is a best-effort side task:
/// it runs only after the result has been persisted and its failure never
/// affects the stored result or the returned score.
#[derive(Debug, Clone)]
pub struct ReportService {
    reports_dir: PathBuf,
}

impl ReportService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    /// Render the report bytes. Pure function of its inputs.
    pub fn render(
        &self,
        result: &TestResult,
        test: &TestDefinition,
        user_name: &str,
        time_taken_minutes: i64,
    ) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            format!("OET Test Results - {}", test.metadata.title),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Report",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut writer = LineWriter::new(layer, regular, bold);
        writer.heading(&format!("OET Test Results - {}", test.metadata.title));
        writer.blank();
        writer.field("Student", user_name);
        writer.field("Completed", &result.completed_at);
        writer.field("Time Taken", &format!("{} minutes", time_taken_minutes));
        writer.blank();
        writer.field("Score", &format!("{:.1}%", result.score_percentage));
        writer.field(
            "Performance Analysis",
            performance_band(result.score_percentage),
        );
        writer.field("Section", &test.metadata.section);

        if !result.answers.is_empty() {
            writer.blank();
            writer.heading("Answer Summary");
            for (question, answer) in &result.answers {
                if answer.is_empty() || answer == "manual_grading_required" {
                    continue;
                }
                writer.line(&format!(
                    "- {}: Option {}",
                    display_key(question),
                    answer
                ));
            }
        }

        Ok(doc.save_to_bytes()?)
    }

    /// Render and write the report to the reports directory, logging and
    /// swallowing any failure.
    pub async fn save_report(
        &self,
        result: &TestResult,
        test: &TestDefinition,
        user_name: &str,
        time_taken_minutes: i64,
        is_mock: bool,
    ) {
        let prefix = if is_mock { "MockTest" } else { "PracticeTest" };
        let filename = format!(
            "{}_{}_{}_{}.pdf",
            prefix,
            test.metadata.title.replace([' ', '/'], "_"),
            user_name.replace([' ', '/'], "_"),
            Utc::now().format("%Y%m%d_%H%M%S")
        );

        let bytes = match self.render(result, test, user_name, time_taken_minutes) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(result_id = result.id, error = %e, "Failed to render result report");
                return;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.reports_dir).await {
            error!(error = %e, "Failed to create reports directory");
            return;
        }
        let path = self.reports_dir.join(&filename);
        match tokio::fs::write(&path, bytes).await {
            Ok(()) => info!(file = %path.display(), "Saved result report"),
            Err(e) => error!(file = %path.display(), error = %e, "Failed to save result report"),
        }
    }
}

fn performance_band(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent Performance - Strong understanding demonstrated"
    } else if score >= 60.0 {
        "Good Performance - On the right track"
    } else {
        "Needs Improvement - Consider additional practice"
    }
}

/// `question_3` -> `Question 3`, matching the original report labels.
fn display_key(key: &str) -> String {
    key.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct LineWriter {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl LineWriter {
    fn new(layer: PdfLayerReference, regular: IndirectFontRef, bold: IndirectFontRef) -> Self {
        Self {
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn advance(&mut self) -> f64 {
        let y = self.y;
        self.y -= LINE_HEIGHT_MM;
        y
    }

    fn heading(&mut self, text: &str) {
        let y = self.advance();
        self.layer
            .use_text(text, 16.0, Mm(MARGIN_MM), Mm(y), &self.bold);
    }

    fn field(&mut self, label: &str, value: &str) {
        let y = self.advance();
        self.layer
            .use_text(format!("{label}:"), 11.0, Mm(MARGIN_MM), Mm(y), &self.bold);
        self.layer
            .use_text(value, 11.0, Mm(MARGIN_MM + 45.0), Mm(y), &self.regular);
    }

    fn line(&mut self, text: &str) {
        let y = self.advance();
        self.layer
            .use_text(text, 11.0, Mm(MARGIN_MM), Mm(y), &self.regular);
    }

    fn blank(&mut self) {
        self.advance();
    }
}
