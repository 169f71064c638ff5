use crate::models::question::Question;
use crate::models::result::Submission;
use crate::models::test::{Section, TestDefinition, ALL_SECTIONS};
use crate::services::test_repository::TestContentRepository;
use tracing::{debug, info};

/// Grades a submission against a resolved test definition. Every fallback
/// path degrades to a numeric score: grading must never block the taker
/// from seeing a result page, so this service raises no errors.
#[derive(Debug, Clone)]
pub struct ScoringService {
    repository: TestContentRepository,
}

impl ScoringService {
    pub fn new(repository: TestContentRepository) -> Self {
        Self { repository }
    }

    /// Score a submission, applying the mock-test post-pass: mock exams are
    /// scored on objective questions only, so when the digit-only subset of
    /// the answers is non-empty and smaller than the full set, the score is
    /// recomputed from that subset alone.
    pub async fn score_submission(
        &self,
        answers: &Submission,
        section_label: &str,
        test: &TestDefinition,
        is_mock: bool,
    ) -> f64 {
        let score = self.compute_score(answers, section_label, test).await;

        if is_mock && !answers.is_empty() {
            let mc_answers: Submission = answers
                .iter()
                .filter(|(key, value)| {
                    key.starts_with("question_")
                        && !value.is_empty()
                        && value.chars().all(|c| c.is_ascii_digit())
                })
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            // The filtered set is a subset, so "differs" is a length check.
            if !mc_answers.is_empty() && mc_answers.len() != answers.len() {
                info!(
                    kept = mc_answers.len(),
                    submitted = answers.len(),
                    "Rescoring mock submission on multiple choice answers only"
                );
                return self.compute_score(&mc_answers, section_label, test).await;
            }
        }

        score
    }

    /// Compute a 0-100 percentage for one submission. Question resolution
    /// tries embedded content, then the persisted section unit, then (for
    /// whole-exam submissions) the union of all four disciplines. An empty
    /// resolved set scores 0.0 and is not an error.
    pub async fn compute_score(
        &self,
        answers: &Submission,
        section_label: &str,
        test: &TestDefinition,
    ) -> f64 {
        let questions = self.resolve_questions(section_label, test).await;

        debug!(
            test_id = test.id(),
            section = section_label,
            questions = questions.len(),
            "Resolved question set"
        );

        if questions.is_empty() {
            return 0.0;
        }

        let total_questions = questions.len();
        let mut earned = 0.0;

        for question in &questions {
            match lookup_answer(answers, question.id) {
                Some((key, value)) => {
                    let credit = credit_for(question, value);
                    debug!(
                        question_id = question.id,
                        key, value, credit, "Graded answer"
                    );
                    earned += credit;
                }
                None => {
                    debug!(question_id = question.id, "No answer provided");
                }
            }
        }

        let score = earned / total_questions as f64 * 100.0;
        info!(
            test_id = test.id(),
            earned,
            total_questions,
            score,
            "Computed submission score"
        );

        // The formula cannot exceed the bounds, but malformed data must not
        // leak an out-of-range percentage either.
        round1(score.clamp(0.0, 100.0))
    }

    async fn resolve_questions(&self, section_label: &str, test: &TestDefinition) -> Vec<Question> {
        // Embedded content wins when it actually has questions.
        if let Some(questions) = test.embedded_questions(section_label) {
            return questions.clone();
        }

        // Otherwise the persisted section unit.
        if let Some(section) = Section::parse(section_label) {
            let content = self
                .repository
                .get_section(test.id(), section, test.metadata.is_mock_test)
                .await;
            if !content.questions.is_empty() {
                return content.questions;
            }
        }

        // Whole-exam mock: union every discipline, embedded first, in the
        // fixed reading/listening/writing/speaking order.
        if section_label == ALL_SECTIONS {
            let mut all_questions = Vec::new();
            for section in Section::ALL {
                if let Some(questions) = test.embedded_questions(section.as_str()) {
                    all_questions.extend(questions.iter().cloned());
                    continue;
                }
                let content = self
                    .repository
                    .get_section(test.id(), section, test.metadata.is_mock_test)
                    .await;
                all_questions.extend(content.questions);
            }
            return all_questions;
        }

        Vec::new()
    }
}

/// Answer lookup for one question id: `question_<id>`, then the legacy
/// `q_<id>` and bare-id shapes. First match wins; no match is not an error,
/// the question simply earns no credit.
fn lookup_answer(answers: &Submission, question_id: i64) -> Option<(String, &str)> {
    let keys = [
        format!("question_{question_id}"),
        format!("q_{question_id}"),
        question_id.to_string(),
    ];
    keys.into_iter()
        .find_map(|key| answers.get(&key).map(|value| (key, value.as_str())))
}

/// Credit for one answered question. Multiple choice is exact index match
/// (non-numeric submissions coerce to the -1 sentinel, a guaranteed miss);
/// free-text types earn length-based credit.
fn credit_for(question: &Question, value: &str) -> f64 {
    if question.question_type.is_free_text() {
        let len = value.trim().len();
        if len > 20 {
            1.0
        } else if len > 5 {
            0.7
        } else {
            0.0
        }
    } else {
        let submitted = if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            value.parse().unwrap_or(-1)
        } else {
            -1
        };
        if submitted == question.correct_index() {
            1.0
        } else {
            0.0
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
