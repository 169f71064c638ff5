use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One question inside a section unit. The persisted shape is loose: the
/// `type` field picks the variant and the remaining fields are flattened,
/// so legacy documents with extra keys still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: i64,
    pub question: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(flatten)]
    pub details: QuestionDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Essay,
    Speaking,
    Text,
    Writing,
    Textarea,
}

impl QuestionType {
    /// Everything except multiple choice is graded by answer length.
    pub fn is_free_text(&self) -> bool {
        !matches!(self, QuestionType::MultipleChoice)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionDetails {
    MultipleChoice(MultipleChoiceDetails),
    FreeText(FreeTextDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoiceDetails {
    pub options: Vec<String>,
    /// Index of the correct option. Stored documents carry either an integer
    /// or a digit string; anything else coerces to the -1 sentinel.
    #[serde(default)]
    pub correct_answer: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FreeTextDetails {
    /// Free text model answer, or the "manual_grading_required" sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl Question {
    /// Correct option index for multiple choice questions, -1 when the
    /// stored value is missing or malformed.
    pub fn correct_index(&self) -> i64 {
        match &self.details {
            QuestionDetails::MultipleChoice(mc) => coerce_index(&mc.correct_answer),
            QuestionDetails::FreeText(_) => -1,
        }
    }

    pub fn multiple_choice(id: i64, question: &str, options: &[&str], correct: i64) -> Self {
        Self {
            id,
            question: question.to_string(),
            question_type: QuestionType::MultipleChoice,
            details: QuestionDetails::MultipleChoice(MultipleChoiceDetails {
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_answer: JsonValue::from(correct),
            }),
        }
    }

    pub fn free_text(id: i64, question: &str, question_type: QuestionType, model_answer: &str) -> Self {
        Self {
            id,
            question: question.to_string(),
            question_type,
            details: QuestionDetails::FreeText(FreeTextDetails {
                correct_answer: Some(model_answer.to_string()),
            }),
        }
    }
}

pub fn coerce_index(value: &JsonValue) -> i64 {
    match value {
        JsonValue::Number(n) => n.as_i64().unwrap_or(-1),
        JsonValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse().unwrap_or(-1)
        }
        _ => -1,
    }
}
