use crate::models::result::Submission;
use crate::models::test::{SectionContent, TestMetadata};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub section: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_mock: bool,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMetadataPayload {
    #[serde(default)]
    pub is_mock: bool,
    pub metadata: TestMetadata,
}

#[derive(Debug, Deserialize)]
pub struct SaveSectionPayload {
    #[serde(default)]
    pub is_mock: bool,
    pub content: SectionContent,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DuplicateTestPayload {
    #[validate(length(min = 1))]
    pub new_title: String,
    #[serde(default)]
    pub source_is_mock: bool,
    #[serde(default)]
    pub target_is_mock: bool,
}

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTestPayload {
    pub answers: Submission,
    /// Minutes the taker spent; floored at 1 when absent or zero.
    #[serde(default)]
    pub time_taken_minutes: i64,
    #[serde(default)]
    pub audio_recordings: Vec<crate::models::result::AudioRecording>,
}

#[derive(Debug, Serialize)]
pub struct SubmitTestResponse {
    pub result_id: i64,
    pub score_percentage: f64,
    pub is_mock: bool,
}
