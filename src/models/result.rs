use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw submitted answers, keyed by answer-key (`question_<id>` and two
/// legacy shapes, see the scoring engine). Ordered map so persisted
/// documents are stable.
pub type Submission = BTreeMap<String, String>;

/// A graded submission. Created once, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    /// None for anonymous mock test takers.
    pub user_id: Option<i64>,
    pub test_id: i64,
    pub score_percentage: f64,
    /// Wall-clock minutes, floored at 1.
    pub time_taken_minutes: i64,
    pub answers: Submission,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_recordings: Vec<AudioRecording>,
    pub completed_at: String,
}

/// Pointer to an uploaded speaking-section recording; the bytes themselves
/// live outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRecording {
    pub filename: String,
    pub timestamp: String,
}
