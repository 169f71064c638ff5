use crate::models::result::{AudioRecording, Submission, TestResult};
use crate::services::test_repository::TestRepository;
use crate::store::{document_store, next_id, Document, DocumentStore};
use chrono::Utc;
use serde::Serialize;

impl Document for TestResult {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Persists graded submissions. Practice and mock results live in separate
/// collections; a result is written once and never mutated.
#[derive(Debug, Clone)]
pub struct ResultService {
    store: DocumentStore,
    repository: TestRepository,
}

/// A stored result joined with its test's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSummary {
    #[serde(flatten)]
    pub result: TestResult,
    pub test_title: String,
    pub test_section: String,
    pub is_mock: bool,
}

impl ResultService {
    pub fn new(store: DocumentStore, repository: TestRepository) -> Self {
        Self { store, repository }
    }

    fn collection(is_mock: bool) -> &'static str {
        if is_mock {
            document_store::MOCK_TEST_RESULTS
        } else {
            document_store::TEST_RESULTS
        }
    }

    /// Append a new result, allocating the next id within its collection.
    /// None when the collection could not be rewritten.
    pub async fn save_result(
        &self,
        user_id: Option<i64>,
        test_id: i64,
        score_percentage: f64,
        time_taken_minutes: i64,
        answers: Submission,
        audio_recordings: Vec<AudioRecording>,
        is_mock: bool,
    ) -> Option<i64> {
        let collection = Self::collection(is_mock);
        let mut results: Vec<TestResult> = self.store.load(collection, Vec::new()).await;
        let result_id = next_id(&results);

        results.push(TestResult {
            id: result_id,
            user_id,
            test_id,
            score_percentage,
            time_taken_minutes: time_taken_minutes.max(1),
            answers,
            audio_recordings,
            completed_at: Utc::now().format("%Y-%m-%d %H:%M").to_string(),
        });

        if self.store.save(collection, &results).await {
            Some(result_id)
        } else {
            None
        }
    }

    pub async fn get_result(&self, result_id: i64, is_mock: bool) -> Option<TestResult> {
        let results: Vec<TestResult> = self.store.load(Self::collection(is_mock), Vec::new()).await;
        results.into_iter().find(|r| r.id == result_id)
    }

    /// One user's history across both collections, joined with test titles
    /// and sorted most recent first.
    pub async fn list_for_user(&self, user_id: i64) -> Vec<ResultSummary> {
        let mut summaries = Vec::new();
        for is_mock in [false, true] {
            let results: Vec<TestResult> =
                self.store.load(Self::collection(is_mock), Vec::new()).await;
            for result in results {
                if result.user_id != Some(user_id) {
                    continue;
                }
                let test = self.repository.resolve(result.test_id).await;
                let (test_title, test_section) = match &test {
                    Some(t) => (t.metadata.title.clone(), t.metadata.section.clone()),
                    None => (format!("Test {}", result.test_id), "Unknown".to_string()),
                };
                summaries.push(ResultSummary {
                    result,
                    test_title,
                    test_section,
                    is_mock,
                });
            }
        }
        summaries.sort_by(|a, b| b.result.completed_at.cmp(&a.result.completed_at));
        summaries
    }
}
