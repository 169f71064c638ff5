use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tracing::error;

/// Flat-file JSON document store. Every collection is one file under the
/// data directory with load-all / save-all semantics: a mutation reads the
/// whole document, changes it in memory and rewrites it. No locking;
/// concurrent writers are last-write-wins.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    base_dir: PathBuf,
}

/// Records with a collection-scoped auto-increment id.
pub trait Document {
    fn id(&self) -> i64;
}

/// Next id for a collection: max existing + 1, or 1 when empty.
pub fn next_id<T: Document>(items: &[T]) -> i64 {
    items.iter().map(Document::id).max().unwrap_or(0) + 1
}

impl DocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Load a collection, falling back to `default` when the file is
    /// missing or unreadable. Corrupt documents are reported and replaced
    /// by the default rather than failing the request.
    pub async fn load<T>(&self, name: &str, default: T) -> T
    where
        T: DeserializeOwned,
    {
        let path = self.file_path(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => return default,
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Failed to parse stored document");
                default
            }
        }
    }

    /// Rewrite a collection in full. Failures are logged and surfaced as
    /// `false` so callers can degrade instead of crashing.
    pub async fn save<T>(&self, name: &str, data: &T) -> bool
    where
        T: Serialize,
    {
        let path = self.file_path(name);
        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!(file = %path.display(), error = %e, "Failed to create data directory");
                return false;
            }
        }
        let body = match serde_json::to_vec_pretty(data) {
            Ok(body) => body,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Failed to serialize document");
                return false;
            }
        };
        match tokio::fs::write(&path, body).await {
            Ok(()) => true,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Failed to write document");
                false
            }
        }
    }
}

// Collection file names, matching the original data layout.
pub const USERS: &str = "users.json";
pub const TEST_RESULTS: &str = "test_results.json";
pub const MOCK_TEST_RESULTS: &str = "mocktests_results.json";
pub const VOCABULARY: &str = "vocabulary.json";
pub const VOCABULARY_PROGRESS: &str = "vocabulary_progress.json";
pub const JOBS: &str = "jobs.json";
pub const CHAT_MESSAGES: &str = "chat_messages.json";
pub const PRACTICE_TESTS: &str = "practice_tests.json";
pub const FULL_MOCK_TESTS: &str = "full_mock_tests.json";
