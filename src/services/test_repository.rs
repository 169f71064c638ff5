use crate::models::test::{
    Section, SectionContent, TestContent, TestDefinition, TestKind, TestMetadata,
};
use crate::services::legacy_tests::LegacyTestStore;
use crate::store::DocumentStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Directory-per-test content store: `tests/` holds the practice collection,
/// `mock_tests/` the mock collection, each test as `test_<id>/metadata.json`
/// plus one file per section. Ids are allocated independently per
/// collection.
#[derive(Debug, Clone)]
pub struct TestContentRepository {
    tests_dir: PathBuf,
    mock_tests_dir: PathBuf,
}

impl TestContentRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            tests_dir: data_dir.join("tests"),
            mock_tests_dir: data_dir.join("mock_tests"),
        }
    }

    fn collection_dir(&self, is_mock: bool) -> &Path {
        if is_mock {
            &self.mock_tests_dir
        } else {
            &self.tests_dir
        }
    }

    fn test_dir(&self, test_id: i64, is_mock: bool) -> PathBuf {
        self.collection_dir(is_mock).join(format!("test_{test_id}"))
    }

    fn metadata_file(&self, test_id: i64, is_mock: bool) -> PathBuf {
        self.test_dir(test_id, is_mock).join("metadata.json")
    }

    fn section_file(&self, test_id: i64, section: Section, is_mock: bool) -> PathBuf {
        self.test_dir(test_id, is_mock)
            .join(format!("{}.json", section.as_str()))
    }

    /// Next unused id within one collection: max existing + 1, or 1 when the
    /// collection is empty. Practice and mock ids are independent, so the
    /// same number can exist in both collections.
    pub async fn next_test_id(&self, is_mock: bool) -> i64 {
        let mut max_id = 0;
        if let Ok(mut entries) = tokio::fs::read_dir(self.collection_dir(is_mock)).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                let Some(id_part) = name.strip_prefix("test_") else {
                    continue;
                };
                if let Ok(id) = id_part.parse::<i64>() {
                    if matches!(entry.file_type().await, Ok(ft) if ft.is_dir()) {
                        max_id = max_id.max(id);
                    }
                }
            }
        }
        max_id + 1
    }

    /// Create a new test: metadata plus one default (empty) unit per
    /// discipline. Returns the allocated id, or None if the storage unit
    /// could not be written.
    pub async fn create(
        &self,
        title: &str,
        section: &str,
        duration_minutes: i64,
        description: &str,
        is_mock: bool,
        is_premium: bool,
    ) -> Option<i64> {
        let test_id = self.next_test_id(is_mock).await;
        let now = Utc::now().to_rfc3339();
        let metadata = TestMetadata {
            id: test_id,
            title: title.to_string(),
            section: section.to_string(),
            duration_minutes,
            description: description.to_string(),
            is_mock_test: is_mock,
            is_premium,
            created_at: now.clone(),
            updated_at: now,
        };

        if !save_json(&self.metadata_file(test_id, is_mock), &metadata).await {
            return None;
        }
        for sec in Section::ALL {
            let default_content = SectionContent::default_for(sec);
            save_json(&self.section_file(test_id, sec, is_mock), &default_content).await;
        }

        debug!(test_id, is_mock, title, "Created test");
        Some(test_id)
    }

    pub async fn get_metadata(&self, test_id: i64, is_mock: bool) -> Option<TestMetadata> {
        load_json(&self.metadata_file(test_id, is_mock)).await
    }

    /// Section content, or the discipline's default empty structure when the
    /// unit is absent or unreadable. Never fails.
    pub async fn get_section(&self, test_id: i64, section: Section, is_mock: bool) -> SectionContent {
        load_json(&self.section_file(test_id, section, is_mock))
            .await
            .unwrap_or_else(|| SectionContent::default_for(section))
    }

    /// Metadata merged with all four section units, tagged with its
    /// collection kind. None when the metadata unit is missing.
    pub async fn get_complete(&self, test_id: i64, is_mock: bool) -> Option<TestDefinition> {
        let metadata = self.get_metadata(test_id, is_mock).await?;

        let mut sections = BTreeMap::new();
        for sec in Section::ALL {
            let content = self.get_section(test_id, sec, is_mock).await;
            sections.insert(sec.as_str().to_string(), content);
        }

        Some(TestDefinition {
            metadata,
            content: TestContent { sections },
            test_type: TestKind::from_is_mock(is_mock),
        })
    }

    /// Overwrite the metadata unit, stamping `updated_at`.
    pub async fn update_metadata(
        &self,
        test_id: i64,
        mut metadata: TestMetadata,
        is_mock: bool,
    ) -> bool {
        metadata.updated_at = Utc::now().to_rfc3339();
        save_json(&self.metadata_file(test_id, is_mock), &metadata).await
    }

    /// Full overwrite of one section unit.
    pub async fn update_section(
        &self,
        test_id: i64,
        section: Section,
        content: &SectionContent,
        is_mock: bool,
    ) -> bool {
        save_json(&self.section_file(test_id, section, is_mock), content).await
    }

    /// All tests in one collection, ascending by id.
    pub async fn list_all(&self, is_mock: bool) -> Vec<TestDefinition> {
        let mut ids = Vec::new();
        if let Ok(mut entries) = tokio::fs::read_dir(self.collection_dir(is_mock)).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if let Some(id) = name.strip_prefix("test_").and_then(|s| s.parse::<i64>().ok()) {
                    if matches!(entry.file_type().await, Ok(ft) if ft.is_dir()) {
                        ids.push(id);
                    }
                }
            }
        }
        ids.sort_unstable();

        let mut tests = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(test) = self.get_complete(id, is_mock).await {
                tests.push(test);
            }
        }
        tests
    }

    /// Remove a test's whole storage unit. False when the test does not
    /// exist or removal fails; never raises.
    pub async fn delete(&self, test_id: i64, is_mock: bool) -> bool {
        let dir = self.test_dir(test_id, is_mock);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                error!(test_id, error = %e, "Failed to delete test");
                false
            }
        }
    }

    /// Deep-copy a test into the target collection (practice and mock may
    /// differ) under a fresh id. None when the source is missing or the new
    /// test cannot be created.
    pub async fn duplicate(
        &self,
        source_test_id: i64,
        new_title: &str,
        source_is_mock: bool,
        target_is_mock: bool,
    ) -> Option<i64> {
        let source = self.get_complete(source_test_id, source_is_mock).await?;

        let new_test_id = self
            .create(
                new_title,
                &source.metadata.section,
                source.metadata.duration_minutes,
                &source.metadata.description,
                target_is_mock,
                source.metadata.is_premium,
            )
            .await?;

        for sec in Section::ALL {
            let content = source
                .content
                .sections
                .get(sec.as_str())
                .cloned()
                .unwrap_or_else(|| SectionContent::default_for(sec));
            self.update_section(new_test_id, sec, &content, target_is_mock)
                .await;
        }

        Some(new_test_id)
    }

    /// Counts per collection, grouped by section label.
    pub async fn statistics(&self) -> TestStatistics {
        let practice = self.list_all(false).await;
        let mock = self.list_all(true).await;

        let mut stats = TestStatistics {
            total_practice_tests: practice.len(),
            total_mock_tests: mock.len(),
            ..Default::default()
        };
        for test in &practice {
            *stats
                .practice_by_section
                .entry(test.metadata.section.clone())
                .or_insert(0) += 1;
        }
        for test in &mock {
            *stats
                .mock_by_section
                .entry(test.metadata.section.clone())
                .or_insert(0) += 1;
        }
        stats
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestStatistics {
    pub total_practice_tests: usize,
    pub total_mock_tests: usize,
    pub practice_by_section: BTreeMap<String, usize>,
    pub mock_by_section: BTreeMap<String, usize>,
}

/// The two storage generations behind one lookup surface: the directory
/// store is authoritative for edits, the legacy embedded list is a read-only
/// display fallback.
#[derive(Debug, Clone)]
pub struct TestRepository {
    pub content: TestContentRepository,
    pub legacy: LegacyTestStore,
}

impl TestRepository {
    pub fn new(data_dir: impl AsRef<Path>, store: DocumentStore) -> Self {
        Self {
            content: TestContentRepository::new(data_dir),
            legacy: LegacyTestStore::new(store),
        }
    }

    /// Find-anywhere convenience: directory-store practice, then
    /// directory-store mock, then the legacy embedded list.
    pub async fn resolve(&self, test_id: i64) -> Option<TestDefinition> {
        if let Some(test) = self.content.get_complete(test_id, false).await {
            return Some(test);
        }
        if let Some(test) = self.content.get_complete(test_id, true).await {
            return Some(test);
        }
        self.legacy.get(test_id).await
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to parse test unit");
            None
        }
    }
}

async fn save_json<T: Serialize>(path: &Path, data: &T) -> bool {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!(file = %path.display(), error = %e, "Failed to create test directory");
            return false;
        }
    }
    let body = match serde_json::to_vec_pretty(data) {
        Ok(body) => body,
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to serialize test unit");
            return false;
        }
    };
    match tokio::fs::write(path, body).await {
        Ok(()) => true,
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to write test unit");
            false
        }
    }
}
