use crate::models::question::{Question, QuestionType};
use crate::models::test::{
    AudioFile, Passage, RolePlay, Section, SectionContent, TestContent, TestDefinition, TestKind,
    TestMetadata, ALL_SECTIONS,
};
use crate::store::{document_store, DocumentStore};
use serde_json::json;
use std::collections::BTreeMap;

/// The previous storage generation: two flat JSON lists of fully embedded
/// test definitions. Consulted only as a display fallback for results whose
/// test predates the directory store; admin edits never target it. Missing
/// files fall back to the built-in catalogue the platform shipped with.
#[derive(Debug, Clone)]
pub struct LegacyTestStore {
    store: DocumentStore,
}

impl LegacyTestStore {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn practice_tests(&self) -> Vec<TestDefinition> {
        self.store
            .load(document_store::PRACTICE_TESTS, default_practice_tests())
            .await
    }

    pub async fn mock_tests(&self) -> Vec<TestDefinition> {
        self.store
            .load(document_store::FULL_MOCK_TESTS, default_mock_tests())
            .await
    }

    /// Probe practice first, then mock, tagging the hit with its collection.
    pub async fn get(&self, test_id: i64) -> Option<TestDefinition> {
        for (tests, kind) in [
            (self.practice_tests().await, TestKind::Practice),
            (self.mock_tests().await, TestKind::Mock),
        ] {
            if let Some(mut test) = tests.into_iter().find(|t| t.id() == test_id) {
                test.test_type = kind;
                return Some(test);
            }
        }
        None
    }
}

fn metadata(
    id: i64,
    title: &str,
    section: &str,
    duration_minutes: i64,
    description: &str,
    is_mock_test: bool,
    is_premium: bool,
) -> TestMetadata {
    TestMetadata {
        id,
        title: title.to_string(),
        section: section.to_string(),
        duration_minutes,
        description: description.to_string(),
        is_mock_test,
        is_premium,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn single_section(section: Section, content: SectionContent) -> TestContent {
    let mut sections = BTreeMap::new();
    sections.insert(section.as_str().to_string(), content);
    TestContent { sections }
}

/// The embedded practice catalogue: one empty single-section test per
/// discipline, writing and speaking premium-gated.
fn default_practice_tests() -> Vec<TestDefinition> {
    let entries = [
        (1, "Listening Practice Test 1", Section::Listening, 30, "Basic listening comprehension test", false),
        (2, "Reading Practice Test 1", Section::Reading, 45, "Reading comprehension and analysis", false),
        (3, "Writing Practice Test 1", Section::Writing, 45, "Letter writing task", true),
        (4, "Speaking Practice Test 1", Section::Speaking, 20, "Role-play scenarios", true),
    ];

    entries
        .into_iter()
        .map(|(id, title, section, duration, description, premium)| {
            let mut content = SectionContent::default_for(section);
            content.duration_minutes = duration;
            TestDefinition {
                metadata: metadata(id, title, titlecase(section), duration, description, false, premium),
                content: single_section(section, content),
                test_type: TestKind::Practice,
            }
        })
        .collect()
}

fn titlecase(section: Section) -> &'static str {
    match section {
        Section::Reading => "Reading",
        Section::Listening => "Listening",
        Section::Writing => "Writing",
        Section::Speaking => "Speaking",
    }
}

/// The embedded mock catalogue: one whole-exam test plus two focused
/// single-section ones.
fn default_mock_tests() -> Vec<TestDefinition> {
    vec![complete_mock_100(), reading_mock_104(), listening_mock_105()]
}

fn complete_mock_100() -> TestDefinition {
    let mut sections = BTreeMap::new();

    let mut reading = SectionContent::default_for(Section::Reading);
    reading.passages = Some(vec![Passage {
        id: 1,
        title: "Patient Care Guidelines".into(),
        content: "Comprehensive patient care guidelines for healthcare professionals...".into(),
    }]);
    reading.questions = vec![Question::multiple_choice(
        1,
        "What is the primary focus of patient care?",
        &["Safety", "Efficiency", "Cost", "Speed"],
        0,
    )];
    sections.insert("reading".into(), reading);

    let mut listening = SectionContent::default_for(Section::Listening);
    listening.audio_files = Some(vec![AudioFile {
        id: 1,
        title: "Patient Consultation".into(),
        url: "/static/audio/consultation1.mp3".into(),
        transcript: "Doctor and patient consultation transcript...".into(),
    }]);
    listening.questions = vec![Question::multiple_choice(
        1,
        "What was the patient's main complaint?",
        &["Headache", "Fever", "Cough", "Fatigue"],
        0,
    )];
    sections.insert("listening".into(), listening);

    let mut writing = SectionContent::default_for(Section::Writing);
    writing.scenario = Some(json!({
        "patient_name": "John Smith",
        "age": "45",
        "presenting_complaint": "Chest pain",
        "examination_findings": "Elevated blood pressure",
        "referral_to": "Cardiology",
        "task_instructions": "Write a referral letter to the cardiologist"
    }));
    writing.questions = vec![Question::free_text(
        1,
        "Write a referral letter",
        QuestionType::Essay,
        "Sample referral letter format",
    )];
    sections.insert("writing".into(), writing);

    let mut speaking = SectionContent::default_for(Section::Speaking);
    speaking.role_plays = Some(vec![RolePlay {
        id: 1,
        setting: "Emergency Department".into(),
        your_role: "Nurse".into(),
        patient: "Elderly patient with chest pain".into(),
        task: "Explain the procedure and reassure the patient".into(),
        time_limit: 5,
    }]);
    speaking.questions = vec![Question::free_text(
        1,
        "Record your role play response",
        QuestionType::Speaking,
        "Evaluation based on communication skills",
    )];
    sections.insert("speaking".into(), speaking);

    TestDefinition {
        metadata: metadata(
            100,
            "Complete OET Mock Test 1",
            ALL_SECTIONS,
            180,
            "Full OET practice exam covering all sections",
            true,
            false,
        ),
        content: TestContent { sections },
        test_type: TestKind::Mock,
    }
}

fn reading_mock_104() -> TestDefinition {
    let mut reading = SectionContent::default_for(Section::Reading);
    reading.passages = Some(vec![Passage {
        id: 1,
        title: "Medical Research Study".into(),
        content: "Recent research findings in healthcare...".into(),
    }]);
    reading.questions = vec![Question::multiple_choice(
        1,
        "What was the main conclusion of the study?",
        &["Improved outcomes", "Reduced costs", "Better efficiency", "Enhanced safety"],
        0,
    )];

    TestDefinition {
        metadata: metadata(
            104,
            "OET Reading Mock Test",
            "Reading",
            45,
            "Focused reading comprehension test",
            true,
            false,
        ),
        content: single_section(Section::Reading, reading),
        test_type: TestKind::Mock,
    }
}

fn listening_mock_105() -> TestDefinition {
    let mut listening = SectionContent::default_for(Section::Listening);
    listening.audio_files = Some(vec![AudioFile {
        id: 1,
        title: "Ward Round Discussion".into(),
        url: "/static/audio/ward_round.mp3".into(),
        transcript: "Medical team discussion transcript...".into(),
    }]);
    listening.questions = vec![Question::multiple_choice(
        1,
        "What was discussed about the patient's medication?",
        &["Increase dosage", "Change medication", "Continue current", "Stop treatment"],
        1,
    )];

    TestDefinition {
        metadata: metadata(
            105,
            "OET Listening Mock Test",
            "Listening",
            30,
            "Focused listening comprehension test",
            true,
            false,
        ),
        content: single_section(Section::Listening, listening),
        test_type: TestKind::Mock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn built_in_catalogue_serves_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = LegacyTestStore::new(DocumentStore::new(dir.path()));

        let practice = store.practice_tests().await;
        assert_eq!(practice.len(), 4);
        assert!(practice.iter().all(|t| !t.metadata.is_mock_test));

        let found = store.get(100).await.expect("embedded mock test");
        assert_eq!(found.metadata.section, ALL_SECTIONS);
        assert_eq!(found.test_type, TestKind::Mock);
        assert_eq!(found.content.sections.len(), 4);

        assert!(store.get(999).await.is_none());
    }

    #[tokio::test]
    async fn untagged_migrated_documents_load_and_are_retagged() {
        let dir = tempfile::tempdir().unwrap();
        // A flat list written before the collection tag existed.
        let raw = serde_json::json!([{
            "id": 7,
            "title": "Migrated Listening Test",
            "section": "Listening",
            "duration_minutes": 30,
            "content": { "sections": {} }
        }]);
        tokio::fs::write(
            dir.path().join(document_store::FULL_MOCK_TESTS),
            raw.to_string(),
        )
        .await
        .unwrap();

        let store = LegacyTestStore::new(DocumentStore::new(dir.path()));
        let mocks = store.mock_tests().await;
        assert_eq!(mocks.len(), 1);
        assert_eq!(mocks[0].metadata.title, "Migrated Listening Test");

        let found = store.get(7).await.expect("migrated test");
        assert_eq!(found.test_type, TestKind::Mock);
    }

    #[tokio::test]
    async fn stored_list_overrides_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let doc_store = DocumentStore::new(dir.path());
        let empty: Vec<TestDefinition> = Vec::new();
        doc_store.save(document_store::PRACTICE_TESTS, &empty).await;

        let store = LegacyTestStore::new(doc_store);
        assert!(store.practice_tests().await.is_empty());
        assert!(store.get(1).await.is_none());
    }
}
