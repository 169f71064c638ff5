use crate::models::vocabulary::{VocabularyProgress, VocabularyProgressMap, VocabularyWord};
use crate::store::{document_store, next_id, Document, DocumentStore};
use serde::Serialize;

impl Document for VocabularyWord {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct VocabularyService {
    store: DocumentStore,
}

/// Outcome of a free-form word lookup.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WordCheck {
    Known {
        correct: bool,
        word: String,
        definition: String,
        specialty: String,
    },
    Unknown {
        correct: bool,
        message: String,
    },
}

impl VocabularyService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn words(&self, specialty: Option<&str>) -> Vec<VocabularyWord> {
        let words: Vec<VocabularyWord> =
            self.store.load(document_store::VOCABULARY, Vec::new()).await;
        match specialty {
            Some(filter) => words
                .into_iter()
                .filter(|w| w.specialty.eq_ignore_ascii_case(filter))
                .collect(),
            None => words,
        }
    }

    pub async fn get_word(&self, word_id: i64) -> Option<VocabularyWord> {
        self.words(None).await.into_iter().find(|w| w.id == word_id)
    }

    pub async fn add_word(&self, word: &str, definition: &str, specialty: &str) -> bool {
        let mut words = self.words(None).await;
        let entry = VocabularyWord {
            id: next_id(&words),
            word: word.to_string(),
            definition: definition.to_string(),
            specialty: normalize_specialty(specialty),
        };
        words.push(entry);
        self.store.save(document_store::VOCABULARY, &words).await
    }

    pub async fn update_word(
        &self,
        word_id: i64,
        word: &str,
        definition: &str,
        specialty: &str,
    ) -> bool {
        let mut words = self.words(None).await;
        let Some(entry) = words.iter_mut().find(|w| w.id == word_id) else {
            return false;
        };
        entry.word = word.to_string();
        entry.definition = definition.to_string();
        entry.specialty = normalize_specialty(specialty);
        self.store.save(document_store::VOCABULARY, &words).await
    }

    pub async fn delete_word(&self, word_id: i64) -> bool {
        let mut words = self.words(None).await;
        words.retain(|w| w.id != word_id);
        self.store.save(document_store::VOCABULARY, &words).await
    }

    pub async fn progress_for(&self, user_id: i64) -> VocabularyProgress {
        let progress: VocabularyProgressMap = self
            .store
            .load(document_store::VOCABULARY_PROGRESS, Default::default())
            .await;
        progress.get(&user_id.to_string()).cloned().unwrap_or_default()
    }

    /// Mark a word learned; false when it was already recorded.
    pub async fn mark_learned(&self, user_id: i64, word_id: i64) -> bool {
        let mut progress: VocabularyProgressMap = self
            .store
            .load(document_store::VOCABULARY_PROGRESS, Default::default())
            .await;
        let entry = progress.entry(user_id.to_string()).or_default();
        if entry.learned_words.contains(&word_id) {
            return false;
        }
        entry.learned_words.push(word_id);
        self.store
            .save(document_store::VOCABULARY_PROGRESS, &progress)
            .await
    }

    /// Case-insensitive dictionary check for the vocabulary quiz.
    pub async fn check_word(&self, word: &str) -> WordCheck {
        let needle = word.to_lowercase();
        match self
            .words(None)
            .await
            .into_iter()
            .find(|w| w.word.to_lowercase() == needle)
        {
            Some(found) => WordCheck::Known {
                correct: true,
                word: found.word,
                definition: found.definition,
                specialty: found.specialty,
            },
            None => WordCheck::Unknown {
                correct: false,
                message: format!("\"{word}\" is not found in our medical vocabulary database."),
            },
        }
    }
}

fn normalize_specialty(specialty: &str) -> String {
    if specialty.trim().is_empty() {
        "General".to_string()
    } else {
        specialty.to_string()
    }
}
