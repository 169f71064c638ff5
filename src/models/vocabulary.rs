use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: i64,
    pub word: String,
    pub definition: String,
    #[serde(default = "default_specialty")]
    pub specialty: String,
}

fn default_specialty() -> String {
    "General".to_string()
}

/// Per-user learning progress, keyed by stringified user id in the stored
/// document.
pub type VocabularyProgressMap = BTreeMap<String, VocabularyProgress>;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VocabularyProgress {
    #[serde(default)]
    pub learned_words: Vec<i64>,
}
