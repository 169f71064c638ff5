use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct WordPayload {
    #[validate(length(min = 1))]
    pub word: String,
    #[validate(length(min = 1))]
    pub definition: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Debug, Deserialize)]
pub struct VocabularyQuery {
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WordCheckPayload {
    #[validate(length(min = 1))]
    pub word: String,
}
