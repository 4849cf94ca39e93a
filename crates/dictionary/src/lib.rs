use dictionary_api::{get_definitions, DEFAULT_API_URL};

mod dictionary;
mod dictionary_api;

pub use dictionary::{Phonetic, Word, WordDefinition, WordMeaning};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("cannot look up an empty word")]
    EmptyQuery,
    #[error("invalid dictionary url {0:?}")]
    InvalidUrl(String),
    #[error("failed to reach the dictionary: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("unexpected dictionary response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("{0}")]
    NotFound(NotFoundError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotFoundError {
    pub title: String,
    pub message: String,
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Points the client at another deployment of the entries endpoint,
    /// e.g. `https://api.dictionaryapi.dev/api/v2/entries/en`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Looks up every entry for `word`. Meanings tagged as punctuation are dropped.
    pub async fn get_definitions(&self, word: &str) -> Result<Vec<Word>, DictionaryError> {
        get_definitions(&self.client, &self.base_url, word).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
