use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://flashcards.db";
const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the saved words live
    pub database_url: String,
    /// Entries endpoint, the word is appended as the last path segment
    pub dictionary_url: String,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };
        Config {
            database_url: read("FLASHCARDS_DATABASE_URL", DEFAULT_DATABASE_URL),
            dictionary_url: read("DICTIONARY_API_URL", DEFAULT_DICTIONARY_URL),
            log_filter: read("FLASHCARDS_LOG", DEFAULT_LOG_FILTER),
        }
    }
}
