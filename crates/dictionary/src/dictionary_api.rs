// https://dictionaryapi.dev/ - free, no key. Unknown words answer 404 with an error object.

use serde::Deserialize;

use crate::{
    dictionary::{Phonetic, Word, WordDefinition, WordMeaning},
    DictionaryError, NotFoundError,
};

pub(crate) const DEFAULT_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

const PUNCTUATION: &str = "punctuation";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Entries(Vec<ApiEntry>),
    NotFound(ApiNotFound),
}

#[derive(Debug, Deserialize)]
struct ApiNotFound {
    title: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEntry {
    word: String,
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    origin: Option<String>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

pub(crate) async fn get_definitions(
    client: &reqwest::Client,
    base_url: &str,
    word: &str,
) -> Result<Vec<Word>, DictionaryError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(DictionaryError::EmptyQuery);
    }
    let url = entry_url(base_url, word)?;
    tracing::debug!(%url, "looking up word");
    let res: reqwest::Response = client
        .get(url)
        .send()
        .await
        .map_err(DictionaryError::Fetch)?;
    let status = res.status();
    let body = res
        .json::<ApiResponse>()
        .await
        .map_err(DictionaryError::Deserialize)?;
    tracing::debug!(%status, "dictionary responded");
    into_words(body)
}

fn entry_url(base_url: &str, word: &str) -> Result<reqwest::Url, DictionaryError> {
    let invalid = || DictionaryError::InvalidUrl(base_url.to_owned());
    let mut url = reqwest::Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(word);
    Ok(url)
}

fn into_words(response: ApiResponse) -> Result<Vec<Word>, DictionaryError> {
    match response {
        ApiResponse::NotFound(not_found) => Err(DictionaryError::NotFound(NotFoundError {
            title: not_found.title,
            message: not_found.message,
        })),
        ApiResponse::Entries(entries) if entries.is_empty() => {
            Err(DictionaryError::NotFound(NotFoundError {
                title: "No Definitions Found".to_owned(),
                message: String::new(),
            }))
        }
        ApiResponse::Entries(entries) => Ok(entries.into_iter().map(Word::from).collect()),
    }
}

impl From<ApiEntry> for Word {
    fn from(entry: ApiEntry) -> Self {
        Word {
            word: entry.word,
            phonetic: entry.phonetic,
            phonetics: entry
                .phonetics
                .into_iter()
                .map(|phonetic| Phonetic {
                    text: phonetic.text,
                    audio: phonetic.audio.filter(|audio| !audio.is_empty()),
                })
                .collect(),
            origin: entry.origin,
            meanings: entry
                .meanings
                .into_iter()
                .filter(|meaning| meaning.part_of_speech != PUNCTUATION)
                .map(WordMeaning::from)
                .collect(),
        }
    }
}

impl From<ApiMeaning> for WordMeaning {
    fn from(meaning: ApiMeaning) -> Self {
        WordMeaning {
            part_of_speech: meaning.part_of_speech,
            definitions: meaning
                .definitions
                .into_iter()
                .map(|definition| WordDefinition {
                    definition: definition.definition,
                    example: definition.example,
                    synonyms: definition.synonyms,
                    antonyms: definition.antonyms,
                })
                .collect(),
            synonyms: meaning.synonyms,
            antonyms: meaning.antonyms,
        }
    }
}
