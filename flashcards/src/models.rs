use dictionary::{WordDefinition, WordMeaning};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "definition")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

/// A word the user saved, keyed by its exact spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWord {
    pub word: String,
    // the web app stored meanings under "definitions"
    #[serde(default, alias = "definitions")]
    pub meanings: Vec<Meaning>,
}

impl Definition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            example: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

impl Meaning {
    /// The shape a single "save" produces: one part of speech, one definition.
    pub fn single(part_of_speech: impl Into<String>, definition: Definition) -> Self {
        Self {
            part_of_speech: part_of_speech.into(),
            definitions: vec![definition],
        }
    }
}

impl SavedWord {
    /// First definition of the first meaning, the prompt used on the card and in quizzes.
    pub fn headline(&self) -> Option<&Definition> {
        self.meanings
            .first()
            .and_then(|meaning| meaning.definitions.first())
    }
}

impl From<&WordDefinition> for Definition {
    fn from(definition: &WordDefinition) -> Self {
        let converted = Definition::new(definition.definition.clone());
        match &definition.example {
            Some(example) => converted.with_example(example.clone()),
            None => converted,
        }
    }
}

impl From<&WordMeaning> for Meaning {
    fn from(meaning: &WordMeaning) -> Self {
        Self {
            part_of_speech: meaning.part_of_speech.clone(),
            definitions: meaning.definitions.iter().map(Definition::from).collect(),
        }
    }
}
