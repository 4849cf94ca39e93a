#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub word: String,
    pub phonetic: Option<String>,
    pub phonetics: Vec<Phonetic>,
    pub origin: Option<String>,
    pub meanings: Vec<WordMeaning>,
}

impl Word {
    /// Every definition of the word in display order, paired with its part of speech.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &WordDefinition)> {
        self.meanings.iter().flat_map(|meaning| {
            meaning
                .definitions
                .iter()
                .map(move |definition| (&meaning.part_of_speech[..], definition))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordMeaning {
    /// Free-form part of speech as reported by the API ("noun", "verb", ...)
    pub part_of_speech: String,
    pub definitions: Vec<WordDefinition>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordDefinition {
    pub definition: String,
    pub example: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}
