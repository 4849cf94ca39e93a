use crate::{
    models::{Meaning, SavedWord},
    storage::{KeyValueStore, StorageResult},
};

pub const SAVED_WORDS_KEY: &str = "savedWords";

/// What a save did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    NewWord,
    NewMeaning,
    NewDefinition,
    /// The definition text was already saved under that part of speech.
    Duplicate,
    /// The meaning carried no definition.
    Ignored,
}

impl MergeOutcome {
    pub fn changed(self) -> bool {
        matches!(
            self,
            MergeOutcome::NewWord | MergeOutcome::NewMeaning | MergeOutcome::NewDefinition
        )
    }
}

/// Saved words persisted as one JSON blob, with a cached copy of the last snapshot.
pub struct WordRepository<S> {
    store: S,
    words: Vec<SavedWord>,
}

impl<S: KeyValueStore> WordRepository<S> {
    pub async fn open(store: S) -> StorageResult<Self> {
        let mut repository = Self {
            store,
            words: Vec::new(),
        };
        repository.load_all().await?;
        Ok(repository)
    }

    /// Re-reads the blob. Missing or unreadable content counts as no words.
    pub async fn load_all(&mut self) -> StorageResult<&[SavedWord]> {
        self.words = match self.store.get(SAVED_WORDS_KEY).await? {
            None => Vec::new(),
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|error| {
                tracing::warn!(
                    %error,
                    key = SAVED_WORDS_KEY,
                    "saved words are unreadable, starting empty"
                );
                Vec::new()
            }),
        };
        Ok(&self.words)
    }

    pub fn words(&self) -> &[SavedWord] {
        &self.words
    }

    pub async fn upsert_definition(
        &mut self,
        word: &str,
        meaning: Meaning,
    ) -> StorageResult<MergeOutcome> {
        self.load_all().await?;
        let mut words = self.words.clone();
        let outcome = merge_definition(&mut words, word, meaning);
        tracing::debug!(word, ?outcome, "merged definition");
        if outcome.changed() {
            self.persist(words).await?;
        }
        Ok(outcome)
    }

    /// Removes the word at `index` of the cached snapshot. Out of range does nothing.
    pub async fn remove(&mut self, index: usize) -> StorageResult<Option<SavedWord>> {
        if index >= self.words.len() {
            tracing::debug!(index, len = self.words.len(), "remove out of range");
            return Ok(None);
        }
        let mut words = self.words.clone();
        let removed = words.remove(index);
        self.persist(words).await?;
        Ok(Some(removed))
    }

    pub async fn clear(&mut self) -> StorageResult<()> {
        self.store.remove(SAVED_WORDS_KEY).await?;
        self.words.clear();
        Ok(())
    }

    /// Writes `words` and only then makes them the cached snapshot.
    async fn persist(&mut self, words: Vec<SavedWord>) -> StorageResult<()> {
        let blob = serde_json::to_string(&words)?;
        self.store.set(SAVED_WORDS_KEY, &blob).await?;
        self.words = words;
        Ok(())
    }
}

/// Merges `meaning` into `words` by word, then part of speech, then the text
/// of its first definition.
///
/// A meaning without any definition is never stored, not even as the first
/// meaning of a new word; it yields [`MergeOutcome::Ignored`].
pub fn merge_definition(words: &mut Vec<SavedWord>, word: &str, mut meaning: Meaning) -> MergeOutcome {
    if meaning.definitions.is_empty() {
        return MergeOutcome::Ignored;
    }
    let Some(saved) = words.iter_mut().find(|saved| saved.word == word) else {
        dedup_definitions(&mut meaning);
        words.push(SavedWord {
            word: word.to_owned(),
            meanings: vec![meaning],
        });
        return MergeOutcome::NewWord;
    };
    let Some(existing) = saved
        .meanings
        .iter_mut()
        .find(|existing| existing.part_of_speech == meaning.part_of_speech)
    else {
        dedup_definitions(&mut meaning);
        saved.meanings.push(meaning);
        return MergeOutcome::NewMeaning;
    };
    let definition = meaning.definitions.swap_remove(0);
    if existing
        .definitions
        .iter()
        .any(|known| known.text == definition.text)
    {
        MergeOutcome::Duplicate
    } else {
        existing.definitions.push(definition);
        MergeOutcome::NewDefinition
    }
}

fn dedup_definitions(meaning: &mut Meaning) {
    let mut seen = Vec::with_capacity(meaning.definitions.len());
    meaning.definitions.retain(|definition| {
        if seen.contains(&definition.text) {
            false
        } else {
            seen.push(definition.text.clone());
            true
        }
    });
}
