use rand::{seq::SliceRandom, Rng};

use crate::models::SavedWord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    InProgress,
    Graded,
}

/// One question: guess `word` from `prompt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub word: String,
    pub part_of_speech: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedResult {
    /// Index-aligned with the quiz items.
    pub results: Vec<bool>,
    /// Expected words of the wrong answers, in quiz order.
    pub corrections: Vec<String>,
}

impl GradedResult {
    pub fn score(&self) -> usize {
        self.results.iter().filter(|correct| **correct).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("cannot {operation} while the quiz is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: QuizState,
    },
    #[error("question {index} does not exist, the quiz has {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub struct QuizEngine {
    state: QuizState,
    items: Vec<QuizItem>,
    answers: Vec<String>,
    results: Vec<Option<bool>>,
    corrections: Vec<String>,
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            state: QuizState::Idle,
            items: Vec::new(),
            answers: Vec::new(),
            results: Vec::new(),
            corrections: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[cfg(test)]
    /// `None` until the item has been graded.
    pub fn results(&self) -> &[Option<bool>] {
        &self.results
    }

    pub fn corrections(&self) -> &[String] {
        &self.corrections
    }

    pub fn build(&mut self, snapshot: &[SavedWord]) -> &[QuizItem] {
        self.build_with_rng(snapshot, &mut rand::thread_rng())
    }

    /// Starts a new quiz over `snapshot`, replacing any previous one.
    pub fn build_with_rng<R: Rng + ?Sized>(
        &mut self,
        snapshot: &[SavedWord],
        rng: &mut R,
    ) -> &[QuizItem] {
        let mut items: Vec<QuizItem> = snapshot.iter().map(quiz_item).collect();
        items.shuffle(rng);

        self.answers = vec![String::new(); items.len()];
        self.results = vec![None; items.len()];
        self.corrections.clear();
        self.items = items;
        self.state = QuizState::InProgress;
        tracing::debug!(questions = self.items.len(), "quiz started");
        &self.items
    }

    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), QuizError> {
        self.expect_in_progress("answer")?;
        let len = self.answers.len();
        let slot = self
            .answers
            .get_mut(index)
            .ok_or(QuizError::IndexOutOfRange { index, len })?;
        *slot = text.into();
        Ok(())
    }

    pub fn grade(&mut self) -> Result<GradedResult, QuizError> {
        self.expect_in_progress("grade")?;
        let mut results = Vec::with_capacity(self.items.len());
        for (item, answer) in self.items.iter().zip(&self.answers) {
            let correct = item.word.to_lowercase() == answer.to_lowercase();
            if !correct {
                self.corrections.push(item.word.clone());
            }
            results.push(correct);
        }
        self.results = results.iter().copied().map(Some).collect();
        self.state = QuizState::Graded;
        let graded = GradedResult {
            results,
            corrections: self.corrections.clone(),
        };
        tracing::debug!(score = graded.score(), total = self.items.len(), "quiz graded");
        Ok(graded)
    }

    fn expect_in_progress(&self, operation: &'static str) -> Result<(), QuizError> {
        match self.state {
            QuizState::InProgress => Ok(()),
            state => Err(QuizError::InvalidState { operation, state }),
        }
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn quiz_item(saved: &SavedWord) -> QuizItem {
    let meaning = saved.meanings.first();
    QuizItem {
        word: saved.word.clone(),
        part_of_speech: meaning
            .map(|meaning| meaning.part_of_speech.clone())
            .unwrap_or_default(),
        prompt: saved
            .headline()
            .map(|definition| definition.text.clone())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::models::{Definition, Meaning};

    fn saved(word: &str, definition: &str) -> SavedWord {
        SavedWord {
            word: word.to_owned(),
            meanings: vec![Meaning::single("noun", Definition::new(definition))],
        }
    }

    fn animals() -> Vec<SavedWord> {
        vec![
            saved("cat", "a small feline"),
            saved("dog", "a loyal canine"),
            saved("eel", "a slippery fish"),
            saved("owl", "a nocturnal bird"),
        ]
    }

    #[test]
    fn build_covers_every_word_once() {
        let words = animals();
        for seed in 0..20 {
            let mut quiz = QuizEngine::new();
            let items = quiz.build_with_rng(&words, &mut StdRng::seed_from_u64(seed));
            let mut quizzed: Vec<&str> = items.iter().map(|item| &item.word[..]).collect();
            quizzed.sort_unstable();
            assert_eq!(quizzed, ["cat", "dog", "eel", "owl"]);
        }
    }

    #[test]
    fn prompt_is_first_definition_of_first_meaning() {
        let word = SavedWord {
            word: "run".to_owned(),
            meanings: vec![
                Meaning {
                    part_of_speech: "verb".to_owned(),
                    definitions: vec![Definition::new("to move fast"), Definition::new("to flee")],
                },
                Meaning::single("noun", Definition::new("a jog")),
            ],
        };
        let mut quiz = QuizEngine::new();
        let items = quiz.build(&[word]);
        assert_eq!(
            items,
            [QuizItem {
                word: "run".to_owned(),
                part_of_speech: "verb".to_owned(),
                prompt: "to move fast".to_owned(),
            }]
        );
    }

    #[test]
    fn build_initializes_slots() {
        let mut quiz = QuizEngine::new();
        assert_eq!(quiz.state(), QuizState::Idle);
        quiz.build(&animals());
        assert_eq!(quiz.state(), QuizState::InProgress);
        assert_eq!(quiz.answers(), vec![String::new(); 4]);
        assert_eq!(quiz.results(), [None::<bool>; 4]);
    }

    #[test]
    fn matching_answers_grade_all_correct() {
        let mut quiz = QuizEngine::new();
        quiz.build(&animals());
        let words: Vec<String> = quiz.items().iter().map(|item| item.word.clone()).collect();
        for (index, word) in words.iter().enumerate() {
            let answer = if index % 2 == 0 { word.to_uppercase() } else { word.clone() };
            quiz.set_answer(index, answer).unwrap();
        }

        let graded = quiz.grade().unwrap();
        assert_eq!(graded.results, [true; 4]);
        assert!(graded.corrections.is_empty());
        assert_eq!(graded.score(), 4);
        assert_eq!(quiz.state(), QuizState::Graded);
        assert_eq!(quiz.results(), [Some(true); 4]);
    }

    #[test]
    fn wrong_answers_list_expected_words_in_order() {
        let mut quiz = QuizEngine::new();
        quiz.build(&animals());
        let expected: Vec<String> = quiz.items().iter().map(|item| item.word.clone()).collect();
        quiz.set_answer(0, "CAT").unwrap();
        quiz.set_answer(1, expected[1].clone()).unwrap();
        // no trimming
        quiz.set_answer(2, format!(" {}", expected[2])).unwrap();

        let graded = quiz.grade().unwrap();
        assert_eq!(graded.results[0], expected[0] == "cat");
        assert!(graded.results[1]);
        assert!(!graded.results[2]);
        assert!(!graded.results[3]);

        let mut corrections = Vec::new();
        if expected[0] != "cat" {
            corrections.push(expected[0].clone());
        }
        corrections.push(expected[2].clone());
        corrections.push(expected[3].clone());
        assert_eq!(graded.corrections, corrections);
    }

    #[test]
    fn cat_dog_example() {
        let words = vec![saved("cat", "a small feline"), saved("dog", "a loyal canine")];
        let mut quiz = QuizEngine::new();
        quiz.build(&words);
        let first = quiz.items()[0].word.clone();
        quiz.set_answer(0, first.to_uppercase()).unwrap();
        let graded = quiz.grade().unwrap();
        assert!(graded.results[0]);
        assert!(!graded.results[1]);
    }

    #[test]
    fn operations_outside_a_quiz_are_rejected() {
        let mut quiz = QuizEngine::new();
        assert_eq!(
            quiz.grade(),
            Err(QuizError::InvalidState {
                operation: "grade",
                state: QuizState::Idle
            })
        );
        assert!(matches!(
            quiz.set_answer(0, "cat"),
            Err(QuizError::InvalidState { .. })
        ));

        quiz.build(&animals());
        quiz.grade().unwrap();
        assert!(matches!(quiz.grade(), Err(QuizError::InvalidState { .. })));
        assert!(matches!(
            quiz.set_answer(0, "cat"),
            Err(QuizError::InvalidState { .. })
        ));
    }

    #[test]
    fn answer_index_is_checked() {
        let mut quiz = QuizEngine::new();
        quiz.build(&animals());
        assert_eq!(
            quiz.set_answer(4, "cat"),
            Err(QuizError::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn rebuilding_resets_corrections() {
        let mut quiz = QuizEngine::new();
        quiz.build(&animals());
        assert_eq!(quiz.grade().unwrap().corrections.len(), 4);

        quiz.build(&animals()[..1]);
        assert_eq!(quiz.state(), QuizState::InProgress);
        assert!(quiz.corrections().is_empty());
        assert_eq!(quiz.grade().unwrap().corrections, ["cat"]);
    }

    #[test]
    fn empty_snapshot_builds_empty_quiz() {
        let mut quiz = QuizEngine::new();
        assert!(quiz.build(&[]).is_empty());
        let graded = quiz.grade().unwrap();
        assert!(graded.results.is_empty());
    }
}
