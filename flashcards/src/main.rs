use std::io;

use config::Config;
use dictionary::{Dictionary, DictionaryError, Word};
use models::{Definition, Meaning, SavedWord};
use quiz::{GradedResult, QuizEngine};
use repository::{MergeOutcome, WordRepository};
use storage::{KeyValueStore, Storage};
use tracing_subscriber::EnvFilter;
use utilities::{input, parse_position, str_to_bool, strip_line_ending};

mod config;
mod models;
mod quiz;
mod repository;
mod storage;
mod utilities;

/// A definition from the last lookup that can be saved with `save <n>`.
struct Candidate {
    word: String,
    meaning: Meaning,
}

/// Reads one line of user input after showing a prompt.
type Prompt = Box<dyn FnMut(&str) -> io::Result<String>>;

struct Session<S> {
    dict: Dictionary,
    repository: WordRepository<S>,
    quiz: QuizEngine,
    candidates: Vec<Candidate>,
    prompt: Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let storage = Storage::initialize(&config.database_url).await?;
    tracing::debug!(database_url = %config.database_url, "storage ready");
    let mut session = Session {
        dict: Dictionary::with_base_url(config.dictionary_url),
        repository: WordRepository::open(storage).await?,
        quiz: QuizEngine::new(),
        candidates: Vec::new(),
        prompt: Box::new(input),
    };

    loop {
        let line = (session.prompt)(">> ")?;
        if line.is_empty() {
            // stdin closed
            break;
        }
        if !session.handle_line(&line).await {
            break;
        }
    }
    Ok(())
}

impl<S: KeyValueStore> Session<S> {
    /// Runs one command line. Returns `false` when the user asked to leave.
    async fn handle_line(&mut self, line: &str) -> bool {
        let mut command_parts = line.trim().split_ascii_whitespace();
        let Some(command) = command_parts.next() else {
            return true;
        };
        let argument = command_parts.collect::<Vec<&str>>().join(" ");
        let result = match command {
            "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                return false;
            }
            "define" | "find" | "search" => {
                self.define_word(&argument).await;
                Ok(())
            }
            "save" => self.save_definition(&argument).await.map(drop),
            "words" | "cards" | "list" => {
                self.list_words();
                Ok(())
            }
            "flip" => {
                self.flip_card(&argument);
                Ok(())
            }
            "remove" => self.remove_word(&argument).await.map(drop),
            "clear" => self.clear_words().await.map(drop),
            "quiz" | "practice" => self.practice().await.map(drop),
            "help" => {
                print_help();
                Ok(())
            }
            _ => {
                println!("Unknown command {command}. Type 'help' to see the commands.");
                Ok(())
            }
        };
        if let Err(error) = result {
            tracing::error!(error = %error, command, "command failed");
            println!("Something went wrong ({error}). Your saved words were not changed.");
        }
        true
    }

    async fn define_word(&mut self, word: &str) {
        match self.dict.get_definitions(word).await {
            Ok(words) => {
                self.candidates = candidates(&words);
                let mut number = 0;
                for word in &words {
                    number = print_definition(word, number);
                }
                if !self.candidates.is_empty() {
                    println!("Use 'save <number>' to keep a definition.");
                }
            }
            Err(DictionaryError::NotFound(not_found)) => {
                tracing::debug!(%not_found, "word not found");
                self.candidates.clear();
                println!("The word \"{word}\" does not exist in the dictionary.");
            }
            Err(DictionaryError::EmptyQuery) => {
                println!("Usage: define <word>");
            }
            Err(error) => {
                tracing::error!(%error, word, "dictionary lookup failed");
                self.candidates.clear();
                println!("No results.");
            }
        }
    }

    async fn save_definition(&mut self, argument: &str) -> anyhow::Result<Option<MergeOutcome>> {
        let Some(candidate) = parse_position(argument).and_then(|index| self.candidates.get(index))
        else {
            println!("Search for a word first, then use 'save <number>'.");
            return Ok(None);
        };
        let word = candidate.word.clone();
        let meaning = candidate.meaning.clone();
        let outcome = self.repository.upsert_definition(&word, meaning).await?;
        match outcome {
            MergeOutcome::Duplicate => println!("That definition of \"{word}\" is already saved."),
            MergeOutcome::Ignored => println!("Nothing to save."),
            _ => println!("The definition for \"{word}\" has been saved."),
        }
        Ok(Some(outcome))
    }

    fn list_words(&self) {
        let words = self.repository.words();
        if words.is_empty() {
            println!("You have no saved words yet.");
            return;
        }
        println!("Your flashcards:");
        for (index, saved) in words.iter().enumerate() {
            println!("[{}]: {}", index + 1, saved.word);
        }
    }

    fn flip_card(&self, argument: &str) {
        let Some(saved) = parse_position(argument).and_then(|index| self.repository.words().get(index))
        else {
            println!("There is no such card.");
            return;
        };
        println!("{}", saved.word);
        for meaning in &saved.meanings {
            println!("    {}:", meaning.part_of_speech);
            for definition in &meaning.definitions {
                println!("        {}", definition.text);
                if let Some(example) = &definition.example {
                    println!("          example: {example}");
                }
            }
        }
    }

    async fn remove_word(&mut self, argument: &str) -> anyhow::Result<Option<SavedWord>> {
        let removed = match parse_position(argument) {
            Some(index) => self.repository.remove(index).await?,
            None => None,
        };
        match &removed {
            Some(saved) => println!("Deleted \"{}\" successfully.", saved.word),
            None => println!("There is no such card."),
        }
        Ok(removed)
    }

    /// Returns whether the words were deleted.
    async fn clear_words(&mut self) -> anyhow::Result<bool> {
        let answer = (self.prompt)("Delete all saved words? (y/N): ")?;
        if !str_to_bool(answer).unwrap_or(false) {
            return Ok(false);
        }
        self.repository.clear().await?;
        println!("All saved words were deleted.");
        Ok(true)
    }

    async fn practice(&mut self) -> anyhow::Result<Option<GradedResult>> {
        self.repository.load_all().await?;
        let items = self.quiz.build(self.repository.words()).to_vec();
        if items.is_empty() {
            println!("Save some words before quizzing yourself.");
            return Ok(None);
        }
        println!("Type the word for each definition (':s' to skip).");
        for (index, item) in items.iter().enumerate() {
            println!("{}: ({}) Definition - {}", index + 1, item.part_of_speech, item.prompt);
            let line = (self.prompt)("   word: ")?;
            let answer = strip_line_ending(&line);
            if matches!(&answer.trim().to_lowercase()[..], ":s" | ":skip") {
                continue;
            }
            self.quiz.set_answer(index, answer)?;
        }

        let graded = self.quiz.grade()?;
        println!("Results ({}/{}):", graded.score(), items.len());
        let answers = self.quiz.answers();
        for ((index, item), correct) in self.quiz.items().iter().enumerate().zip(&graded.results) {
            if *correct {
                println!("{}: Correct", index + 1);
                continue;
            }
            let answer = answers[index].to_lowercase();
            let similarity = strsim::jaro(&item.word.to_lowercase(), &answer);
            if !answer.is_empty() && similarity > 0.85 {
                println!("{}: Wrong, but close. Correct answer: {}", index + 1, item.word);
            } else {
                println!("{}: Wrong. Correct answer: {}", index + 1, item.word);
            }
        }
        if !self.quiz.corrections().is_empty() {
            println!("Words to review: {}", self.quiz.corrections().join(", "));
        }
        Ok(Some(graded))
    }
}

fn candidates(words: &[Word]) -> Vec<Candidate> {
    words
        .iter()
        .flat_map(|word| {
            word.definitions().map(move |(part_of_speech, definition)| Candidate {
                word: word.word.clone(),
                meaning: Meaning::single(part_of_speech, Definition::from(definition)),
            })
        })
        .collect()
}

/// Prints one entry, numbering its definitions after `number`. Returns the last number used.
fn print_definition(word: &Word, mut number: usize) -> usize {
    println!("Showing definition for '{}':", word.word);
    if let Some(phonetic) = &word.phonetic {
        println!("    {phonetic}");
    }
    for meaning in &word.meanings {
        println!("    {}:", meaning.part_of_speech);
        for definition in &meaning.definitions {
            number += 1;
            println!("      [{number}] {}", definition.definition);
            if let Some(example) = &definition.example {
                println!("          example: {example}");
            }
            if !definition.synonyms.is_empty() {
                println!("          synonyms: {}", definition.synonyms.join(", "));
            }
            if !definition.antonyms.is_empty() {
                println!("          antonyms: {}", definition.antonyms.join(", "));
            }
        }
        if !meaning.synonyms.is_empty() {
            println!("      synonyms: {}", meaning.synonyms.join(", "));
        }
        if !meaning.antonyms.is_empty() {
            println!("      antonyms: {}", meaning.antonyms.join(", "));
        }
    }
    number
}

fn print_help() {
    println!("define <word>   look up a word");
    println!("save <n>        save definition n of the last lookup");
    println!("words           list your flashcards");
    println!("flip <n>        show the back of card n");
    println!("remove <n>      delete card n");
    println!("clear           delete every card");
    println!("quiz            quiz yourself on your cards");
    println!("exit            leave");
}
