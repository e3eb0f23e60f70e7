use crate::checker::suggestions;
use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Word-correctness capability injected into every engine.
///
/// Construction and loading are the caller's business; the engine only asks
/// whether the dictionary is ready, whether a word is known, and for ranked
/// replacements.
pub trait Dictionary {
    fn is_ready(&self) -> bool {
        true
    }

    fn check(&self, word: &str) -> bool;

    fn suggest(&self, word: &str) -> Vec<String>;
}

/// FST-backed word set with a personal word overlay.
pub struct FstDictionary {
    set: Set<Vec<u8>>,
    personal_words: HashSet<String>,
    case_sensitive: bool,
    max_suggestions: usize,
}

impl FstDictionary {
    /// Load a dictionary file.
    ///
    /// Files ending in `.dict` or `.fst` are read as a compiled FST set, any
    /// other file as a plain word list with one word per line.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        let compiled = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("dict") | Some("fst")
        );

        if compiled {
            let set = Set::new(bytes).context("Failed to parse dictionary")?;
            return Ok(Self::from_set(set));
        }

        let content = String::from_utf8(bytes)
            .with_context(|| format!("Dictionary is not valid UTF-8: {}", path.display()))?;
        Self::from_words(read_word_list(&content))
    }

    /// Build an in-memory dictionary from a word list.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted_words: Vec<String> =
            words.into_iter().map(|w| w.as_ref().to_string()).collect();
        sorted_words.sort();
        sorted_words.dedup();

        let mut builder = SetBuilder::memory();
        for word in &sorted_words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }
        let bytes = builder.into_inner().context("Failed to finalize dictionary")?;
        let set = Set::new(bytes).context("Failed to parse dictionary")?;

        Ok(Self::from_set(set))
    }

    fn from_set(set: Set<Vec<u8>>) -> Self {
        Self {
            set,
            personal_words: HashSet::new(),
            case_sensitive: false,
            max_suggestions: 5,
        }
    }

    /// Accept extra words from a personal list (one per line, `#` comments).
    pub fn with_personal_words(mut self, content: &str) -> Self {
        for word in read_word_list(content) {
            self.personal_words.insert(word.to_lowercase());
        }
        self
    }

    pub fn with_personal_dictionary(self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read personal dictionary: {}", path.display()))?;
        Ok(self.with_personal_words(&content))
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Check if word exists in the word set, as stored
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Collect up to `limit` words whose length is within `max_diff` chars of `len`.
    ///
    /// WARNING: walks the whole set until `limit` is reached. Prefer
    /// `words_with_prefix()` or `contains()` where possible.
    pub fn words_near_length(&self, len: usize, max_diff: usize, limit: usize) -> Vec<String> {
        let mut words = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if words.len() >= limit {
                break;
            }
            if let Ok(word) = std::str::from_utf8(key) {
                if word.chars().count().abs_diff(len) <= max_diff {
                    words.push(word.to_string());
                }
            }
        }

        words
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }
}

impl Dictionary for FstDictionary {
    fn check(&self, word: &str) -> bool {
        let word = self.normalize(word);
        self.personal_words.contains(&word.to_lowercase()) || self.contains(&word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        suggestions::generate(&self.normalize(word), self, self.max_suggestions)
    }
}

fn read_word_list(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty() && !word.starts_with('#'))
}

/// A dictionary slot that reports not-ready until one is installed.
///
/// Engines sharing the slot skip their checks until then and pick the
/// dictionary up on their next trigger.
pub struct PendingDictionary<D> {
    slot: RefCell<Option<D>>,
}

impl<D> Default for PendingDictionary<D> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<D: Dictionary> PendingDictionary<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, dictionary: D) {
        *self.slot.borrow_mut() = Some(dictionary);
    }
}

impl<D: Dictionary> Dictionary for PendingDictionary<D> {
    fn is_ready(&self) -> bool {
        self.slot.borrow().as_ref().is_some_and(|d| d.is_ready())
    }

    /// Unknown until installed: nothing is flagged.
    fn check(&self, word: &str) -> bool {
        self.slot.borrow().as_ref().map_or(true, |d| d.check(word))
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        self.slot
            .borrow()
            .as_ref()
            .map(|d| d.suggest(word))
            .unwrap_or_default()
    }
}
