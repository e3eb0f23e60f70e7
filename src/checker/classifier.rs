use crate::checker::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::{Misspelling, MisspellingRange, Token};
use regex::Regex;

/// Turns tokens into misspelling ranges by asking the dictionary.
pub struct Classifier {
    ignore_patterns: Vec<Regex>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            ignore_patterns: Vec::new(),
        }
    }

    /// Compile ignore patterns. A token matching any of them is never flagged.
    pub fn with_ignore_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let ignore_patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { ignore_patterns })
    }

    /// Flag every token the dictionary rejects, left to right.
    pub fn classify_line<'a, D, I>(
        &self,
        dictionary: &D,
        line: usize,
        tokens: I,
    ) -> Vec<MisspellingRange>
    where
        D: Dictionary + ?Sized,
        I: IntoIterator<Item = Token<'a>>,
    {
        self.find_misspellings(dictionary, line, tokens)
            .into_iter()
            .map(|misspelling| misspelling.range)
            .collect()
    }

    /// Like [`Classifier::classify_line`], keeping the rejected word and
    /// its true position alongside each range.
    pub fn find_misspellings<'a, D, I>(
        &self,
        dictionary: &D,
        line: usize,
        tokens: I,
    ) -> Vec<Misspelling>
    where
        D: Dictionary + ?Sized,
        I: IntoIterator<Item = Token<'a>>,
    {
        tokens
            .into_iter()
            .filter(|token| !token.is_empty())
            .filter(|token| !self.should_ignore(token.text))
            .filter(|token| !dictionary.check(token.text))
            .map(|token| Misspelling {
                range: MisspellingRange::new(line, token.start, token.end),
                word: token.text.to_string(),
                column: token.column,
            })
            .collect()
    }

    fn should_ignore(&self, word: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| pattern.is_match(word))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
