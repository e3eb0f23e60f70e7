pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;

pub use checker::dictionary::{Dictionary, FstDictionary, PendingDictionary};
pub use checker::scheduler::CheckState;
pub use checker::tokenizer::TokenizerPolicy;
pub use checker::{EngineOptions, EngineState, SpellCheckEngine};
pub use config::Config;
pub use error::{Error, Result};
pub use host::memory::MemoryHost;
pub use host::{HostAdapter, Subscription};

use serde::Serialize;

/// A word candidate cut out of a single line.
///
/// `start` and `end` are the char offsets reported to the host, end-exclusive.
/// `column` is where the text really sits in the line; it differs from
/// `start` only where a policy's offset bookkeeping skips characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub column: usize,
}

impl Token<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One flagged token: `(line, start_column, end_column)`, columns end-exclusive.
///
/// Only valid for the text it was computed from. Ranges are recomputed after
/// every edit, never shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MisspellingRange {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl MisspellingRange {
    pub fn new(line: usize, start_column: usize, end_column: usize) -> Self {
        debug_assert!(start_column < end_column);
        Self {
            line,
            start_column,
            end_column,
        }
    }

    pub fn len(&self) -> usize {
        self.end_column - self.start_column
    }

    pub fn is_empty(&self) -> bool {
        self.start_column == self.end_column
    }

    /// Slice the flagged word out of the line it was computed from.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let mut bounds = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()));
        let start = bounds.nth(self.start_column).unwrap_or(line.len());
        let end = bounds
            .nth(self.end_column - self.start_column - 1)
            .unwrap_or(line.len());
        &line[start..end]
    }
}

/// A flagged token together with the word that was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    pub range: MisspellingRange,
    pub word: String,
    /// Char offset of `word` in its line.
    pub column: usize,
}

/// Opaque marker id issued by a host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationHandle(pub u64);

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub error_count: usize,
    pub errors: Vec<SpellError>,
}

#[derive(Debug, Clone)]
pub struct SpellError {
    pub word: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub suggestions: Vec<String>,
}
