use crate::Token;
use lazy_static::lazy_static;
use regex::{Matches, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::{FromStr, Split};

lazy_static! {
    // A lowercase run, or one capital followed by its lowercase tail.
    static ref CAMEL_RUN: Regex = Regex::new(r"[a-z]+|[A-Z][a-z]*").unwrap();
}

/// How a line is cut into word candidates.
///
/// Both policies agree on plain text. They differ only in offset bookkeeping
/// around characters that are neither delimiters nor part of a camel-case run
/// (`_` for instance): `Split` advances by run length only, `Scan` reports the
/// true position in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerPolicy {
    /// Split on non-word characters and digits, then decompose camel case.
    Split,
    /// Scan the raw line for camel-case runs.
    #[default]
    Scan,
}

impl FromStr for TokenizerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "split" => Ok(TokenizerPolicy::Split),
            "scan" => Ok(TokenizerPolicy::Scan),
            _ => Err(format!("Unknown tokenizer policy: {}", s)),
        }
    }
}

impl fmt::Display for TokenizerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerPolicy::Split => write!(f, "split"),
            TokenizerPolicy::Scan => write!(f, "scan"),
        }
    }
}

impl TokenizerPolicy {
    /// Lazily tokenize one line. Zero-length tokens are never produced.
    pub fn tokenize<'a>(&self, line: &'a str) -> Tokens<'a> {
        match self {
            TokenizerPolicy::Split => Tokens::Split(SplitTokens::new(line)),
            TokenizerPolicy::Scan => Tokens::Scan(ScanTokens::new(line)),
        }
    }
}

pub enum Tokens<'a> {
    Split(SplitTokens<'a>),
    Scan(ScanTokens<'a>),
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Tokens::Split(tokens) => tokens.next(),
            Tokens::Scan(tokens) => tokens.next(),
        }
    }
}

/// Anything outside `[A-Za-z_]` separates candidates.
fn is_delimiter(ch: char) -> bool {
    !(ch.is_ascii_alphabetic() || ch == '_')
}

pub struct SplitTokens<'a> {
    candidates: Split<'a, fn(char) -> bool>,
    runs: Option<Matches<'static, 'a>>,
    candidate: &'a str,
    candidate_column: usize,
    // host offset, advanced by run length only
    offset: usize,
    // true char position of the next candidate
    cursor: usize,
}

impl<'a> SplitTokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            candidates: line.split(is_delimiter as fn(char) -> bool),
            runs: None,
            candidate: "",
            candidate_column: 0,
            offset: 0,
            cursor: 0,
        }
    }
}

impl<'a> Iterator for SplitTokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(runs) = self.runs.as_mut() {
                if let Some(run) = runs.next() {
                    let start = self.offset;
                    self.offset += run.as_str().chars().count();
                    let column =
                        self.candidate_column + self.candidate[..run.start()].chars().count();
                    return Some(Token {
                        text: run.as_str(),
                        start,
                        end: self.offset,
                        column,
                    });
                }
                self.runs = None;
                // the delimiter that ended this candidate
                self.offset += 1;
                continue;
            }

            let candidate = self.candidates.next()?;
            let len = candidate.chars().count();
            self.candidate = candidate;
            self.candidate_column = self.cursor;
            self.cursor += len + 1;

            if CAMEL_RUN.is_match(candidate) {
                self.runs = Some(CAMEL_RUN.find_iter(candidate));
                continue;
            }

            // No camel-case run: the whole candidate is the token.
            let start = self.offset;
            self.offset += len + 1;
            if len > 0 {
                return Some(Token {
                    text: candidate,
                    start,
                    end: start + len,
                    column: self.candidate_column,
                });
            }
        }
    }
}

pub struct ScanTokens<'a> {
    line: &'a str,
    matches: Matches<'static, 'a>,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> ScanTokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            matches: CAMEL_RUN.find_iter(line),
            byte_pos: 0,
            char_pos: 0,
        }
    }
}

impl<'a> Iterator for ScanTokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.matches.next()?;
        self.char_pos += self.line[self.byte_pos..m.start()].chars().count();
        let start = self.char_pos;
        self.char_pos += m.as_str().chars().count();
        self.byte_pos = m.end();
        Some(Token {
            text: m.as_str(),
            start,
            end: self.char_pos,
            column: start,
        })
    }
}
