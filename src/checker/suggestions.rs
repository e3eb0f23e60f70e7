use crate::checker::dictionary::FstDictionary;

/// Keyboard-adjacent and phonetic swaps worth trying on every char.
const COMMON_SWAPS: [(char, char); 11] = [
    ('a', 'e'),
    ('e', 'i'),
    ('i', 'o'),
    ('o', 'u'),
    ('b', 'v'),
    ('c', 'k'),
    ('f', 'v'),
    ('g', 'j'),
    ('m', 'n'),
    ('s', 'z'),
    ('t', 'd'),
];

/// Rank replacement candidates for `word`, closest first.
///
/// Cheap sources are tried first and the search stops as soon as
/// `max_suggestions` are found:
/// 1. words sharing a 3-char prefix, within distance 2
/// 2. single-edit variants (deletion, transposition, common swap) that exist
/// 3. words sharing a 2-char prefix, within distance 3
/// 4. for words of 3 chars or fewer, a bounded scan of similar-length words
pub fn generate(word: &str, dictionary: &FstDictionary, max_suggestions: usize) -> Vec<String> {
    let mut ranked = Ranked::new(max_suggestions);

    if let Some(prefix) = char_prefix(word, 3) {
        ranked.extend_by_distance(word, dictionary.words_with_prefix(prefix), 2);
    }

    if !ranked.is_full() {
        let known = single_edits(word)
            .into_iter()
            .filter(|candidate| dictionary.contains(candidate));
        ranked.extend(known);
    }

    if !ranked.is_full() {
        if let Some(prefix) = char_prefix(word, 2) {
            ranked.extend_by_distance(word, dictionary.words_with_prefix(prefix), 3);
        }
    }

    let word_len = word.chars().count();
    if !ranked.is_full() && word_len <= 3 {
        ranked.extend_by_distance(word, dictionary.words_near_length(word_len, 1, 100), 2);
    }

    ranked.into_vec()
}

struct Ranked {
    words: Vec<String>,
    max: usize,
}

impl Ranked {
    fn new(max: usize) -> Self {
        Self {
            words: Vec::with_capacity(max),
            max,
        }
    }

    fn is_full(&self) -> bool {
        self.words.len() >= self.max
    }

    fn push(&mut self, word: String) {
        if !self.is_full() && !self.words.contains(&word) {
            self.words.push(word);
        }
    }

    fn extend(&mut self, words: impl IntoIterator<Item = String>) {
        for word in words {
            if self.is_full() {
                break;
            }
            self.push(word);
        }
    }

    /// Add `candidates` within `max_distance` of `word`, nearest first.
    fn extend_by_distance(&mut self, word: &str, candidates: Vec<String>, max_distance: usize) {
        let mut scored: Vec<(usize, String)> = candidates
            .into_iter()
            .map(|candidate| (edit_distance(word, &candidate), candidate))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();
        // stable: equal distances keep dictionary order
        scored.sort_by_key(|(distance, _)| *distance);
        self.extend(scored.into_iter().map(|(_, candidate)| candidate));
    }

    fn into_vec(self) -> Vec<String> {
        self.words
    }
}

/// The first `n` chars of `word`, or `None` if it is shorter.
fn char_prefix(word: &str, n: usize) -> Option<&str> {
    match word.char_indices().nth(n) {
        Some((end, _)) => Some(&word[..end]),
        None if word.chars().count() == n => Some(word),
        None => None,
    }
}

/// Levenshtein distance over chars, single-row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(a_char != *b_char);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Deletions, adjacent transpositions and common swaps of `word`.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    for i in 0..chars.len() {
        let mut edit = chars.clone();
        edit.remove(i);
        edits.push(edit.into_iter().collect());
    }

    for i in 1..chars.len() {
        let mut edit = chars.clone();
        edit.swap(i - 1, i);
        edits.push(edit.into_iter().collect());
    }

    for (i, ch) in chars.iter().enumerate() {
        for &(_, to) in COMMON_SWAPS.iter().filter(|(from, _)| from == ch) {
            let mut edit = chars.clone();
            edit[i] = to;
            edits.push(edit.into_iter().collect());
        }
    }

    edits
}
