//! Buffer statistics

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::split_lines;

/// Reading speed used for the reading time estimate
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// Counts and averages describing a buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextStatistics {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub sentences: usize,
    pub lines: usize,
    pub paragraphs: usize,
    pub avg_word_length: f64,
    pub reading_time_minutes: f64,
}

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+(?:[-'][A-Za-z]+)*").expect("word regex should compile")
});

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+\s+|[.!?]+$").expect("sentence regex should compile")
});

/// Extract words: runs of ASCII letters, optionally joined by a single `-` or `'`.
///
/// `"don't stop-motion"` yields `["don't", "stop-motion"]`; `"a--b"` yields
/// `["a", "b"]`.
pub fn extract_words(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Count sentences: non-blank runs delimited by one or more of `. ! ?`
/// followed by whitespace or the end of the text.
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Compute statistics for `text`. An empty buffer yields all zeros.
pub fn statistics(text: &str) -> TextStatistics {
    if text.is_empty() {
        return TextStatistics::default();
    }

    let words = extract_words(text);
    let word_count = words.len();
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();

    let avg_word_length = if word_count > 0 {
        letters as f64 / word_count as f64
    } else {
        0.0
    };

    TextStatistics {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|&c| c != ' ').count(),
        words: word_count,
        sentences: count_sentences(text),
        lines: split_lines(text).len(),
        paragraphs: text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .count(),
        avg_word_length,
        reading_time_minutes: word_count as f64 / WORDS_PER_MINUTE,
    }
}
