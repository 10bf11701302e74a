//! Pure text transformations
//!
//! Every function takes the whole buffer and returns a new value; none of them
//! touch engine state. Line-based transforms split on every boundary
//! [`split_lines`] knows and always rejoin with `\n`, so a trailing newline is
//! not preserved.

mod readability;
mod stats;

use std::collections::HashSet;

pub use readability::{count_syllables, readability, Readability};
pub use stats::{count_sentences, extract_words, statistics, TextStatistics, WORDS_PER_MINUTE};

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n'
            | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split text into lines on any line boundary.
///
/// Boundaries are `\n`, `\r\n`, `\r`, vertical tab, form feed, the file,
/// group and record separators, NEL and the Unicode line and paragraph
/// separators. A trailing line terminator does not produce an empty final line
/// and an empty string has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, n)| n == '\n').is_some() {
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Full-buffer uppercase (Unicode, locale independent)
pub fn to_uppercase(text: &str) -> String {
    text.to_uppercase()
}

/// Full-buffer lowercase (Unicode, locale independent)
pub fn to_lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Uppercase the first character of `word` and lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Capitalize every whitespace-separated word.
///
/// Words are rejoined with a single space, so runs of whitespace and line
/// breaks collapse.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable sort of lines by code point
pub fn sort_lines(text: &str, reverse: bool) -> String {
    let mut lines = split_lines(text);
    if reverse {
        lines.sort_by(|a, b| b.cmp(a));
    } else {
        lines.sort();
    }
    lines.join("\n")
}

/// Drop repeated lines, keeping the first occurrence of each
pub fn remove_duplicates(text: &str) -> String {
    let mut seen = HashSet::new();
    split_lines(text)
        .into_iter()
        .filter(|line| seen.insert(*line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every occurrence of `find` with `replace`.
///
/// `find` is always a literal. When `case_sensitive` is false, matches are
/// found ignoring case and replaced by `replace` verbatim.
pub fn find_replace(text: &str, find: &str, replace: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        return text.replace(find, replace);
    }

    match regex::RegexBuilder::new(&regex::escape(find))
        .case_insensitive(true)
        .size_limit(usize::MAX)
        .build()
    {
        Ok(re) => re.replace_all(text, regex::NoExpand(replace)).into_owned(),
        Err(e) => {
            tracing::error!("Could not build matcher for '{}': {}", find, e);
            text.to_string()
        }
    }
}

/// Strip leading and trailing whitespace from every line
pub fn trim_whitespace(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
