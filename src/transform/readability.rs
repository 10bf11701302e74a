//! Flesch readability scores

use serde::Serialize;

use super::stats::{count_sentences, extract_words};

/// Readability metrics for a buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Readability {
    /// Flesch Reading Ease, clamped to `[0, 100]`
    pub flesch_reading_ease: f64,
    /// Flesch-Kincaid Grade Level, clamped to `[0, 18]`
    pub flesch_kincaid_grade: f64,
    pub avg_words_per_sentence: f64,
}

/// Approximate syllables as the number of vowel groups (minimum one)
pub fn count_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_is_vowel = false;

    for c in word.chars().flat_map(char::to_lowercase) {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_is_vowel {
            count += 1;
        }
        prev_is_vowel = is_vowel;
    }

    count.max(1)
}

/// Compute Flesch scores. Text without words scores zero everywhere.
pub fn readability(text: &str) -> Readability {
    let words = extract_words(text);
    if words.is_empty() {
        return Readability::default();
    }

    let word_count = words.len() as f64;
    let sentence_count = count_sentences(text).max(1) as f64;
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let avg_words_per_sentence = word_count / sentence_count;
    let avg_syllables_per_word = syllables as f64 / word_count;

    let ease = 206.835 - 1.015 * avg_words_per_sentence - 84.6 * avg_syllables_per_word;
    let grade = 0.39 * avg_words_per_sentence + 11.8 * avg_syllables_per_word - 15.59;

    Readability {
        flesch_reading_ease: ease.clamp(0.0, 100.0),
        flesch_kincaid_grade: grade.clamp(0.0, 18.0),
        avg_words_per_sentence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("Queue"), 1);
        assert_eq!(count_syllables("psst"), 1);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(readability(""), Readability::default());
        assert_eq!(readability("123 456"), Readability::default());
    }

    #[test]
    fn test_short_simple_text_is_clamped() {
        // One-syllable words push the raw ease score above 100
        let scores = readability("The cat sat.");
        assert_eq!(scores.flesch_reading_ease, 100.0);
        assert_eq!(scores.flesch_kincaid_grade, 0.0);
        assert!((scores.avg_words_per_sentence - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dense_text_grade_is_clamped() {
        let text = "Incomprehensibilities characterization institutionalization \
                    internationalization unconstitutionally interdisciplinary";
        let scores = readability(text);
        assert_eq!(scores.flesch_reading_ease, 0.0);
        assert!(scores.flesch_kincaid_grade <= 18.0);
    }
}
