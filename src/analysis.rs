//! Descriptive statistics over formatted text

use crate::language::{Language, detect_language};
use crate::utils::PARAGRAPH_BREAK;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Sentence terminators followed by whitespace
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Statistics describing a formatted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatMetadata {
    pub paragraph_count: usize,
    pub sentence_count: usize,
    pub average_words_per_sentence: f64,
    pub average_chars_per_word: f64,
    pub language_detected: Language,
}

/// `numerator / denominator`, or 0.0 when there is nothing to divide by
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Compute [`FormatMetadata`] for `text`
///
/// Blank segments are not counted, so empty or whitespace-only input reports
/// zero paragraphs, sentences and words, and both averages are 0.0.
pub fn analyze_text_format(text: &str) -> FormatMetadata {
    let paragraph_count = PARAGRAPH_BREAK.split(text).filter(|p| !p.trim().is_empty()).count();
    let sentence_count = SENTENCE_BREAK.split(text).filter(|s| !s.trim().is_empty()).count();
    let word_count = text.split_whitespace().count();
    let visible_chars = text.chars().filter(|c| !c.is_whitespace()).count();

    FormatMetadata {
        paragraph_count,
        sentence_count,
        average_words_per_sentence: ratio(word_count, sentence_count),
        average_chars_per_word: ratio(visible_chars, word_count),
        language_detected: detect_language(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_counts() {
        let meta = analyze_text_format("Hello world. How are you?");
        assert_eq!(meta.paragraph_count, 1);
        assert_eq!(meta.sentence_count, 2);
        assert_eq!(meta.average_words_per_sentence, 2.5);
        // "Helloworld.Howareyou?" has 21 visible characters over 5 words
        assert!((meta.average_chars_per_word - 4.2).abs() < 1e-9);
        assert_eq!(meta.language_detected, Language::English);
    }

    #[test]
    fn test_paragraphs() {
        let meta = analyze_text_format("First one.\n\nSecond one!\n\n\nThird?");
        assert_eq!(meta.paragraph_count, 3);
        assert_eq!(meta.sentence_count, 3);
    }

    #[test]
    fn test_trailing_terminator_does_not_add_sentence() {
        let meta = analyze_text_format("One. Two. ");
        assert_eq!(meta.sentence_count, 2);
    }

    #[test]
    fn test_ellipsis_counts_once() {
        let meta = analyze_text_format("Wait... what?! Yes");
        assert_eq!(meta.sentence_count, 3);
    }

    #[test]
    fn test_empty_input_reports_zero() {
        for text in ["", "   \n\n  "] {
            let meta = analyze_text_format(text);
            assert_eq!(meta.paragraph_count, 0);
            assert_eq!(meta.sentence_count, 0);
            assert_eq!(meta.average_words_per_sentence, 0.0);
            assert_eq!(meta.average_chars_per_word, 0.0);
            assert!(!meta.average_words_per_sentence.is_nan());
        }
    }

    #[test]
    fn test_vietnamese_detected() {
        let meta = analyze_text_format("Tôi đang là học sinh.");
        assert_eq!(meta.language_detected, Language::Vietnamese);
        assert_eq!(meta.sentence_count, 1);
        assert_eq!(meta.average_words_per_sentence, 5.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(analyze_text_format("Hi there.")).unwrap();
        assert_eq!(json["paragraphCount"], 1);
        assert_eq!(json["languageDetected"], "en");
    }
}
