//! Text reflow utilities
//!
//! This module implements greedy word wrapping for plain paragraphs. The
//! format engine uses [`format_paragraph`], which knows about Vietnamese
//! compound words; the quick-format `line-width` rule uses [`wrap_line`],
//! which does not.

use crate::error::{FormatError, FormatResult};
use crate::language::Language;

/// Common two-word Vietnamese expressions that read badly when split across lines.
/// Entries are lowercase; lookups are case-insensitive.
const VIETNAMESE_COMPOUND_PAIRS: &[(&str, &str)] = &[
    ("của", "người"),
    ("trong", "nhà"),
    ("đang", "là"),
    ("sẽ", "được"),
    ("học", "sinh"),
    ("sinh", "viên"),
    ("thành", "phố"),
    ("đất", "nước"),
    ("bởi", "vì"),
    ("vì", "vậy"),
];

/// Check if two words form a known Vietnamese compound
pub fn is_vietnamese_compound_word(first: &str, second: &str) -> bool {
    let first = first.to_lowercase();
    let second = second.to_lowercase();
    VIETNAMESE_COMPOUND_PAIRS
        .iter()
        .any(|(w1, w2)| first == *w1 && second == *w2)
}

/// Columns a word occupies on a line: its characters plus one separator
fn word_cost(word: &str) -> usize {
    word.chars().count() + 1
}

/// Greedily distribute `words` over lines of at most `line_width` columns
///
/// A word that does not fit on an empty line is placed there alone; words are
/// never split. With `keep_compounds`, a break that would separate a known
/// compound pair moves the pair's first word down to the new line, as long as
/// the pair fits there.
fn fill_lines<'a>(words: &[&'a str], line_width: usize, keep_compounds: bool) -> Vec<Vec<&'a str>> {
    let mut lines: Vec<Vec<&'a str>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();
    let mut used = 0;

    for &word in words {
        let cost = word_cost(word);

        if current.is_empty() || used + cost <= line_width {
            current.push(word);
            used += cost;
            continue;
        }

        // A break happens before `word`
        if keep_compounds
            && current.len() > 1
            && let Some(&last) = current.last()
            && is_vietnamese_compound_word(last, word)
            && word_cost(last) + cost <= line_width
        {
            current.pop();
            lines.push(std::mem::take(&mut current));
            current.push(last);
            current.push(word);
            used = word_cost(last) + cost;
            continue;
        }

        lines.push(std::mem::take(&mut current));
        current.push(word);
        used = cost;
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn join_lines(lines: &[Vec<&str>]) -> String {
    lines.iter().map(|line| line.join(" ")).collect::<Vec<_>>().join("\n")
}

/// Reflow a single paragraph into lines bounded by `line_width`
///
/// Any whitespace (including single newlines) separates words, so an already
/// wrapped paragraph reflows to the same result. Returns an empty string for
/// an empty paragraph.
///
/// # Errors
///
/// Returns [`FormatError::InvalidLineWidth`] when `line_width` is 0.
pub fn format_paragraph(text: &str, line_width: usize, language: Language) -> FormatResult<String> {
    if line_width == 0 {
        return Err(FormatError::InvalidLineWidth(line_width));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(String::new());
    }

    let lines = fill_lines(&words, line_width, language == Language::Vietnamese);
    Ok(join_lines(&lines))
}

/// Wrap one line for the quick-format pipeline
///
/// Lines already within `line_width` characters are returned untouched.
/// Otherwise words are filled greedily, without any language awareness, so
/// that each line holds at most `line_width` characters including the single
/// spaces between words. A width of 0 disables wrapping.
pub fn wrap_line(line: &str, line_width: usize) -> String {
    if line_width == 0 || line.chars().count() <= line_width {
        return line.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= line_width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_breaks_at_narrow_width() {
        assert_eq!(format_paragraph("a b c d e", 3, Language::English).unwrap(), "a\nb\nc\nd\ne");
    }

    #[test]
    fn test_greedy_fill() {
        let text = "the quick brown fox jumps over the lazy dog";
        let wrapped = format_paragraph(text, 16, Language::English).unwrap();
        assert_eq!(wrapped, "the quick brown\nfox jumps over\nthe lazy dog");
        for line in wrapped.lines() {
            assert!(line.chars().count() < 16);
        }
    }

    #[test]
    fn test_long_word_is_never_split() {
        let wrapped = format_paragraph("a supercalifragilistic b", 5, Language::English).unwrap();
        assert_eq!(wrapped, "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn test_long_first_word_does_not_produce_empty_line() {
        let wrapped = format_paragraph("abcdefgh ij", 4, Language::English).unwrap();
        assert_eq!(wrapped, "abcdefgh\nij");
    }

    #[test]
    fn test_empty_paragraph() {
        assert_eq!(format_paragraph("", 10, Language::English).unwrap(), "");
        assert_eq!(format_paragraph("   \n ", 10, Language::English).unwrap(), "");
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert_eq!(
            format_paragraph("text", 0, Language::English),
            Err(FormatError::InvalidLineWidth(0))
        );
    }

    #[test]
    fn test_embedded_newlines_are_separators() {
        let once = format_paragraph("aaaa bbbb cccc", 10, Language::English).unwrap();
        assert_eq!(once, "aaaa bbbb\ncccc");
        assert_eq!(format_paragraph(&once, 10, Language::English).unwrap(), once);
    }

    #[test]
    fn test_compound_lookup_is_case_insensitive() {
        assert!(is_vietnamese_compound_word("Của", "NGƯỜI"));
        assert!(is_vietnamese_compound_word("sẽ", "được"));
        assert!(!is_vietnamese_compound_word("người", "của"));
        assert!(!is_vietnamese_compound_word("hello", "world"));
    }

    #[test]
    fn test_compound_pair_moves_to_next_line() {
        // "sẽ" fits on the first line but "được" does not; keep them together
        let text = "anh ấy sẽ được khen";
        let vi = format_paragraph(text, 11, Language::Vietnamese).unwrap();
        assert_eq!(vi, "anh ấy\nsẽ được\nkhen");

        let en = format_paragraph(text, 11, Language::English).unwrap();
        assert_eq!(en, "anh ấy sẽ\nđược khen");
    }

    #[test]
    fn test_compound_pair_not_moved_off_single_word_line() {
        // Moving "sẽ" would leave an empty line, so the normal break applies
        let vi = format_paragraph("sẽ được", 3, Language::Vietnamese).unwrap();
        assert_eq!(vi, "sẽ\nđược");
    }

    #[test]
    fn test_wrap_line_leaves_short_lines() {
        assert_eq!(wrap_line("short  line", 80), "short  line");
        assert_eq!(wrap_line("anything goes", 0), "anything goes");
    }

    #[test]
    fn test_wrap_line_breaks_long_lines() {
        assert_eq!(wrap_line("one two three four", 10), "one two\nthree four");
    }

    #[test]
    fn test_wrap_line_uses_the_full_width() {
        // A wrapped line may end exactly at the width, like an untouched one
        assert_eq!(wrap_line("three four", 10), "three four");
        assert_eq!(wrap_line("ab cd ef gh", 5), "ab cd\nef gh");
        assert_eq!(wrap_line("a supercalifragilistic b", 5), "a\nsupercalifragilistic\nb");
    }
}
