//! Quote, capitalization and punctuation rules

use super::FormatRule;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static OPENING_DOUBLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(^|\W)"(\w)"#).unwrap());
static CLOSING_DOUBLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\w)""#).unwrap());
static OPENING_SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\W)'(\w)").unwrap());
static CLOSING_SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w)'").unwrap());

/// A lowercase letter at the very start or after a sentence terminator and whitespace
static SENTENCE_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[.!?]\s+)(\p{Ll})").unwrap());

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+([.,!?;:])").unwrap());
static REPEATED_COMMAS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",{2,}").unwrap());
static REPEATED_DOTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
static SPACE_AFTER_OPEN_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([ \t]+").unwrap());
static SPACE_BEFORE_CLOSE_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\)").unwrap());

/// Curl straight quotes that sit against a word
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartQuotes;

impl FormatRule for SmartQuotes {
    fn name(&self) -> &'static str {
        "smart-quotes"
    }

    fn description(&self) -> &'static str {
        "Convert straight quotes next to words into curly quotes"
    }

    fn apply(&self, text: &str) -> String {
        let text = OPENING_DOUBLE.replace_all(text, "${1}\u{201C}${2}");
        let text = CLOSING_DOUBLE.replace_all(&text, "${1}\u{201D}");
        let text = OPENING_SINGLE.replace_all(&text, "${1}\u{2018}${2}");
        CLOSING_SINGLE.replace_all(&text, "${1}\u{2019}").into_owned()
    }
}

/// Uppercase the first letter of every sentence
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizeFirstLetter;

impl FormatRule for CapitalizeFirstLetter {
    fn name(&self) -> &'static str {
        "capitalize-first-letter"
    }

    fn description(&self) -> &'static str {
        "Capitalize the first letter of each sentence"
    }

    fn apply(&self, text: &str) -> String {
        SENTENCE_START
            .replace_all(text, |caps: &Captures| format!("{}{}", &caps[1], caps[2].to_uppercase()))
            .into_owned()
    }
}

/// Normalize spacing around punctuation, repeated commas and dot runs
#[derive(Debug, Clone, Copy, Default)]
pub struct FixPunctuation;

impl FormatRule for FixPunctuation {
    fn name(&self) -> &'static str {
        "fix-punctuation"
    }

    fn description(&self) -> &'static str {
        "Fix spacing around punctuation and collapse repeated marks"
    }

    fn apply(&self, text: &str) -> String {
        let text = SPACE_BEFORE_PUNCTUATION.replace_all(text, "$1");
        let text = REPEATED_COMMAS.replace_all(&text, ",");
        let text = REPEATED_DOTS.replace_all(&text, "...");
        let text = space_after_punctuation(&text);
        let text = SPACE_AFTER_OPEN_PAREN.replace_all(&text, "(");
        SPACE_BEFORE_CLOSE_PAREN.replace_all(&text, ")").into_owned()
    }
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':')
}

/// Whether a missing space belongs between a punctuation run and `next`
fn needs_space(run_end: char, before: Option<char>, next: char) -> bool {
    // 3.14, 1,000, 10:30
    if before.is_some_and(|c| c.is_ascii_digit()) && next.is_ascii_digit() {
        return false;
    }
    match run_end {
        // Dots also appear inside abbreviations, domains and file names
        '.' => next.is_uppercase(),
        _ => next.is_alphabetic(),
    }
}

/// Leave exactly one space between punctuation and the text that follows it
///
/// Spaces after punctuation at the end of a line are dropped.
fn space_after_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len() + text.len() / 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !is_punctuation(c) {
            result.push(c);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && is_punctuation(chars[i]) {
            i += 1;
        }
        result.extend(&chars[start..i]);

        let mut next_idx = i;
        while next_idx < chars.len() && matches!(chars[next_idx], ' ' | '\t') {
            next_idx += 1;
        }

        match chars.get(next_idx) {
            None | Some('\n') | Some('\r') => {}
            Some(_) if next_idx > i => result.push(' '),
            Some(&next) => {
                let before = start.checked_sub(1).map(|idx| chars[idx]);
                if needs_space(chars[i - 1], before, next) {
                    result.push(' ');
                }
            }
        }
        i = next_idx;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_quotes_double() {
        assert_eq!(SmartQuotes.apply(r#"He said "hello" to me"#), "He said \u{201C}hello\u{201D} to me");
        assert_eq!(SmartQuotes.apply(r#""start""#), "\u{201C}start\u{201D}");
    }

    #[test]
    fn test_smart_quotes_single() {
        assert_eq!(SmartQuotes.apply("it's 'fine'"), "it\u{2019}s \u{2018}fine\u{2019}");
    }

    #[test]
    fn test_smart_quotes_leave_detached_quotes() {
        assert_eq!(SmartQuotes.apply(r#"a " b"#), r#"a " b"#);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(
            CapitalizeFirstLetter.apply("first. second! third? fourth"),
            "First. Second! Third? Fourth"
        );
        assert_eq!(CapitalizeFirstLetter.apply("đây là. ơi"), "Đây là. Ơi");
        // No whitespace after the terminator, no new sentence
        assert_eq!(CapitalizeFirstLetter.apply("Version 1.x"), "Version 1.x");
    }

    #[test]
    fn test_space_before_punctuation_removed() {
        assert_eq!(FixPunctuation.apply("Hello , world !"), "Hello, world!");
    }

    #[test]
    fn test_single_space_after_punctuation() {
        assert_eq!(FixPunctuation.apply("a,b;c:d"), "a, b; c: d");
        assert_eq!(FixPunctuation.apply("end.Next"), "end. Next");
        assert_eq!(FixPunctuation.apply("one,    two"), "one, two");
        assert_eq!(FixPunctuation.apply("why?because"), "why? because");
    }

    #[test]
    fn test_numbers_and_domains_untouched() {
        assert_eq!(FixPunctuation.apply("pi is 3.14 and 1,000 at 10:30"), "pi is 3.14 and 1,000 at 10:30");
        assert_eq!(FixPunctuation.apply("see example.com"), "see example.com");
    }

    #[test]
    fn test_repeated_marks() {
        assert_eq!(FixPunctuation.apply("wait,,, what"), "wait, what");
        assert_eq!(FixPunctuation.apply("so.. then"), "so... then");
        assert_eq!(FixPunctuation.apply("hmm..... ok"), "hmm... ok");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(FixPunctuation.apply("( inside )"), "(inside)");
    }

    #[test]
    fn test_no_trailing_space_at_line_end() {
        assert_eq!(FixPunctuation.apply("Done.  \nNext line."), "Done.\nNext line.");
    }
}
