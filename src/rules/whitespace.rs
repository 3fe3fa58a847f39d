//! Whitespace and line-structure rules

use super::FormatRule;
use regex::Regex;
use std::sync::LazyLock;

static ANY_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static LINE_ENDINGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r").unwrap());

/// Three newlines with only whitespace between them
static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// Collapse every whitespace run, newlines included, into a single space
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveExtraSpaces;

impl FormatRule for RemoveExtraSpaces {
    fn name(&self) -> &'static str {
        "remove-extra-spaces"
    }

    fn description(&self) -> &'static str {
        "Collapse runs of whitespace into one space"
    }

    fn apply(&self, text: &str) -> String {
        ANY_WHITESPACE.replace_all(text, " ").into_owned()
    }
}

/// Use LF line endings and allow at most one blank line in a row
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeNewlines;

impl FormatRule for NormalizeNewlines {
    fn name(&self) -> &'static str {
        "normalize-newlines"
    }

    fn description(&self) -> &'static str {
        "Convert line endings to LF and collapse repeated blank lines"
    }

    fn apply(&self, text: &str) -> String {
        let unified = LINE_ENDINGS.replace_all(text, "\n");
        BLANK_LINE_RUN.replace_all(&unified, "\n\n").into_owned()
    }
}

/// Drop lines that hold nothing but whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyLines;

impl FormatRule for RemoveEmptyLines {
    fn name(&self) -> &'static str {
        "remove-empty-lines"
    }

    fn description(&self) -> &'static str {
        "Remove blank lines"
    }

    fn apply(&self, text: &str) -> String {
        // Only newline-terminated lines are dropped; a blank tail without a
        // newline is left alone
        text.split_inclusive('\n')
            .filter(|line| !(line.ends_with('\n') && line.trim().is_empty()))
            .collect()
    }
}

/// Trim leading and trailing whitespace on every line
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimLines;

impl FormatRule for TrimLines {
    fn name(&self) -> &'static str {
        "trim-lines"
    }

    fn description(&self) -> &'static str {
        "Trim whitespace at both ends of each line"
    }

    fn apply(&self, text: &str) -> String {
        text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_extra_spaces_joins_lines() {
        assert_eq!(RemoveExtraSpaces.apply("a \t b\n\nc  "), "a b c ");
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(NormalizeNewlines.apply("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(NormalizeNewlines.apply("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(NormalizeNewlines.apply("a\n  \n \t\nb"), "a\n\nb");
        assert_eq!(NormalizeNewlines.apply("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_remove_empty_lines() {
        assert_eq!(RemoveEmptyLines.apply("a\n\n  \nb\n"), "a\nb\n");
        assert_eq!(RemoveEmptyLines.apply("\n\na"), "a");
        assert_eq!(RemoveEmptyLines.apply("a\r\n\r\nb"), "a\r\nb");
    }

    #[test]
    fn test_trim_lines() {
        assert_eq!(TrimLines.apply("  a  \n\tb\t\n"), "a\nb\n");
    }
}
