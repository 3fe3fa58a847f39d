//! Text cleanup passes applied before reflow
//!
//! Passes run in a fixed order because each one works on the output of the
//! previous one: Unicode composition, extra-space removal, newline
//! normalization, quote straightening.

use crate::options::FormatOptions;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::is_nfc_quick;

/// Runs of spaces and tabs
static HORIZONTAL_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Spaces at the start or end of any line (CR and LF both end a line)
static LINE_EDGE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^ +| +$").unwrap());

/// Three or more consecutive LFs
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Apply the cleanup passes enabled in `options`
pub fn clean_text(text: &str, options: &FormatOptions) -> String {
    let mut cleaned = text.to_string();

    if options.normalize_unicode {
        let composed = normalize_unicode(&cleaned).into_owned();
        cleaned = composed;
    }

    if options.remove_extra_spaces {
        cleaned = remove_extra_spaces(&cleaned);
    }

    if options.normalize_newlines {
        cleaned = normalize_newlines(&cleaned);
    }

    if options.smart_quotes {
        cleaned = straighten_quotes(&cleaned);
    }

    cleaned
}

/// Compose to NFC, skipping the allocation when the text is already composed
pub fn normalize_unicode(text: &str) -> Cow<'_, str> {
    if is_nfc_quick(text.chars()) == unicode_normalization::IsNormalized::Yes {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.nfc().collect())
    }
}

/// Collapse space/tab runs to one space, then strip spaces at line edges
pub fn remove_extra_spaces(text: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(text, " ");
    LINE_EDGE_SPACES.replace_all(&collapsed, "").into_owned()
}

/// Convert CRLF and lone CR to LF and allow at most one blank line in a row
pub fn normalize_newlines(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    EXCESS_NEWLINES.replace_all(&unified, "\n\n").into_owned()
}

/// Replace the four curly quote code points with their ASCII counterparts
pub fn straighten_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}
