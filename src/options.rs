//! Formatting options for the reflow engine
//!
//! [`FormatOptions`] is the complete, immutable configuration of one
//! formatting call. [`FormatOverrides`] is the partial form read from config
//! files, CLI flags or JavaScript callers; it is merged onto a base value
//! field by field.

use crate::error::{FormatError, FormatResult};
use crate::language::LanguageHint;
use serde::{Deserialize, Serialize};

/// Default maximum line width
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Options controlling [`crate::engine::format_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatOptions {
    /// Maximum characters per line
    pub line_width: usize,
    /// Keep paragraph breaks; when false the whole document is one paragraph
    pub preserve_paragraphs: bool,
    /// Collapse runs of spaces and tabs, strip them at line edges
    pub remove_extra_spaces: bool,
    /// Convert CR/CRLF to LF and allow at most one blank line
    pub normalize_newlines: bool,
    /// Replace curly quotes with straight ASCII quotes
    pub smart_quotes: bool,
    /// Compose characters to NFC
    pub normalize_unicode: bool,
    /// Re-apply a paragraph's leading indentation to each wrapped line
    pub preserve_indentation: bool,
    /// Language used for break decisions
    pub language_hint: LanguageHint,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            preserve_paragraphs: true,
            remove_extra_spaces: true,
            normalize_newlines: true,
            smart_quotes: true,
            normalize_unicode: true,
            preserve_indentation: true,
            language_hint: LanguageHint::Auto,
        }
    }
}

impl FormatOptions {
    /// Options with every cleanup pass disabled
    pub fn passthrough() -> Self {
        Self {
            remove_extra_spaces: false,
            normalize_newlines: false,
            smart_quotes: false,
            normalize_unicode: false,
            ..Self::default()
        }
    }

    /// Check that the options leave room for text
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidLineWidth`] when `line_width` is 0.
    pub fn validate(&self) -> FormatResult<()> {
        if self.line_width == 0 {
            return Err(FormatError::InvalidLineWidth(self.line_width));
        }
        Ok(())
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_preserve_paragraphs(mut self, enabled: bool) -> Self {
        self.preserve_paragraphs = enabled;
        self
    }

    pub fn with_remove_extra_spaces(mut self, enabled: bool) -> Self {
        self.remove_extra_spaces = enabled;
        self
    }

    pub fn with_normalize_newlines(mut self, enabled: bool) -> Self {
        self.normalize_newlines = enabled;
        self
    }

    pub fn with_smart_quotes(mut self, enabled: bool) -> Self {
        self.smart_quotes = enabled;
        self
    }

    pub fn with_normalize_unicode(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    pub fn with_preserve_indentation(mut self, enabled: bool) -> Self {
        self.preserve_indentation = enabled;
        self
    }

    pub fn with_language_hint(mut self, hint: impl Into<LanguageHint>) -> Self {
        self.language_hint = hint.into();
        self
    }

    /// Apply every field set in `overrides`, keeping the rest
    pub fn merge(mut self, overrides: &FormatOverrides) -> Self {
        if let Some(line_width) = overrides.line_width {
            self.line_width = line_width;
        }
        if let Some(enabled) = overrides.preserve_paragraphs {
            self.preserve_paragraphs = enabled;
        }
        if let Some(enabled) = overrides.remove_extra_spaces {
            self.remove_extra_spaces = enabled;
        }
        if let Some(enabled) = overrides.normalize_newlines {
            self.normalize_newlines = enabled;
        }
        if let Some(enabled) = overrides.smart_quotes {
            self.smart_quotes = enabled;
        }
        if let Some(enabled) = overrides.normalize_unicode {
            self.normalize_unicode = enabled;
        }
        if let Some(enabled) = overrides.preserve_indentation {
            self.preserve_indentation = enabled;
        }
        if let Some(hint) = overrides.language_hint {
            self.language_hint = hint;
        }
        self
    }
}

/// Partially specified [`FormatOptions`]
///
/// Also the shape of the `[format]` section in `.docreflow.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatOverrides {
    /// Maximum characters per line (default: 80)
    #[serde(alias = "line_width", alias = "lineWidth", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<usize>,
    /// Keep paragraph breaks (default: true)
    #[serde(alias = "preserve_paragraphs", alias = "preserveParagraphs", skip_serializing_if = "Option::is_none")]
    pub preserve_paragraphs: Option<bool>,
    /// Collapse repeated spaces and tabs (default: true)
    #[serde(alias = "remove_extra_spaces", alias = "removeExtraSpaces", skip_serializing_if = "Option::is_none")]
    pub remove_extra_spaces: Option<bool>,
    /// Normalize line endings and blank lines (default: true)
    #[serde(alias = "normalize_newlines", alias = "normalizeNewlines", skip_serializing_if = "Option::is_none")]
    pub normalize_newlines: Option<bool>,
    /// Replace curly quotes with straight quotes (default: true)
    #[serde(alias = "smart_quotes", alias = "smartQuotes", skip_serializing_if = "Option::is_none")]
    pub smart_quotes: Option<bool>,
    /// Compose Unicode to NFC (default: true)
    #[serde(alias = "normalize_unicode", alias = "normalizeUnicode", skip_serializing_if = "Option::is_none")]
    pub normalize_unicode: Option<bool>,
    /// Keep paragraph indentation (default: true)
    #[serde(alias = "preserve_indentation", alias = "preserveIndentation", skip_serializing_if = "Option::is_none")]
    pub preserve_indentation: Option<bool>,
    /// "auto", "vi" or "en" (default: "auto")
    #[serde(alias = "language_hint", alias = "languageHint", alias = "language", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub language_hint: Option<LanguageHint>,
}

impl FormatOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn overlay(&mut self, other: &FormatOverrides) {
        self.line_width = other.line_width.or(self.line_width);
        self.preserve_paragraphs = other.preserve_paragraphs.or(self.preserve_paragraphs);
        self.remove_extra_spaces = other.remove_extra_spaces.or(self.remove_extra_spaces);
        self.normalize_newlines = other.normalize_newlines.or(self.normalize_newlines);
        self.smart_quotes = other.smart_quotes.or(self.smart_quotes);
        self.normalize_unicode = other.normalize_unicode.or(self.normalize_unicode);
        self.preserve_indentation = other.preserve_indentation.or(self.preserve_indentation);
        self.language_hint = other.language_hint.or(self.language_hint);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert_eq!(options.line_width, 80);
        assert!(options.preserve_paragraphs);
        assert!(options.remove_extra_spaces);
        assert!(options.normalize_newlines);
        assert!(options.smart_quotes);
        assert!(options.normalize_unicode);
        assert!(options.preserve_indentation);
        assert_eq!(options.language_hint, LanguageHint::Auto);
    }

    #[test]
    fn test_merge_only_touches_set_fields() {
        let overrides = FormatOverrides {
            line_width: Some(40),
            smart_quotes: Some(false),
            language_hint: Some(LanguageHint::Language(Language::English)),
            ..Default::default()
        };
        let merged = FormatOptions::default().merge(&overrides);
        assert_eq!(merged.line_width, 40);
        assert!(!merged.smart_quotes);
        assert!(merged.remove_extra_spaces);
        assert_eq!(merged.language_hint, LanguageHint::Language(Language::English));
    }

    #[test]
    fn test_overlay_precedence() {
        let mut base = FormatOverrides {
            line_width: Some(100),
            smart_quotes: Some(true),
            ..Default::default()
        };
        let top = FormatOverrides {
            line_width: Some(60),
            ..Default::default()
        };
        base.overlay(&top);
        assert_eq!(base.line_width, Some(60));
        assert_eq!(base.smart_quotes, Some(true));
        assert!(!base.is_empty());
        assert!(FormatOverrides::default().is_empty());
    }

    #[test]
    fn test_overrides_accept_both_key_styles() {
        let kebab: FormatOverrides = toml::from_str("line-width = 72\nlanguage-hint = \"vi\"").unwrap();
        let snake: FormatOverrides = toml::from_str("line_width = 72\nlanguage = \"vi\"").unwrap();
        assert_eq!(kebab, snake);
        assert_eq!(kebab.language_hint, Some(LanguageHint::Language(Language::Vietnamese)));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        assert_eq!(FormatOptions::default().validate(), Ok(()));
        assert_eq!(
            FormatOptions::default().with_line_width(0).validate(),
            Err(FormatError::InvalidLineWidth(0))
        );
    }

    #[test]
    fn test_invalid_hint_rejected_at_parse_time() {
        let result: Result<FormatOverrides, _> = toml::from_str("language-hint = \"de\"");
        assert!(result.is_err());
    }
}
