//! Document formatting engine
//!
//! Resolves the document language, runs the cleanup passes once over the
//! whole text, then reflows every paragraph independently and joins the
//! results with a blank line.

use crate::error::FormatResult;
use crate::language::Language;
use crate::options::{FormatOptions, FormatOverrides};
use crate::utils::PARAGRAPH_BREAK;
use crate::utils::normalize::clean_text;
use crate::utils::text_reflow::format_paragraph;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Leading spaces and tabs of a paragraph
static INDENTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*").unwrap());

/// Formatter that normalizes and reflows whole documents
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatEngine {
    options: FormatOptions,
}

impl FormatEngine {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Engine using the defaults with `overrides` merged on top
    pub fn from_overrides(overrides: &FormatOverrides) -> Self {
        Self::new(FormatOptions::default().merge(overrides))
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format a full document
    ///
    /// # Errors
    ///
    /// Returns [`crate::FormatError::InvalidLineWidth`] if the configured width is 0.
    pub fn format(&self, text: &str) -> FormatResult<String> {
        let options = &self.options;
        options.validate()?;

        let language = options.language_hint.resolve(text);
        let cleaned = clean_text(text, options);
        let paragraphs: Vec<&str> = PARAGRAPH_BREAK.split(&cleaned).collect();

        log::debug!(
            "Formatting {} paragraph(s) as {} with line width {}",
            paragraphs.len(),
            language.name(),
            options.line_width
        );

        if !options.preserve_paragraphs {
            return self.format_merged(&paragraphs, language);
        }

        let formatted: Vec<String> = paragraphs
            .iter()
            .map(|paragraph| self.format_block(paragraph, language))
            .collect::<FormatResult<_>>()?;

        Ok(formatted.join("\n\n"))
    }

    /// Reflow one paragraph, re-applying its indentation to every line
    fn format_block(&self, paragraph: &str, language: Language) -> FormatResult<String> {
        if paragraph.trim().is_empty() {
            return Ok(String::new());
        }

        let indentation = if self.options.preserve_indentation {
            INDENTATION.find(paragraph).map_or("", |m| m.as_str())
        } else {
            ""
        };

        // An indentation wider than the line leaves room for one word per line
        let width = self
            .options
            .line_width
            .saturating_sub(indentation.chars().count())
            .max(1);

        let content = format_paragraph(paragraph.trim(), width, language)?;
        Ok(content.lines().map(|line| format!("{indentation}{line}")).join("\n"))
    }

    /// Reflow every non-blank paragraph as a single one
    fn format_merged(&self, paragraphs: &[&str], language: Language) -> FormatResult<String> {
        let Some(first) = paragraphs.iter().find(|p| !p.trim().is_empty()) else {
            return Ok(String::new());
        };

        let indentation = INDENTATION.find(first).map_or("", |m| m.as_str());
        let merged = paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .join(" ");

        self.format_block(&format!("{indentation}{merged}"), language)
    }
}

/// Format `text` with fully specified options
pub fn format_text(text: &str, options: &FormatOptions) -> FormatResult<String> {
    FormatEngine::new(*options).format(text)
}

/// Format `text` with the defaults overridden by `overrides`
pub fn format_text_with(text: &str, overrides: &FormatOverrides) -> FormatResult<String> {
    FormatEngine::from_overrides(overrides).format(text)
}
