//! Rule-based quick formatting
//!
//! An independent cleanup pipeline driven by [`FormatRules`]. Each flag
//! enables one [`FormatRule`]; enabled rules always run in the order of
//! [`all_rules`]. This pipeline does not share options or semantics with
//! [`crate::engine`]: its quote rule, for instance, curls straight quotes
//! where the engine straightens curly ones.

mod line_width;
mod typography;
mod whitespace;

pub use line_width::LineWidthRule;
pub use typography::{CapitalizeFirstLetter, FixPunctuation, SmartQuotes};
pub use whitespace::{NormalizeNewlines, RemoveEmptyLines, RemoveExtraSpaces, TrimLines};

use serde::{Deserialize, Serialize};

/// Default width for the `line-width` rule
pub const DEFAULT_RULES_LINE_WIDTH: usize = 80;

/// A single text transformation in the quick-format pipeline
pub trait FormatRule: Send + Sync {
    /// Stable kebab-case identifier
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn apply(&self, text: &str) -> String;
}

/// Flags selecting the quick-format rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatRules {
    pub remove_extra_spaces: bool,
    pub normalize_newlines: bool,
    pub smart_quotes: bool,
    pub capitalize_first_letter: bool,
    pub fix_punctuation: bool,
    pub remove_empty_lines: bool,
    pub trim_lines: bool,
    /// Maximum line width; 0 disables wrapping
    pub line_width: usize,
}

impl Default for FormatRules {
    fn default() -> Self {
        Self {
            remove_extra_spaces: false,
            normalize_newlines: false,
            smart_quotes: false,
            capitalize_first_letter: false,
            fix_punctuation: false,
            remove_empty_lines: false,
            trim_lines: false,
            line_width: DEFAULT_RULES_LINE_WIDTH,
        }
    }
}

impl FormatRules {
    /// Every boolean rule enabled, default width
    pub fn all() -> Self {
        Self {
            remove_extra_spaces: true,
            normalize_newlines: true,
            smart_quotes: true,
            capitalize_first_letter: true,
            fix_punctuation: true,
            remove_empty_lines: true,
            trim_lines: true,
            line_width: DEFAULT_RULES_LINE_WIDTH,
        }
    }

    /// Check whether the rule called `name` is enabled by these flags
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            "remove-extra-spaces" => self.remove_extra_spaces,
            "normalize-newlines" => self.normalize_newlines,
            "smart-quotes" => self.smart_quotes,
            "capitalize-first-letter" => self.capitalize_first_letter,
            "fix-punctuation" => self.fix_punctuation,
            "remove-empty-lines" => self.remove_empty_lines,
            "trim-lines" => self.trim_lines,
            "line-width" => self.line_width > 0,
            _ => false,
        }
    }

    /// Apply every field set in `overrides`, keeping the rest
    pub fn merge(mut self, overrides: &FormatRulesOverrides) -> Self {
        if let Some(v) = overrides.remove_extra_spaces {
            self.remove_extra_spaces = v;
        }
        if let Some(v) = overrides.normalize_newlines {
            self.normalize_newlines = v;
        }
        if let Some(v) = overrides.smart_quotes {
            self.smart_quotes = v;
        }
        if let Some(v) = overrides.capitalize_first_letter {
            self.capitalize_first_letter = v;
        }
        if let Some(v) = overrides.fix_punctuation {
            self.fix_punctuation = v;
        }
        if let Some(v) = overrides.remove_empty_lines {
            self.remove_empty_lines = v;
        }
        if let Some(v) = overrides.trim_lines {
            self.trim_lines = v;
        }
        if let Some(v) = overrides.line_width {
            self.line_width = v;
        }
        self
    }
}

/// Partially specified [`FormatRules`], the shape of `[quick-format]` in config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatRulesOverrides {
    /// Collapse every whitespace run, newlines included, to one space
    #[serde(alias = "remove_extra_spaces", alias = "removeExtraSpaces", skip_serializing_if = "Option::is_none")]
    pub remove_extra_spaces: Option<bool>,
    /// Convert CR/CRLF to LF and collapse runs of blank lines
    #[serde(alias = "normalize_newlines", alias = "normalizeNewlines", skip_serializing_if = "Option::is_none")]
    pub normalize_newlines: Option<bool>,
    /// Turn straight quotes into curly quotes
    #[serde(alias = "smart_quotes", alias = "smartQuotes", skip_serializing_if = "Option::is_none")]
    pub smart_quotes: Option<bool>,
    /// Uppercase the first letter of each sentence
    #[serde(
        alias = "capitalize_first_letter",
        alias = "capitalizeFirstLetter",
        skip_serializing_if = "Option::is_none"
    )]
    pub capitalize_first_letter: Option<bool>,
    /// Fix spacing around punctuation, repeated commas and ellipses
    #[serde(alias = "fix_punctuation", alias = "fixPunctuation", skip_serializing_if = "Option::is_none")]
    pub fix_punctuation: Option<bool>,
    /// Drop whitespace-only lines
    #[serde(alias = "remove_empty_lines", alias = "removeEmptyLines", skip_serializing_if = "Option::is_none")]
    pub remove_empty_lines: Option<bool>,
    /// Trim whitespace at both ends of every line
    #[serde(alias = "trim_lines", alias = "trimLines", skip_serializing_if = "Option::is_none")]
    pub trim_lines: Option<bool>,
    /// Wrap lines longer than this; 0 disables wrapping (default: 80)
    #[serde(alias = "line_width", alias = "lineWidth", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<usize>,
}

impl FormatRulesOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn overlay(&mut self, other: &FormatRulesOverrides) {
        self.remove_extra_spaces = other.remove_extra_spaces.or(self.remove_extra_spaces);
        self.normalize_newlines = other.normalize_newlines.or(self.normalize_newlines);
        self.smart_quotes = other.smart_quotes.or(self.smart_quotes);
        self.capitalize_first_letter = other.capitalize_first_letter.or(self.capitalize_first_letter);
        self.fix_punctuation = other.fix_punctuation.or(self.fix_punctuation);
        self.remove_empty_lines = other.remove_empty_lines.or(self.remove_empty_lines);
        self.trim_lines = other.trim_lines.or(self.trim_lines);
        self.line_width = other.line_width.or(self.line_width);
    }
}

/// Every rule in pipeline order, configured from `rules`
pub fn all_rules(rules: &FormatRules) -> Vec<Box<dyn FormatRule>> {
    vec![
        Box::new(RemoveExtraSpaces),
        Box::new(NormalizeNewlines),
        Box::new(SmartQuotes),
        Box::new(CapitalizeFirstLetter),
        Box::new(FixPunctuation),
        Box::new(RemoveEmptyLines),
        Box::new(TrimLines),
        Box::new(LineWidthRule::new(rules.line_width)),
    ]
}

/// The quick-format pipeline for one set of [`FormatRules`]
pub struct RuleBasedFormatter {
    rules: Vec<Box<dyn FormatRule>>,
}

impl RuleBasedFormatter {
    pub fn new(rules: &FormatRules) -> Self {
        let enabled = all_rules(rules)
            .into_iter()
            .filter(|rule| rules.is_enabled(rule.name()))
            .collect();
        Self { rules: enabled }
    }

    /// Names of the rules that will run, in order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn format(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| {
            log::trace!("Applying quick-format rule {}", rule.name());
            rule.apply(&acc)
        })
    }
}

/// Run the quick-format pipeline selected by `rules` over `text`
pub fn format_text(text: &str, rules: &FormatRules) -> String {
    RuleBasedFormatter::new(rules).format(text)
}
