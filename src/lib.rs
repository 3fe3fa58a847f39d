pub mod analysis;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod language;
pub mod options;
pub mod rules;
pub mod utils;

// WASM module
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm;

pub use analysis::{FormatMetadata, analyze_text_format};
pub use document::{DocumentError, DocumentMetadata, FileType, ParsedDocument, parse_file, parse_text};
pub use engine::{FormatEngine, format_text, format_text_with};
pub use error::{FormatError, FormatResult};
pub use language::{Language, LanguageHint, detect_language};
pub use options::{DEFAULT_LINE_WIDTH, FormatOptions, FormatOverrides};
pub use rules::{FormatRule, FormatRules, FormatRulesOverrides, RuleBasedFormatter};
pub use utils::html::format_text_for_display;
pub use utils::text_reflow::{format_paragraph, is_vietnamese_compound_word};

/// Run the quick-format rule pipeline; see [`rules::format_text`]
pub fn quick_format_text(text: &str, rules: &FormatRules) -> String {
    rules::format_text(text, rules)
}

/// Format `text` with the engine and report statistics about the result
pub fn format_and_analyze(text: &str, options: &FormatOptions) -> FormatResult<(String, FormatMetadata)> {
    let formatted = format_text(text, options)?;
    let metadata = analyze_text_format(&formatted);
    Ok((formatted, metadata))
}
