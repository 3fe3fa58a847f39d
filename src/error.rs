//! Error types for the formatting core

/// Errors raised by the formatting engine and paragraph reflower.
///
/// Both variants describe invalid caller configuration; the core never
/// recovers from them internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// An explicit language hint that is neither `auto` nor a known language code
    #[error("Invalid language hint: {0:?} (expected \"auto\", \"vi\" or \"en\")")]
    InvalidLanguageHint(String),

    /// A line width that leaves no room for text
    #[error("Invalid line width: {0} (must be at least 1)")]
    InvalidLineWidth(usize),
}

/// Result type for formatting operations
pub type FormatResult<T> = Result<T, FormatError>;
