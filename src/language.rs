//! Language tags and character-set based language detection
//!
//! Detection is a single existence test: a document containing any
//! precomposed Vietnamese letter is Vietnamese, everything else is English.

use crate::error::FormatError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Every precomposed Vietnamese vowel with a diacritic, plus `đ`.
/// Uppercase forms are covered by the case-insensitive flag.
static VIETNAMESE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "(?i)[àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđ]",
    )
    .unwrap()
});

/// Languages the detector can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub enum Language {
    /// Primary language, selected whenever Vietnamese diacritics are present
    #[serde(rename = "vi")]
    Vietnamese,
    /// Fallback language
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Short language code (`vi` or `en`)
    pub fn code(self) -> &'static str {
        match self {
            Language::Vietnamese => "vi",
            Language::English => "en",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Language::Vietnamese => "Vietnamese",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(Language::Vietnamese),
            "en" => Ok(Language::English),
            _ => Err(FormatError::InvalidLanguageHint(s.to_string())),
        }
    }
}

/// Caller-supplied language steering for the reflow heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageHint {
    /// Detect the language from the document
    #[default]
    Auto,
    /// Use this language without detection
    Language(Language),
}

impl LanguageHint {
    /// Resolve the hint against a document, running detection only for `Auto`
    pub fn resolve(self, text: &str) -> Language {
        match self {
            LanguageHint::Auto => detect_language(text),
            LanguageHint::Language(language) => language,
        }
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageHint::Auto => write!(f, "auto"),
            LanguageHint::Language(language) => write!(f, "{language}"),
        }
    }
}

impl FromStr for LanguageHint {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            Ok(LanguageHint::Auto)
        } else {
            s.parse().map(LanguageHint::Language)
        }
    }
}

impl TryFrom<String> for LanguageHint {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageHint> for String {
    fn from(hint: LanguageHint) -> Self {
        hint.to_string()
    }
}

impl From<Language> for LanguageHint {
    fn from(language: Language) -> Self {
        LanguageHint::Language(language)
    }
}

/// Classify `text` as Vietnamese or English
pub fn detect_language(text: &str) -> Language {
    if VIETNAMESE_CHARS.is_match(text) {
        Language::Vietnamese
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_vietnamese_markers() {
        assert_eq!(detect_language("bơ"), Language::Vietnamese);
        assert_eq!(detect_language("đi"), Language::Vietnamese);
        assert_eq!(detect_language("Xin chào thế giới"), Language::Vietnamese);
        assert_eq!(detect_language("ĐẠI HỌC"), Language::Vietnamese);
    }

    #[test]
    fn test_detect_fallback() {
        assert_eq!(detect_language("hello world"), Language::English);
        assert_eq!(detect_language(""), Language::English);
        // French accents outside the Vietnamese set do not count
        assert_eq!(detect_language("garçon naïve"), Language::English);
    }

    #[test]
    fn test_detect_is_deterministic() {
        let text = "Một đoạn văn bản";
        assert_eq!(detect_language(text), detect_language(text));
    }

    #[test]
    fn test_hint_parsing() {
        assert_eq!("auto".parse::<LanguageHint>(), Ok(LanguageHint::Auto));
        assert_eq!(
            "vi".parse::<LanguageHint>(),
            Ok(LanguageHint::Language(Language::Vietnamese))
        );
        assert_eq!("en".parse::<LanguageHint>(), Ok(LanguageHint::Language(Language::English)));
        assert_eq!(
            "fr".parse::<LanguageHint>(),
            Err(FormatError::InvalidLanguageHint("fr".to_string()))
        );
    }

    #[test]
    fn test_hint_codes_are_exact() {
        for input in [" vi ", "VI", "En", "AUTO", "auto ", ""] {
            assert_eq!(
                input.parse::<LanguageHint>(),
                Err(FormatError::InvalidLanguageHint(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hint_resolution() {
        assert_eq!(LanguageHint::Auto.resolve("sẽ được"), Language::Vietnamese);
        assert_eq!(LanguageHint::Language(Language::English).resolve("sẽ được"), Language::English);
    }

    #[test]
    fn test_hint_serde_round_trip_through_string() {
        let hint: LanguageHint = serde_json::from_str("\"vi\"").unwrap();
        assert_eq!(hint, LanguageHint::Language(Language::Vietnamese));
        assert_eq!(serde_json::to_string(&LanguageHint::Auto).unwrap(), "\"auto\"");
        assert!(serde_json::from_str::<LanguageHint>("\"klingon\"").is_err());
    }
}
