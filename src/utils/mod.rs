//!
//! Utility functions and modules for docreflow
//!
//! This module contains the text passes shared by the format engine and the
//! quick-format rules.

pub mod html;
pub mod normalize;
pub mod text_reflow;

use regex::Regex;
use std::sync::LazyLock;

/// Paragraph boundary: two or more consecutive newlines
pub(crate) static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
