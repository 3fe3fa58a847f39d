use super::FormatRule;
use crate::utils::text_reflow::wrap_line;

/// Wrap lines longer than a fixed width
///
/// Unlike the format engine this wrap has no notion of language; it only
/// moves whole words to new lines.
#[derive(Debug, Clone, Copy)]
pub struct LineWidthRule {
    line_width: usize,
}

impl LineWidthRule {
    pub fn new(line_width: usize) -> Self {
        Self { line_width }
    }
}

impl FormatRule for LineWidthRule {
    fn name(&self) -> &'static str {
        "line-width"
    }

    fn description(&self) -> &'static str {
        "Wrap lines that exceed the configured width"
    }

    fn apply(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| wrap_line(line, self.line_width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
