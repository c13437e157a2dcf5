//! Inline Run Tokenizer
//!
//! Splits one line of text into styled runs. The four delimiter forms are
//! tried as alternatives of a single left-to-right scan, so earlier forms
//! take precedence where matches start at the same position:
//!
//! 1. `**bold**`
//! 2. `*italic*`
//! 3. `` `code` ``
//! 4. `$math$`
//!
//! Nested emphasis is not recognised; the first alternative that matches at
//! the leftmost position wins and its content is taken literally.

use regex_lite::Regex;
use std::sync::OnceLock;

/// A contiguous span of text with inline styling
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub math: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: true,
            ..Default::default()
        }
    }

    pub fn math(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            math: true,
            ..Default::default()
        }
    }

    /// Whether no style flag is set
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.code || self.math)
    }
}

fn inline_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|`(.+?)`|\$(.+?)\$").ok())
        .as_ref()
}

/// Split a line into styled runs.
///
/// Text between delimited spans becomes plain runs. A line without any
/// delimiters yields a single plain run, even when it is empty; otherwise no
/// run is empty.
pub fn tokenize(line: &str) -> Vec<TextRun> {
    let Some(pattern) = inline_pattern() else {
        return vec![TextRun::plain(line)];
    };

    let mut runs = Vec::new();
    let mut last = 0;

    for caps in pattern.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            runs.push(TextRun::plain(&line[last..whole.start()]));
        }

        let run = if let Some(m) = caps.get(1) {
            TextRun::bold(m.as_str())
        } else if let Some(m) = caps.get(2) {
            TextRun::italic(m.as_str())
        } else if let Some(m) = caps.get(3) {
            TextRun::code(m.as_str())
        } else if let Some(m) = caps.get(4) {
            TextRun::math(m.as_str())
        } else {
            TextRun::plain(whole.as_str())
        };
        runs.push(run);
        last = whole.end();
    }

    if last < line.len() {
        runs.push(TextRun::plain(&line[last..]));
    }
    if runs.is_empty() {
        runs.push(TextRun::plain(line));
    }
    runs
}

/// Concatenated text of a run list
pub fn runs_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
