//! Markdown Line Parser
//!
//! Classifies the lines of a text element into headings, bullets, block math
//! and paragraphs. Unrecognised syntax always degrades to a paragraph.

use crate::inline::{tokenize, TextRun};
use regex_lite::Regex;
use std::sync::OnceLock;

/// Font scale for heading levels 1..=3
pub const HEADING_SCALES: [f64; 3] = [1.8, 1.4, 1.1];

const MATH_FENCE: &str = "$$";

/// Horizontal indent of a parsed line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indent {
    /// Indent in points
    Fixed(f64),
    /// The default list indent, resolved against the base font size at layout time
    List,
}

/// What a parsed line draws
#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    Runs(Vec<TextRun>),
    /// Display math source, without the `$$` fences
    BlockMath(String),
}

/// One logical content line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub content: LineContent,
    pub indent: Indent,
    pub bullet: bool,
    /// Multiplier applied to the base font size
    pub scale: f64,
    /// Render every run bold (headings 1 and 2)
    pub force_bold: bool,
}

impl ParsedLine {
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Self {
            content: LineContent::Runs(runs),
            indent: Indent::Fixed(0.0),
            bullet: false,
            scale: 1.0,
            force_bold: false,
        }
    }

    pub fn block_math(expr: impl Into<String>) -> Self {
        Self {
            content: LineContent::BlockMath(expr.into()),
            ..Self::paragraph(Vec::new())
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        match &self.content {
            LineContent::Runs(runs) => runs,
            LineContent::BlockMath(_) => &[],
        }
    }

    pub fn block_math_expr(&self) -> Option<&str> {
        match &self.content {
            LineContent::BlockMath(expr) => Some(expr),
            LineContent::Runs(_) => None,
        }
    }
}

/// Result of parsing a whole text element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub lines: Vec<ParsedLine>,
    /// Buffer of a `$$` block that was never closed. It is not drawn.
    pub unterminated_math: Option<String>,
}

fn heading_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(#{1,3})\s+(.*)$").ok())
        .as_ref()
}

fn inline_block_math_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\$\$(.+)\$\$$").ok())
        .as_ref()
}

/// Parse a text element's content into lines
pub fn parse_document(content: &str) -> ParsedDocument {
    let mut lines = Vec::new();
    let mut math_buffer: Option<Vec<&str>> = None;

    for raw in content.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim();

        if trimmed == MATH_FENCE {
            match math_buffer.take() {
                Some(buffer) => lines.push(ParsedLine::block_math(buffer.join("\n"))),
                None => math_buffer = Some(Vec::new()),
            }
            continue;
        }

        if let Some(buffer) = math_buffer.as_mut() {
            buffer.push(raw);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        lines.push(classify_line(trimmed));
    }

    ParsedDocument {
        lines,
        unterminated_math: math_buffer.map(|buffer| buffer.join("\n")),
    }
}

/// Parse content, discarding any unterminated math block
pub fn parse_markdown(content: &str) -> Vec<ParsedLine> {
    parse_document(content).lines
}

fn classify_line(line: &str) -> ParsedLine {
    if let Some(caps) = inline_block_math_pattern().and_then(|p| p.captures(line)) {
        if let Some(expr) = caps.get(1) {
            return ParsedLine::block_math(expr.as_str());
        }
    }

    if let Some(caps) = heading_pattern().and_then(|p| p.captures(line)) {
        let level = caps.get(1).map_or(1, |m| m.as_str().len());
        let text = caps.get(2).map_or("", |m| m.as_str());
        return ParsedLine {
            scale: HEADING_SCALES[level.clamp(1, 3) - 1],
            force_bold: level <= 2,
            ..ParsedLine::paragraph(tokenize(text))
        };
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return ParsedLine {
            indent: Indent::List,
            bullet: true,
            ..ParsedLine::paragraph(tokenize(rest))
        };
    }

    ParsedLine::paragraph(tokenize(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::runs_text;

    #[test]
    fn test_headings_scale_and_bold() {
        let lines = parse_markdown("# H1\n## H2\n### H3\nnormal");
        let scales: Vec<f64> = lines.iter().map(|l| l.scale).collect();
        let bold: Vec<bool> = lines.iter().map(|l| l.force_bold).collect();
        assert_eq!(scales, vec![1.8, 1.4, 1.1, 1.0]);
        assert_eq!(bold, vec![true, true, false, false]);
        assert_eq!(runs_text(lines[0].runs()), "H1");
    }

    #[test]
    fn test_bullets_use_list_indent() {
        let lines = parse_markdown("- a\n- b\n* c");
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.bullet);
            assert_eq!(line.indent, Indent::List);
        }
        assert_eq!(runs_text(lines[2].runs()), "c");
    }

    #[test]
    fn test_non_bullets_never_use_list_indent() {
        for line in parse_markdown("plain\n# head\n-not a bullet\n**bold**") {
            assert_ne!(line.indent, Indent::List);
            assert!(!line.bullet);
        }
    }

    #[test]
    fn test_blank_lines_dropped() {
        let lines = parse_markdown("a\n\n   \r\nb\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(runs_text(lines[1].runs()), "b");
    }

    #[test]
    fn test_single_line_block_math() {
        let lines = parse_markdown("$$E = mc^2$$");
        assert_eq!(lines, vec![ParsedLine::block_math("E = mc^2")]);
    }

    #[test]
    fn test_multi_line_block_math_keeps_blank_lines() {
        let doc = parse_document("before\n$$\na + b\n\n= c\n$$\nafter");
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[1].block_math_expr(), Some("a + b\n\n= c"));
        assert!(doc.lines[1].runs().is_empty());
        assert_eq!(doc.unterminated_math, None);
    }

    #[test]
    fn test_unterminated_block_math_is_dropped() {
        let doc = parse_document("intro\n$$\nx^2\n# not a heading");
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.unterminated_math.as_deref(), Some("x^2\n# not a heading"));
    }

    #[test]
    fn test_four_hashes_is_a_paragraph() {
        let lines = parse_markdown("#### deep");
        assert_eq!(lines[0].scale, 1.0);
        assert_eq!(runs_text(lines[0].runs()), "#### deep");
    }

    #[test]
    fn test_heading_with_inline_styles() {
        let lines = parse_markdown("## Use `cargo` *now*");
        let runs = lines[0].runs();
        assert!(runs.iter().any(|r| r.code && r.text == "cargo"));
        assert!(runs.iter().any(|r| r.italic && r.text == "now"));
    }
}
