//! Code Token Parser
//!
//! Turns syntax-highlighter markup into lines of coloured tokens. The markup
//! is expected to look like
//!
//! ```text
//! <pre><code><span class="line"><span style="color:#F97583">const</span> x</span>
//! <span class="line">...</span></code></pre>
//! ```
//!
//! Tags are stripped and HTML escapes decoded, so concatenating a line's
//! tokens reproduces the source line.

use deck_model::Color;
use regex_lite::{Captures, Regex};
use std::sync::OnceLock;

const LINE_OPEN: &str = "<span class=\"line\">";
const SPAN_CLOSE: &str = "</span>";

/// A span of source text with its foreground colour
#[derive(Debug, Clone, PartialEq)]
pub struct CodeToken {
    pub text: String,
    pub color: Color,
}

impl CodeToken {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// One source line worth of tokens
pub type CodeLine = Vec<CodeToken>;

fn code_body_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)<code[^>]*>(.*)</code>").ok())
        .as_ref()
}

fn color_span_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            // `color` must open the declaration list or follow a `;`
            Regex::new(
                r#"(?s)<span[^>]*?style="(?:[^"]*;)?\s*color:\s*([^;"]+)[^"]*"[^>]*>(.*?)</span>"#,
            )
            .ok()
        })
        .as_ref()
}

fn tag_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

fn entity_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"&(amp|lt|gt|quot|apos|#[0-9]+|#[xX][0-9a-fA-F]+);").ok())
        .as_ref()
}

/// Decode the HTML text escapes a highlighter emits.
///
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(text: &str) -> String {
    let Some(pattern) = entity_pattern() else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn decode_numeric(reference: &str) -> Option<char> {
    let digits = reference.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// Escape source text for embedding in markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn strip_tags(text: &str) -> String {
    match tag_pattern() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn clean(fragment: &str) -> String {
    decode_entities(&strip_tags(fragment))
}

/// Parse highlighter markup into coloured token lines.
///
/// Text outside colour spans gets `default_color`. Markup without per-line
/// wrapper spans is split on newlines instead.
pub fn parse_highlighted(markup: &str, default_color: Color) -> Vec<CodeLine> {
    let body = code_body_pattern()
        .and_then(|p| p.captures(markup))
        .and_then(|caps| caps.get(1))
        .map_or(markup, |m| m.as_str());

    let raw_lines: Vec<&str> = if body.contains(LINE_OPEN) {
        body.split(LINE_OPEN)
            .skip(1)
            .map(|chunk| {
                let chunk = chunk.trim_end_matches(['\n', '\r']);
                chunk.strip_suffix(SPAN_CLOSE).unwrap_or(chunk)
            })
            .collect()
    } else {
        body.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    };

    raw_lines
        .into_iter()
        .map(|line| parse_line(line, default_color))
        .collect()
}

fn parse_line(line: &str, default_color: Color) -> CodeLine {
    let mut tokens = Vec::new();
    let mut push = |text: String, color: Color| {
        if !text.is_empty() {
            tokens.push(CodeToken::new(text, color));
        }
    };

    let Some(pattern) = color_span_pattern() else {
        push(clean(line), default_color);
        return tokens;
    };

    let mut last = 0;
    for caps in pattern.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            push(clean(&line[last..whole.start()]), default_color);
        }
        let color = caps
            .get(1)
            .and_then(|m| Color::parse(m.as_str()))
            .unwrap_or(default_color);
        let text = caps.get(2).map_or("", |m| m.as_str());
        push(clean(text), color);
        last = whole.end();
    }
    if last < line.len() {
        push(clean(&line[last..]), default_color);
    }
    tokens
}

/// Concatenated text of one token line
pub fn line_text(line: &[CodeToken]) -> String {
    line.iter().map(|t| t.text.as_str()).collect()
}
