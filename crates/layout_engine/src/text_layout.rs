//! Text Layout Engine
//!
//! Word-wraps parsed lines into visual lines and positions them inside a
//! text element's box.
//!
//! The algorithm is greedy:
//! 1. Map the CSS family onto a physical font class
//! 2. Flatten each parsed line's runs into word and whitespace units
//! 3. Fill visual lines while the measured width fits the available width
//! 4. Place the block vertically, then each line horizontally
//!
//! Math has no text representation, so its size comes from a caller-supplied
//! lookup of rasterised images.

use crate::inline::TextRun;
use crate::markdown::{Indent, LineContent, ParsedLine};
use deck_model::{Bounds, HorizontalAlign, ResolvedTextStyle, VerticalAlign};
use text_engine::{measure_text, FontClass, StandardFont};

/// Horizontal and vertical padding inside a text box
pub const TEXT_PADDING: f64 = 4.0;
/// Bullet indent in multiples of the base font size
pub const LIST_INDENT_EMS: f64 = 1.5;
/// Glyph drawn in front of bulleted lines
pub const BULLET: &str = "\u{2022}";

/// Whether math is rendered inline or as a display block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathMode {
    Inline,
    Display,
}

/// Natural size of a rasterised expression at the base font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MathSize {
    pub width: f64,
    pub height: f64,
}

impl MathSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// What a segment draws
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentContent {
    Text(String),
    /// A rasterised expression, looked up again by source when drawing
    Math { expr: String, mode: MathMode },
}

/// A measured piece of a visual line
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub content: SegmentContent,
    pub font: StandardFont,
    pub font_size: f64,
    pub width: f64,
    /// Glyph height for text, image height for math
    pub height: f64,
}

impl Segment {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            SegmentContent::Text(text) => Some(text),
            SegmentContent::Math { .. } => None,
        }
    }
}

/// A wrapped, width-constrained row of segments
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLine {
    pub segments: Vec<Segment>,
    /// Resolved indent in points
    pub indent: f64,
    /// Draw a bullet before this line (first row of a bullet item only)
    pub bullet: bool,
    /// Base size times the parsed line's scale
    pub font_size: f64,
    /// Vertical distance to the next line
    pub advance: f64,
    pub block_math: bool,
}

impl VisualLine {
    /// Summed segment width
    pub fn width(&self) -> f64 {
        self.segments.iter().map(|s| s.width).sum()
    }

    pub fn text(&self) -> String {
        self.segments.iter().filter_map(Segment::text).collect()
    }
}

/// Bullet glyph placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBullet {
    pub x: f64,
    pub font: StandardFont,
    pub font_size: f64,
}

/// A visual line with its drawing origin
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: VisualLine,
    /// Left edge of the first segment
    pub x: f64,
    pub baseline: f64,
    /// Top of the line box
    pub top: f64,
    pub bullet: Option<PlacedBullet>,
}

/// Layout result for one text element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    pub total_height: f64,
    /// Lines that fell below the box and were dropped
    pub clipped: usize,
}

/// Resolve a parsed indent against the base font size
pub fn resolve_indent(indent: Indent, base_size: f64) -> f64 {
    match indent {
        Indent::Fixed(points) => points,
        Indent::List => LIST_INDENT_EMS * base_size,
    }
}

/// Width available to a line's segments
pub fn available_width(bounds: &Bounds, indent: f64) -> f64 {
    bounds.width - 2.0 * TEXT_PADDING - indent
}

/// Baseline of the first line for a block of `total_height`
pub fn vertical_start(
    bounds: &Bounds,
    total_height: f64,
    base_size: f64,
    align: VerticalAlign,
) -> f64 {
    match align {
        VerticalAlign::Top => bounds.y + TEXT_PADDING + base_size,
        VerticalAlign::Middle => bounds.y + (bounds.height - total_height) / 2.0 + base_size,
        VerticalAlign::Bottom => bounds.bottom() - total_height + base_size - TEXT_PADDING,
    }
}

/// Left edge of a line of `line_width`
pub fn horizontal_start(
    bounds: &Bounds,
    indent: f64,
    line_width: f64,
    align: HorizontalAlign,
) -> f64 {
    let available = available_width(bounds, indent);
    match align {
        HorizontalAlign::Left => bounds.x + TEXT_PADDING + indent,
        HorizontalAlign::Center => bounds.x + TEXT_PADDING + (available - line_width) / 2.0 + indent,
        HorizontalAlign::Right => bounds.right() - TEXT_PADDING - line_width,
    }
}

struct Unit {
    content: SegmentContent,
    font: StandardFont,
    font_size: f64,
    width: f64,
    height: f64,
    whitespace: bool,
}

/// Split text into alternating whitespace and word chunks
fn split_words(text: &str) -> Vec<(&str, bool)> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                chunks.push((&text[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        chunks.push((&text[start..], space));
    }
    chunks
}

fn text_units(text: &str, font: StandardFont, font_size: f64, units: &mut Vec<Unit>) {
    for (chunk, whitespace) in split_words(text) {
        units.push(Unit {
            content: SegmentContent::Text(chunk.to_string()),
            font,
            font_size,
            width: measure_text(chunk, font, font_size),
            height: font_size,
            whitespace,
        });
    }
}

fn run_units<F>(
    run: &TextRun,
    class: FontClass,
    line: &ParsedLine,
    base_size: f64,
    math: &F,
    units: &mut Vec<Unit>,
) where
    F: Fn(&str, MathMode) -> Option<MathSize>,
{
    let font_size = base_size * line.scale;
    let bold = run.bold || line.force_bold;

    if run.math {
        match math(&run.text, MathMode::Inline).filter(MathSize::is_drawable) {
            Some(size) => units.push(Unit {
                content: SegmentContent::Math {
                    expr: run.text.clone(),
                    mode: MathMode::Inline,
                },
                font: StandardFont::select(class, bold, true),
                font_size,
                width: size.width * line.scale,
                height: size.height * line.scale,
                whitespace: false,
            }),
            // No raster: show the source in italics
            None => {
                let font = StandardFont::select(class, bold, true);
                text_units(&run.text, font, font_size, units);
            }
        }
        return;
    }

    let run_class = if run.code { FontClass::Mono } else { class };
    let font = StandardFont::select(run_class, bold, run.italic);
    text_units(&run.text, font, font_size, units);
}

/// Trim trailing whitespace and merge neighbouring text of the same face
fn close_line(mut units: Vec<Unit>) -> Vec<Segment> {
    while units.last().is_some_and(|u| u.whitespace) {
        units.pop();
    }

    let mut segments: Vec<Segment> = Vec::new();
    for unit in units {
        if let (Some(last), SegmentContent::Text(text)) = (segments.last_mut(), &unit.content) {
            if let SegmentContent::Text(last_text) = &mut last.content {
                if last.font == unit.font && last.font_size == unit.font_size {
                    last_text.push_str(text);
                    last.width += unit.width;
                    continue;
                }
            }
        }
        segments.push(Segment {
            content: unit.content,
            font: unit.font,
            font_size: unit.font_size,
            width: unit.width,
            height: unit.height,
        });
    }
    segments
}

/// Greedily wrap a unit sequence into rows of at most `available` width.
///
/// A unit wider than `available` is placed alone on its own row.
fn wrap_units(units: Vec<Unit>, available: f64) -> Vec<Vec<Segment>> {
    let mut rows = Vec::new();
    let mut current: Vec<Unit> = Vec::new();
    let mut width = 0.0;

    for unit in units {
        // Continuation rows never start with whitespace
        if current.is_empty() && unit.whitespace && !rows.is_empty() {
            continue;
        }
        if !current.is_empty() && width + unit.width > available {
            rows.push(close_line(std::mem::take(&mut current)));
            width = 0.0;
            if unit.whitespace {
                continue;
            }
        }
        width += unit.width;
        current.push(unit);
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(close_line(current));
    }
    rows
}

/// Wrap one parsed line into visual lines
pub fn wrap_line<F>(
    line: &ParsedLine,
    class: FontClass,
    style: &ResolvedTextStyle,
    bounds: &Bounds,
    math: &F,
) -> Vec<VisualLine>
where
    F: Fn(&str, MathMode) -> Option<MathSize>,
{
    let base_size = style.font_size;
    let font_size = base_size * line.scale;
    let indent = resolve_indent(line.indent, base_size);
    let available = available_width(bounds, indent);
    let text_advance = style.line_height * font_size;

    match &line.content {
        LineContent::BlockMath(expr) => {
            let Some(size) = math(expr, MathMode::Display).filter(MathSize::is_drawable) else {
                return Vec::new();
            };
            let fit = if size.width > available && available > 0.0 {
                available / size.width
            } else {
                1.0
            };
            let (width, height) = (size.width * fit, size.height * fit);
            vec![VisualLine {
                segments: vec![Segment {
                    content: SegmentContent::Math {
                        expr: expr.clone(),
                        mode: MathMode::Display,
                    },
                    font: StandardFont::select(class, false, true),
                    font_size,
                    width,
                    height,
                }],
                indent,
                bullet: false,
                font_size,
                advance: text_advance.max(height),
                block_math: true,
            }]
        }
        LineContent::Runs(runs) => {
            let mut units = Vec::new();
            for run in runs {
                run_units(run, class, line, base_size, math, &mut units);
            }

            wrap_units(units, available)
                .into_iter()
                .enumerate()
                .map(|(i, segments)| {
                    let tallest = segments
                        .iter()
                        .filter(|s| matches!(s.content, SegmentContent::Math { .. }))
                        .map(|s| s.height)
                        .fold(0.0, f64::max);
                    VisualLine {
                        segments,
                        indent,
                        bullet: line.bullet && i == 0,
                        font_size,
                        advance: text_advance.max(tallest),
                        block_math: false,
                    }
                })
                .collect()
        }
    }
}

/// Lay out a text element's parsed lines inside `bounds`
pub fn layout_text<F>(
    lines: &[ParsedLine],
    bounds: Bounds,
    style: &ResolvedTextStyle,
    math: F,
) -> TextLayout
where
    F: Fn(&str, MathMode) -> Option<MathSize>,
{
    let class = FontClass::classify(&style.font_family);
    let base_size = style.font_size;

    let visual: Vec<VisualLine> = lines
        .iter()
        .flat_map(|line| wrap_line(line, class, style, &bounds, &math))
        .collect();

    // Block height counts every visual line at the base line height
    let total_height = style.line_height * base_size * visual.len() as f64;
    let mut cursor = vertical_start(&bounds, total_height, base_size, style.vertical_align);
    let mut layout = TextLayout {
        lines: Vec::with_capacity(visual.len()),
        total_height,
        clipped: 0,
    };

    for line in visual {
        let top = cursor - base_size;
        let baseline = top + line.font_size;
        let advance = line.advance;
        cursor += advance;

        let extent = if line.block_math {
            top + line.segments.first().map_or(0.0, |s| s.height)
        } else {
            baseline
        };
        if extent > bounds.bottom() + 1e-6 {
            layout.clipped += 1;
            continue;
        }

        let x = horizontal_start(&bounds, line.indent, line.width(), style.align);
        let bullet = (line.bullet && !line.segments.is_empty()).then(|| PlacedBullet {
            x: x - base_size,
            font: StandardFont::select(class, false, false),
            font_size: line.font_size,
        });
        layout.lines.push(PlacedLine {
            line,
            x,
            baseline,
            top,
            bullet,
        });
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_markdown;
    use deck_model::TextStyle;
    use proptest::prelude::*;

    fn style(font_size: f64) -> ResolvedTextStyle {
        ResolvedTextStyle {
            font_size,
            line_height: 1.0,
            ..TextStyle::resolve(None, None)
        }
    }

    fn no_math(_: &str, _: MathMode) -> Option<MathSize> {
        None
    }

    #[test]
    fn test_vertical_alignment_offsets() {
        let bounds = Bounds::new(0.0, 10.0, 960.0, 540.0);
        assert_eq!(vertical_start(&bounds, 100.0, 24.0, VerticalAlign::Top), 10.0 + 4.0 + 24.0);
        assert_eq!(
            vertical_start(&bounds, 100.0, 24.0, VerticalAlign::Middle),
            10.0 + (540.0 - 100.0) / 2.0 + 24.0
        );
        assert_eq!(
            vertical_start(&bounds, 100.0, 24.0, VerticalAlign::Bottom),
            10.0 + 540.0 - 100.0 + 24.0 - 4.0
        );
    }

    #[test]
    fn test_horizontal_alignment_offsets() {
        let bounds = Bounds::new(100.0, 0.0, 200.0, 50.0);
        assert_eq!(horizontal_start(&bounds, 0.0, 50.0, HorizontalAlign::Left), 104.0);
        assert_eq!(horizontal_start(&bounds, 0.0, 50.0, HorizontalAlign::Center), 104.0 + 71.0);
        assert_eq!(horizontal_start(&bounds, 0.0, 50.0, HorizontalAlign::Right), 246.0);
        assert_eq!(horizontal_start(&bounds, 36.0, 50.0, HorizontalAlign::Left), 140.0);
    }

    #[test]
    fn test_list_indent_resolves_against_base_size() {
        assert_eq!(resolve_indent(Indent::List, 24.0), 36.0);
        assert_eq!(resolve_indent(Indent::Fixed(0.0), 24.0), 0.0);
    }

    #[test]
    fn test_wraps_long_paragraph() {
        let lines = parse_markdown("the quick brown fox jumps over the lazy dog");
        let bounds = Bounds::new(0.0, 0.0, 120.0, 400.0);
        let layout = layout_text(&lines, bounds, &style(20.0), no_math);
        assert!(layout.lines.len() > 1);
        for placed in &layout.lines {
            assert!(placed.line.width() <= available_width(&bounds, 0.0) + 1e-9);
            assert!(!placed.line.text().starts_with(' '));
            assert!(!placed.line.text().ends_with(' '));
        }
        let joined: Vec<String> = layout.lines.iter().map(|l| l.line.text()).collect();
        assert_eq!(joined.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_oversize_word_gets_its_own_line() {
        let lines = parse_markdown("a supercalifragilisticexpialidocious b");
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 60.0, 400.0), &style(20.0), no_math);
        let texts: Vec<String> = layout.lines.iter().map(|l| l.line.text()).collect();
        assert_eq!(texts, vec!["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_bullet_only_on_first_row() {
        let lines = parse_markdown("- alpha beta gamma delta epsilon");
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 140.0, 400.0), &style(20.0), no_math);
        assert!(layout.lines.len() > 1);
        let first = &layout.lines[0];
        let bullet = first.bullet.expect("first row has a bullet");
        assert_eq!(first.x, 4.0 + 30.0);
        assert_eq!(bullet.x, first.x - 20.0);
        assert!(layout.lines[1..].iter().all(|l| l.bullet.is_none()));
        assert!(layout.lines.iter().all(|l| l.x == first.x));
    }

    #[test]
    fn test_heading_fonts() {
        let lines = parse_markdown("# Big\n### Small\n`code`");
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 600.0, 400.0), &style(20.0), no_math);
        let first = &layout.lines[0].line.segments[0];
        assert_eq!(first.font, StandardFont::HelveticaBold);
        assert_eq!(first.font_size, 36.0);
        assert_eq!(layout.lines[1].line.segments[0].font, StandardFont::Helvetica);
        assert_eq!(layout.lines[2].line.segments[0].font, StandardFont::Courier);
    }

    #[test]
    fn test_same_face_segments_merge() {
        let lines = parse_markdown("one two **three** four");
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 900.0, 100.0), &style(20.0), no_math);
        let segments = &layout.lines[0].line.segments;
        let texts: Vec<_> = segments.iter().filter_map(Segment::text).collect();
        assert_eq!(texts, vec!["one two ", "three", " four"]);
    }

    #[test]
    fn test_lines_below_box_are_clipped() {
        let lines = parse_markdown("a\nb\nc\nd");
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 200.0, 50.0), &style(20.0), no_math);
        // Baselines at 24, 44, 64, 84
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.clipped, 2);
    }

    #[test]
    fn test_inline_math_uses_lookup_or_falls_back() {
        let lines = parse_markdown("area $x^2$ here");
        let bounds = Bounds::new(0.0, 0.0, 600.0, 100.0);

        let sized = layout_text(&lines, bounds, &style(20.0), |expr: &str, mode| {
            (expr == "x^2" && mode == MathMode::Inline).then(|| MathSize::new(30.0, 22.0))
        });
        let segments = &sized.lines[0].line.segments;
        assert!(segments
            .iter()
            .any(|s| matches!(s.content, SegmentContent::Math { .. }) && s.width == 30.0));
        assert_eq!(sized.lines[0].line.advance, 22.0);

        let fallback = layout_text(&lines, bounds, &style(20.0), no_math);
        assert_eq!(fallback.lines[0].line.text(), "area x^2 here");
        assert!(fallback.lines[0]
            .line
            .segments
            .iter()
            .any(|s| s.font == StandardFont::HelveticaOblique));
    }

    #[test]
    fn test_block_math_fitted_and_dropped() {
        let lines = parse_markdown("$$\\int f$$\ntext");
        let bounds = Bounds::new(0.0, 0.0, 108.0, 400.0);

        let layout = layout_text(&lines, bounds, &style(20.0), |_: &str, mode| {
            (mode == MathMode::Display).then(|| MathSize::new(200.0, 40.0))
        });
        let math = &layout.lines[0].line;
        assert!(math.block_math);
        assert_eq!(math.segments[0].width, 100.0);
        assert_eq!(math.segments[0].height, 20.0);

        let dropped = layout_text(&lines, bounds, &style(20.0), no_math);
        assert_eq!(dropped.lines.len(), 1);
        assert_eq!(dropped.lines[0].line.text(), "text");
    }

    #[test]
    fn test_middle_alignment_centres_block() {
        let lines = parse_markdown("only");
        let style = ResolvedTextStyle {
            vertical_align: VerticalAlign::Middle,
            ..style(20.0)
        };
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 200.0, 100.0), &style, no_math);
        assert_eq!(layout.total_height, 20.0);
        assert_eq!(layout.lines[0].baseline, 40.0 + 20.0);
    }

    #[test]
    fn test_middle_alignment_ignores_heading_scale() {
        let lines = parse_markdown("# Title\nbody");
        let style = ResolvedTextStyle {
            vertical_align: VerticalAlign::Middle,
            ..style(20.0)
        };
        let layout = layout_text(&lines, Bounds::new(0.0, 0.0, 200.0, 100.0), &style, no_math);
        assert_eq!(layout.total_height, 40.0);
        // Start 30 + 20; the heading box opens at 30 and its baseline sits 36 lower
        assert_eq!(layout.lines[0].top, 30.0);
        assert_eq!(layout.lines[0].baseline, 66.0);
    }

    proptest! {
        #[test]
        fn wrapped_lines_fit_unless_single_word(
            words in prop::collection::vec("[a-zA-Z]{1,14}", 1..30),
            width in 40.0f64..400.0,
        ) {
            let content = words.join(" ");
            let lines = parse_markdown(&content);
            let bounds = Bounds::new(0.0, 0.0, width, 10_000.0);
            let layout = layout_text(&lines, bounds, &style(16.0), no_math);
            let available = available_width(&bounds, 0.0);
            for placed in &layout.lines {
                let text = placed.line.text();
                prop_assert!(
                    placed.line.width() <= available + 1e-6 || !text.contains(' '),
                    "line {:?} is {} wide, limit {}", text, placed.line.width(), available
                );
            }
            let rejoined: Vec<String> = layout.lines.iter().map(|l| l.line.text()).collect();
            prop_assert_eq!(rejoined.join(" "), content);
        }
    }
}
