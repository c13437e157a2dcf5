//! PDF Content Stream Generation
//!
//! A builder for the graphics operators that make up a page:
//!
//! - `q`/`Q`/`cm`: graphics state and transforms
//! - `m`/`l`/`c`/`re`/`h`: path construction
//! - `S`/`f`/`B`/`n`: path painting
//! - `rg`/`RG`/`w`: colours and line width
//! - `BT`/`ET`/`Tf`/`Tm`/`Tj`: text
//! - `Do`: XObject placement
//!
//! Coordinates passed in are already in PDF user space (origin bottom-left).

use super::objects::{escape_literal, format_number};
use std::fmt::Write as _;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `operands... operator` on its own line
    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        let mut line = String::new();
        for &n in operands {
            let _ = write!(line, "{} ", format_number(n));
        }
        line.push_str(operator);
        line.push('\n');
        self.data.extend_from_slice(line.as_bytes());
        self
    }

    // Graphics state

    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    // Colour

    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r, g, b], "rg")
    }

    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r, g, b], "RG")
    }

    // Paths

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.op(&[x1, y1, x2, y2, x3, y3], "c")
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.op(&[], "h")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    pub fn fill_and_stroke(&mut self) -> &mut Self {
        self.op(&[], "B")
    }

    /// End the path without painting it
    pub fn end_path(&mut self) -> &mut Self {
        self.op(&[], "n")
    }

    // Text

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    pub fn set_font(&mut self, font_name: &str, size: f64) -> &mut Self {
        let line = format!("/{} {} Tf\n", font_name, format_number(size));
        self.data.extend_from_slice(line.as_bytes());
        self
    }

    pub fn set_text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "Tm")
    }

    /// Show text in the current font, encoded as WinAnsi bytes
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.data.push(b'(');
        escape_literal(&text_engine::encode_win_ansi(text), &mut self.data);
        self.data.extend_from_slice(b") Tj\n");
        self
    }

    // XObjects

    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        let line = format!("/{name} Do\n");
        self.data.extend_from_slice(line.as_bytes());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &ContentStream) -> String {
        String::from_utf8_lossy(content.as_bytes()).into_owned()
    }

    #[test]
    fn test_path_operators() {
        let mut content = ContentStream::new();
        content
            .save_state()
            .set_fill_rgb(1.0, 0.5, 0.0)
            .rect(10.0, 20.0, 100.5, 50.0)
            .fill()
            .restore_state();
        assert_eq!(text(&content), "q\n1 0.5 0 rg\n10 20 100.5 50 re\nf\nQ\n");
    }

    #[test]
    fn test_text_operators() {
        let mut content = ContentStream::new();
        content
            .begin_text()
            .set_font("F0", 24.0)
            .set_text_matrix(1.0, 0.0, 0.0, 1.0, 72.0, 500.0)
            .show_text("Hello (world)")
            .end_text();
        assert_eq!(
            text(&content),
            "BT\n/F0 24 Tf\n1 0 0 1 72 500 Tm\n(Hello \\(world\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_show_text_encodes_win_ansi() {
        let mut content = ContentStream::new();
        content.show_text("\u{2022} \u{4e2d}");
        assert_eq!(content.as_bytes(), &[b'(', 0x95, b' ', b'?', b')', b' ', b'T', b'j', b'\n']);
    }

    #[test]
    fn test_xobject() {
        let mut content = ContentStream::new();
        content.transform(200.0, 0.0, 0.0, 100.0, 10.0, 20.0).draw_xobject("Im0");
        assert_eq!(text(&content), "200 0 0 100 10 20 cm\n/Im0 Do\n");
    }
}
