//! Glyph metrics for the standard fonts
//!
//! Advance widths come from the Adobe Font Metrics files shipped with every
//! PDF viewer, in units of 1/1000 em. Oblique and italic faces reuse the
//! upright widths, which differ by at most a few units for Latin text.

use crate::encoding::{win_ansi_byte, SUBSTITUTE_BYTE};
use crate::font::{FontClass, StandardFont};

/// Helvetica widths for 0x20..=0x7E
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, //
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, //
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, //
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, //
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, //
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500, //
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, //
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500, //
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, //
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const COURIER_WIDTH: u16 = 600;

/// Vertical metrics of a face, in 1/1000 em
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub ascent: i16,
    pub descent: i16,
    /// Width used for characters outside the ASCII table
    pub average_width: u16,
}

impl StandardFont {
    pub fn face_metrics(&self) -> FaceMetrics {
        match (self.class(), self.is_bold()) {
            (FontClass::Sans, false) => FaceMetrics {
                ascent: 718,
                descent: -207,
                average_width: 556,
            },
            (FontClass::Sans, true) => FaceMetrics {
                ascent: 718,
                descent: -207,
                average_width: 611,
            },
            (FontClass::Serif, _) => FaceMetrics {
                ascent: 683,
                descent: -217,
                average_width: 500,
            },
            (FontClass::Mono, _) => FaceMetrics {
                ascent: 629,
                descent: -157,
                average_width: COURIER_WIDTH,
            },
        }
    }

    fn ascii_widths(&self) -> Option<&'static [u16; 95]> {
        match (self.class(), self.is_bold()) {
            (FontClass::Sans, false) => Some(&HELVETICA),
            (FontClass::Sans, true) => Some(&HELVETICA_BOLD),
            (FontClass::Serif, false) => Some(&TIMES_ROMAN),
            (FontClass::Serif, true) => Some(&TIMES_BOLD),
            (FontClass::Mono, _) => None,
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em
    pub fn byte_width(&self, byte: u8) -> u16 {
        let Some(table) = self.ascii_widths() else {
            return COURIER_WIDTH;
        };
        match byte {
            0x20..=0x7E => table[(byte - 0x20) as usize],
            0xA0 => table[0],
            _ => self.high_byte_width(byte),
        }
    }

    fn high_byte_width(&self, byte: u8) -> u16 {
        let serif = self.class() == FontClass::Serif;
        match byte {
            0x95 => 350,
            0x85 | 0x97 => 1000,
            0x96 => {
                if serif {
                    500
                } else {
                    556
                }
            }
            0x91 | 0x92 => {
                if serif {
                    333
                } else {
                    222
                }
            }
            0x93 | 0x94 => {
                if serif {
                    444
                } else {
                    333
                }
            }
            _ => self.face_metrics().average_width,
        }
    }

    /// Advance width of a character, in 1/1000 em
    pub fn char_width(&self, ch: char) -> u16 {
        self.byte_width(win_ansi_byte(ch).unwrap_or(SUBSTITUTE_BYTE))
    }
}

/// Measure the advance width of `text` at `font_size`
pub fn measure_text(text: &str, font: StandardFont, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| font.char_width(ch) as u32).sum();
    units as f64 * font_size / 1000.0
}

/// Distance from baseline to the top of the tallest glyphs
pub fn ascent(font: StandardFont, font_size: f64) -> f64 {
    font.face_metrics().ascent as f64 * font_size / 1000.0
}

/// Distance from baseline to the lowest descender (negative)
pub fn descent(font: StandardFont, font_size: f64) -> f64 {
    font.face_metrics().descent as f64 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_helvetica_hello() {
        // H e l l o = 722 + 556 + 222 + 222 + 556
        let width = measure_text("Hello", StandardFont::Helvetica, 10.0);
        assert!((width - 22.78).abs() < 1e-9);
    }

    #[test]
    fn test_courier_is_monospaced() {
        assert_eq!(measure_text("iiii", StandardFont::Courier, 10.0), 24.0);
        assert_eq!(measure_text("WWWW", StandardFont::CourierBold, 10.0), 24.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = measure_text("Slide title", StandardFont::Helvetica, 24.0);
        let bold = measure_text("Slide title", StandardFont::HelveticaBold, 24.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_italic_uses_upright_widths() {
        assert_eq!(
            measure_text("abc", StandardFont::TimesItalic, 12.0),
            measure_text("abc", StandardFont::TimesRoman, 12.0)
        );
    }

    #[test]
    fn test_unmappable_measures_as_question_mark() {
        assert_eq!(
            measure_text("✓", StandardFont::Helvetica, 10.0),
            measure_text("?", StandardFont::Helvetica, 10.0)
        );
        assert_eq!(StandardFont::Helvetica.char_width('•'), 350);
    }

    #[test]
    fn test_vertical_metrics() {
        assert!((ascent(StandardFont::Helvetica, 10.0) - 7.18).abs() < 1e-9);
        assert!(descent(StandardFont::TimesRoman, 10.0) < 0.0);
    }

    proptest! {
        #[test]
        fn width_is_additive(a in "[ -~]{0,20}", b in "[ -~]{0,20}") {
            let font = StandardFont::HelveticaBold;
            let joined = format!("{a}{b}");
            let total = measure_text(&a, font, 16.0) + measure_text(&b, font, 16.0);
            prop_assert!((measure_text(&joined, font, 16.0) - total).abs() < 1e-6);
        }
    }
}
