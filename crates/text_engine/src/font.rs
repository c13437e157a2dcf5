//! Font family classification and standard font faces

use serde::{Deserialize, Serialize};

/// Physical font family a CSS family list is mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontClass {
    #[default]
    Sans,
    Serif,
    Mono,
}

const MONO_KEYWORDS: &[&str] = &["mono", "courier", "consolas", "menlo", "monaco", "code"];
const SERIF_KEYWORDS: &[&str] = &["serif", "times", "georgia", "garamond", "cambria"];

impl FontClass {
    /// Classify a CSS font-family list by keyword substring matching.
    ///
    /// Monospace keywords win, then serif keywords. `sans-serif` and any
    /// family containing `sans` never count as serif.
    pub fn classify(family: &str) -> Self {
        let lower = family.to_lowercase();
        if MONO_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return FontClass::Mono;
        }

        // Drop sans families before looking for serif keywords
        let serif_candidate = lower
            .split(',')
            .map(str::trim)
            .filter(|name| !name.contains("sans"))
            .any(|name| SERIF_KEYWORDS.iter().any(|k| name.contains(k)));
        if serif_candidate {
            FontClass::Serif
        } else {
            FontClass::Sans
        }
    }
}

/// The twelve text faces of the standard PDF font set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// Select the face for a family class and emphasis
    pub fn select(class: FontClass, bold: bool, italic: bool) -> Self {
        match class {
            FontClass::Sans => match (bold, italic) {
                (false, false) => StandardFont::Helvetica,
                (true, false) => StandardFont::HelveticaBold,
                (false, true) => StandardFont::HelveticaOblique,
                (true, true) => StandardFont::HelveticaBoldOblique,
            },
            FontClass::Serif => match (bold, italic) {
                (false, false) => StandardFont::TimesRoman,
                (true, false) => StandardFont::TimesBold,
                (false, true) => StandardFont::TimesItalic,
                (true, true) => StandardFont::TimesBoldItalic,
            },
            FontClass::Mono => match (bold, italic) {
                (false, false) => StandardFont::Courier,
                (true, false) => StandardFont::CourierBold,
                (false, true) => StandardFont::CourierOblique,
                (true, true) => StandardFont::CourierBoldOblique,
            },
        }
    }

    /// Select a face directly from a CSS family list
    pub fn for_family(family: &str, bold: bool, italic: bool) -> Self {
        Self::select(FontClass::classify(family), bold, italic)
    }

    /// Get the PDF name for this font
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// All text faces use WinAnsiEncoding
    pub fn encoding(&self) -> &'static str {
        "WinAnsiEncoding"
    }

    pub fn class(&self) -> FontClass {
        match self {
            StandardFont::Helvetica
            | StandardFont::HelveticaBold
            | StandardFont::HelveticaOblique
            | StandardFont::HelveticaBoldOblique => FontClass::Sans,
            StandardFont::TimesRoman
            | StandardFont::TimesBold
            | StandardFont::TimesItalic
            | StandardFont::TimesBoldItalic => FontClass::Serif,
            StandardFont::Courier
            | StandardFont::CourierBold
            | StandardFont::CourierOblique
            | StandardFont::CourierBoldOblique => FontClass::Mono,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold
                | StandardFont::HelveticaBoldOblique
                | StandardFont::TimesBold
                | StandardFont::TimesBoldItalic
                | StandardFont::CourierBold
                | StandardFont::CourierBoldOblique
        )
    }
}
