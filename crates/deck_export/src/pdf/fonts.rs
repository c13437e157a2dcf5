//! PDF Font Resources
//!
//! Only the standard Type 1 fonts are used, so a font resource is just a
//! small dictionary naming the face and its encoding.

use super::objects::{PdfDictionary, PdfObject};
use std::collections::BTreeMap;
use text_engine::StandardFont;

/// A font registered for the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    /// Resource name, e.g. `F0`
    pub name: String,
    pub standard_font: StandardFont,
}

/// Assigns resource names to the faces a document uses
#[derive(Debug, Default)]
pub struct FontManager {
    fonts: BTreeMap<StandardFont, String>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for `font`, registering it on first use
    pub fn register(&mut self, font: StandardFont) -> String {
        let next = self.fonts.len();
        self.fonts
            .entry(font)
            .or_insert_with(|| format!("F{next}"))
            .clone()
    }

    /// Registered fonts in registration order
    pub fn fonts(&self) -> Vec<FontInfo> {
        let mut fonts: Vec<FontInfo> = self
            .fonts
            .iter()
            .map(|(&standard_font, name)| FontInfo {
                name: name.clone(),
                standard_font,
            })
            .collect();
        fonts.sort_by_key(|f| f.name[1..].parse::<usize>().unwrap_or(usize::MAX));
        fonts
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

/// Font dictionary for one of the standard faces
pub fn create_standard_font_dict(font: StandardFont) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Font");
    dict.insert("Subtype", PdfObject::name("Type1"));
    dict.insert("BaseFont", PdfObject::name(font.pdf_name()));
    dict.insert("Encoding", PdfObject::name(font.encoding()));
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_reuses_names() {
        let mut manager = FontManager::new();
        assert_eq!(manager.register(StandardFont::Helvetica), "F0");
        assert_eq!(manager.register(StandardFont::Courier), "F1");
        assert_eq!(manager.register(StandardFont::Helvetica), "F0");
        assert_eq!(manager.font_count(), 2);
    }

    #[test]
    fn test_fonts_in_registration_order() {
        let mut manager = FontManager::new();
        for font in [
            StandardFont::TimesBold,
            StandardFont::Helvetica,
            StandardFont::Courier,
        ] {
            manager.register(font);
        }
        let fonts: Vec<StandardFont> = manager.fonts().iter().map(|f| f.standard_font).collect();
        assert_eq!(
            fonts,
            vec![StandardFont::TimesBold, StandardFont::Helvetica, StandardFont::Courier]
        );
    }

    #[test]
    fn test_font_dict() {
        let dict = create_standard_font_dict(StandardFont::HelveticaBold);
        assert_eq!(dict.get("BaseFont"), Some(&PdfObject::name("Helvetica-Bold")));
        assert_eq!(dict.get("Encoding"), Some(&PdfObject::name("WinAnsiEncoding")));
    }
}
