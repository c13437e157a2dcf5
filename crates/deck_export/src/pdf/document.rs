//! PDF Document Structure
//!
//! Catalog, page tree, page dictionaries with their resources, and the
//! document information dictionary.

use super::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};

/// PDF version written in the file header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfVersion {
    #[default]
    V1_4,
    V1_5,
    V1_7,
}

impl PdfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_7 => "1.7",
        }
    }
}

/// Document information dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self {
            creator: Some("Deck Export".to_string()),
            producer: Some(format!("deck_export {}", env!("CARGO_PKG_VERSION"))),
            ..Default::default()
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let text_fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        }
        if !self.keywords.is_empty() {
            dict.insert("Keywords", PdfObject::text(&self.keywords.join(", ")));
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(&date)));
        }
        dict
    }
}

/// Format a timestamp as a PDF date string, e.g. `D:20240131120000Z`
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}

/// Page dimensions in points, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::reals(&[0.0, 0.0, self.width, self.height])
    }
}

/// A page ready to be written: its box, content stream and resources
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub media_box: MediaBox,
    pub content_ref: u32,
    /// Font resource name -> object number
    pub fonts: Vec<(String, u32)>,
    /// Image XObject resource name -> object number
    pub images: Vec<(String, u32)>,
}

impl PdfPage {
    pub fn build_resources(&self) -> PdfDictionary {
        let mut resources = PdfDictionary::new();

        if !self.fonts.is_empty() {
            let mut fonts = PdfDictionary::new();
            for (name, obj_ref) in &self.fonts {
                fonts.insert(name.clone(), PdfObject::reference(*obj_ref));
            }
            resources.insert("Font", fonts.into());
        }

        if !self.images.is_empty() {
            let mut xobjects = PdfDictionary::new();
            for (name, obj_ref) in &self.images {
                xobjects.insert(name.clone(), PdfObject::reference(*obj_ref));
            }
            resources.insert("XObject", xobjects.into());
        }

        let mut proc_set = vec![PdfObject::name("PDF"), PdfObject::name("Text")];
        if !self.images.is_empty() {
            proc_set.push(PdfObject::name("ImageB"));
            proc_set.push(PdfObject::name("ImageC"));
        }
        resources.insert("ProcSet", PdfObject::Array(proc_set));

        resources
    }

    pub fn to_dictionary(&self, parent_ref: u32) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Parent", PdfObject::reference(parent_ref));
        dict.insert("MediaBox", self.media_box.to_array());
        dict.insert("Contents", PdfObject::reference(self.content_ref));
        dict.insert("Resources", self.build_resources().into());
        dict
    }
}

pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    let mut catalog = PdfDictionary::new().with_type("Catalog");
    catalog.insert("Pages", PdfObject::reference(pages_ref));
    catalog
}

pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let mut pages = PdfDictionary::new().with_type("Pages");
    pages.insert(
        "Kids",
        PdfObject::Array(page_refs.iter().map(|&r| PdfObject::reference(r)).collect()),
    );
    pages.insert("Count", PdfObject::Integer(page_refs.len() as i64));
    pages
}
