//! PDF Export Options

use super::document::PdfVersion;
use serde::{Deserialize, Serialize};

/// Options for PDF export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfExportOptions {
    /// Document title; the deck title is used when unset
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Whether to Flate-compress content streams
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default)]
    pub pdf_version: PdfVersionOption,
}

fn default_compress() -> bool {
    true
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            compress: default_compress(),
            pdf_version: PdfVersionOption::default(),
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_version(mut self, version: PdfVersionOption) -> Self {
        self.pdf_version = version;
        self
    }
}

/// PDF version option for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PdfVersionOption {
    #[default]
    V14,
    V15,
    V17,
}

impl From<PdfVersionOption> for PdfVersion {
    fn from(opt: PdfVersionOption) -> Self {
        match opt {
            PdfVersionOption::V14 => PdfVersion::V1_4,
            PdfVersionOption::V15 => PdfVersion::V1_5,
            PdfVersionOption::V17 => PdfVersion::V1_7,
        }
    }
}
