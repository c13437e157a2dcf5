//! PDF Export Backend
//!
//! Turns pages of draw descriptors into a PDF file.
//!
//! # Architecture
//!
//! - `objects`: PDF object model and serialization
//! - `document`: Catalog, page tree, page resources, info dictionary
//! - `content`: Content stream operators
//! - `fonts`: Standard font resources
//! - `images`: Image XObjects (JPEG passthrough, decoded pixel re-encoding)
//! - `renderer`: Draw descriptors to content streams
//! - `options`: Export configuration
//! - `writer`: File structure and cross-reference table

mod content;
mod document;
mod fonts;
mod images;
mod objects;
mod options;
mod renderer;
mod writer;

pub use content::ContentStream;
pub use document::PdfVersion;
pub use images::{ColorSpace, ImageData, ImageError, ImageFilter, MAX_IMAGE_DIMENSION};
pub use options::*;
pub use renderer::*;
pub use writer::{PdfDocumentWriter, PdfError};

/// A 1x1 RGB PNG for tests outside this module
#[cfg(test)]
pub(crate) fn png_fixture() -> Vec<u8> {
    let pixel = image::RgbImage::from_pixel(1, 1, image::Rgb([200, 30, 30]));
    images::tests::png_bytes(image::DynamicImage::ImageRgb8(pixel))
}
