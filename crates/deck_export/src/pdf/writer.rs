//! PDF Writer
//!
//! File generation: object numbering, the body, the cross-reference table
//! and the trailer, with optional Flate compression of content streams.

use super::document::{create_catalog, create_pages, DocumentInfo, MediaBox, PdfPage, PdfVersion};
use super::fonts::create_standard_font_dict;
use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::options::PdfExportOptions;
use super::renderer::{PageRenderInfo, PdfRenderer};
use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level PDF file writer
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset) of every written object
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    version: PdfVersion,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, version: PdfVersion) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            version,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    /// Header plus a comment of high bytes marking the file as binary
    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", self.version.as_str()))?;
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{obj_num} 0 obj\n"))?;
        self.write_bytes(&object.to_bytes())?;
        self.write_str("\nendobj\n")
    }

    /// Write a stream, compressing it first unless it is already encoded
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&stream.data)?;
            stream.data = encoder.finish()?;
            stream.compressed = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream
            .dict
            .insert("Length", PdfObject::Integer(stream.data.len() as i64));
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: u32) -> Result<()> {
        let xref_offset = self.position;
        let offsets: HashMap<u32, u64> = self.offsets.iter().copied().collect();
        let size = self.next_obj_num;

        self.write_str(&format!("xref\n0 {size}\n"))?;
        self.write_str("0000000000 65535 f \n")?;
        for obj_num in 1..size {
            match offsets.get(&obj_num) {
                Some(offset) => self.write_str(&format!("{offset:010} 00000 n \n"))?,
                None => self.write_str("0000000000 65535 f \n")?,
            }
        }

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", PdfObject::Integer(size as i64));
        trailer.insert("Root", PdfObject::reference(catalog_ref));
        trailer.insert("Info", PdfObject::reference(info_ref));

        self.write_str("trailer\n")?;
        self.write_bytes(&PdfObject::from(trailer).to_bytes())?;
        self.write_str(&format!("\nstartxref\n{xref_offset}\n%%EOF\n"))
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Pair each resource name a page uses with its object number
fn resource_refs(names: &BTreeSet<String>, refs: &HashMap<String, u32>) -> Vec<(String, u32)> {
    names
        .iter()
        .filter_map(|name| refs.get(name).map(|&r| (name.clone(), r)))
        .collect()
}

/// High-level PDF document writer
pub struct PdfDocumentWriter {
    options: PdfExportOptions,
}

impl PdfDocumentWriter {
    pub fn new(options: PdfExportOptions) -> Self {
        Self { options }
    }

    /// Write a complete PDF document with one page per `PageRenderInfo`
    pub fn write<W: Write>(&self, pages: &[PageRenderInfo], writer: W) -> Result<()> {
        if pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let mut pdf = PdfWriter::new(writer, self.options.pdf_version.into());
        pdf.set_compression(self.options.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        // Render first so every font and image a page uses is known
        let mut renderer = PdfRenderer::new();
        let rendered: Vec<_> = pages.iter().map(|page| renderer.render_page(page)).collect();

        let mut font_refs = HashMap::new();
        for font in renderer.font_manager().fonts() {
            let obj_ref = pdf.allocate_object();
            pdf.write_object(
                obj_ref,
                &PdfObject::from(create_standard_font_dict(font.standard_font)),
            )?;
            font_refs.insert(font.name, obj_ref);
        }

        let mut image_refs = HashMap::new();
        for (name, image) in renderer.image_manager().images() {
            let smask_ref = match image.soft_mask() {
                Some(mask) => {
                    let mask_ref = pdf.allocate_object();
                    pdf.write_stream_object(mask_ref, mask)?;
                    Some(mask_ref)
                }
                None => None,
            };
            let obj_ref = pdf.allocate_object();
            pdf.write_stream_object(obj_ref, image.to_xobject(smask_ref))?;
            image_refs.insert(name.clone(), obj_ref);
        }

        let mut page_refs = Vec::with_capacity(pages.len());
        for (info, page) in pages.iter().zip(rendered) {
            let content_ref = pdf.allocate_object();
            pdf.write_stream_object(content_ref, PdfStream::new(page.content.into_bytes()))?;

            let pdf_page = PdfPage {
                media_box: MediaBox::from_dimensions(info.width, info.height),
                content_ref,
                fonts: resource_refs(&page.fonts, &font_refs),
                images: resource_refs(&page.images, &image_refs),
            };
            let page_ref = pdf.allocate_object();
            pdf.write_object(page_ref, &PdfObject::from(pdf_page.to_dictionary(pages_ref)))?;
            page_refs.push(page_ref);
        }

        pdf.write_object(catalog_ref, &PdfObject::from(create_catalog(pages_ref)))?;
        pdf.write_object(pages_ref, &PdfObject::from(create_pages(&page_refs)))?;

        let mut info = DocumentInfo::new();
        info.title = self.options.title.clone();
        info.author = self.options.author.clone();
        info.subject = self.options.subject.clone();
        info.keywords = self.options.keywords.clone();
        info.creation_date = Some(Utc::now());
        pdf.write_object(info_ref, &PdfObject::from(info.to_dictionary()))?;

        pdf.write_xref_and_trailer(catalog_ref, info_ref)?;
        pdf.finish()?;
        Ok(())
    }

    pub fn write_to_bytes(&self, pages: &[PageRenderInfo]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(pages, &mut buffer)?;
        Ok(buffer)
    }
}
