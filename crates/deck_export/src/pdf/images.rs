//! PDF Image Handling
//!
//! Image XObjects for embedded pictures and rasterised content. JPEG data is
//! passed through untouched with the DCT filter; every other format the
//! `image` crate reads (PNG, GIF, WebP, BMP) is decoded and re-encoded as
//! Flate pixel data, with any alpha channel split out into a soft mask.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{DynamicImage, ImageReader, Limits};
use std::io::{self, Cursor, Write};
use std::sync::Arc;
use thiserror::Error;

/// Largest width or height accepted from a decoded image
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;
/// Decoder allocation ceiling in bytes
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Colour space of image samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }
}

/// Filter the image data is encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DCTDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DCTDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// Error type for image operations
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),
    #[error("Unsupported image: {0}")]
    Unsupported(String),
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Encoded image data ready to become an XObject
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
    /// Sample data, encoded with `filter`
    pub data: Vec<u8>,
    pub filter: ImageFilter,
    /// Flate-encoded 8-bit alpha samples, present only when some pixel is not opaque
    pub alpha: Option<Vec<u8>>,
}

impl ImageData {
    /// Decode an image file, detected by its signature
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.starts_with(&[0xFF, 0xD8]) {
            return Self::from_jpeg(bytes.to_vec());
        }

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(ImageError::Unsupported("unrecognised image format".to_string()));
        }
        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
        limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
        limits.max_alloc = Some(MAX_DECODE_ALLOC);
        reader.limits(limits);

        Self::from_decoded(reader.decode()?)
    }

    /// Wrap JPEG data without re-encoding it
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let header = parse_jpeg_header(&data)?;
        let color_space = match header.components {
            1 => ColorSpace::DeviceGray,
            3 => ColorSpace::DeviceRGB,
            4 => ColorSpace::DeviceCMYK,
            n => {
                return Err(ImageError::Unsupported(format!("JPEG with {n} components")));
            }
        };
        Ok(Self {
            width: header.width,
            height: header.height,
            bits_per_component: 8,
            color_space,
            data,
            filter: ImageFilter::DCTDecode,
            alpha: None,
        })
    }

    /// Re-encode decoded pixels at 8 bits per component
    pub fn from_decoded(image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = (image.width(), image.height());
        let color = image.color();
        match (color.has_color(), color.has_alpha()) {
            (true, true) => {
                let rgba = image.into_rgba8();
                let (pixels, alpha) = split_alpha(rgba.as_raw(), 3);
                Self::from_pixels(width, height, ColorSpace::DeviceRGB, &pixels, Some(&alpha))
            }
            (true, false) => {
                let rgb = image.into_rgb8();
                Self::from_pixels(width, height, ColorSpace::DeviceRGB, rgb.as_raw(), None)
            }
            (false, true) => {
                let luma = image.into_luma_alpha8();
                let (pixels, alpha) = split_alpha(luma.as_raw(), 1);
                Self::from_pixels(width, height, ColorSpace::DeviceGray, &pixels, Some(&alpha))
            }
            (false, false) => {
                let luma = image.into_luma8();
                Self::from_pixels(width, height, ColorSpace::DeviceGray, luma.as_raw(), None)
            }
        }
    }

    /// Compress raw 8-bit samples, with an optional separate alpha plane
    pub fn from_pixels(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        pixels: &[u8],
        alpha: Option<&[u8]>,
    ) -> Result<Self, ImageError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(color_space.components()))
            .ok_or_else(|| {
                ImageError::InvalidFormat(format!("{width}x{height} image is too large"))
            })?;
        if pixels.len() != expected {
            return Err(ImageError::InvalidFormat(format!(
                "expected {expected} samples, got {}",
                pixels.len()
            )));
        }
        let alpha = match alpha {
            Some(samples) if samples.iter().any(|&a| a != u8::MAX) => Some(deflate(samples)?),
            _ => None,
        };
        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            data: deflate(pixels)?,
            filter: ImageFilter::FlateDecode,
            alpha,
        })
    }

    /// Natural aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    fn base_dict(&self, color_space: ColorSpace) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with_type("XObject");
        dict.insert("Subtype", PdfObject::name("Image"));
        dict.insert("Width", PdfObject::Integer(self.width as i64));
        dict.insert("Height", PdfObject::Integer(self.height as i64));
        dict.insert("ColorSpace", PdfObject::name(color_space.pdf_name()));
        dict.insert(
            "BitsPerComponent",
            PdfObject::Integer(self.bits_per_component as i64),
        );
        dict
    }

    /// Image XObject stream, referencing `smask_ref` when given
    pub fn to_xobject(&self, smask_ref: Option<u32>) -> PdfStream {
        let mut dict = self.base_dict(self.color_space);
        if let Some(smask) = smask_ref {
            dict.insert("SMask", PdfObject::reference(smask));
        }
        PdfStream::encoded(dict, self.data.clone(), self.filter.pdf_name())
    }

    /// Soft mask XObject for the alpha channel, if the image has one
    pub fn soft_mask(&self) -> Option<PdfStream> {
        let alpha = self.alpha.as_ref()?;
        let dict = self.base_dict(ColorSpace::DeviceGray);
        Some(PdfStream::encoded(
            dict,
            alpha.clone(),
            ImageFilter::FlateDecode.pdf_name(),
        ))
    }
}

/// Split interleaved samples whose last channel is alpha
fn split_alpha(samples: &[u8], color_components: usize) -> (Vec<u8>, Vec<u8>) {
    let stride = color_components + 1;
    let mut pixels = Vec::with_capacity(samples.len() / stride * color_components);
    let mut alpha = Vec::with_capacity(samples.len() / stride);
    for pixel in samples.chunks_exact(stride) {
        pixels.extend_from_slice(&pixel[..color_components]);
        alpha.push(pixel[color_components]);
    }
    (pixels, alpha)
}

fn deflate(samples: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples)?;
    Ok(encoder.finish()?)
}

struct JpegHeader {
    width: u32,
    height: u32,
    components: u8,
}

/// Walk JPEG markers up to the first start-of-frame segment
fn parse_jpeg_header(data: &[u8]) -> Result<JpegHeader, ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidFormat("not a JPEG file".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(ImageError::InvalidFormat("invalid JPEG marker".to_string()));
        }
        // Fill bytes may precede a marker
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        let Some(&marker) = data.get(pos + 1) else {
            break;
        };
        pos += 2;

        if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == 0xD9 || pos + 2 > data.len() {
            break;
        }

        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_frame {
            let Some(frame) = data.get(pos + 2..pos + 8) else {
                break;
            };
            return Ok(JpegHeader {
                height: u16::from_be_bytes([frame[1], frame[2]]) as u32,
                width: u16::from_be_bytes([frame[3], frame[4]]) as u32,
                components: frame[5],
            });
        }
        pos += length;
    }

    Err(ImageError::InvalidFormat(
        "no frame header in JPEG data".to_string(),
    ))
}

/// Assigns resource names to the images a document embeds.
///
/// The same shared image drawn several times is embedded once.
#[derive(Debug, Default)]
pub struct ImageManager {
    images: Vec<(String, Arc<ImageData>)>,
}

impl ImageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for `image`, registering it on first use
    pub fn register(&mut self, image: &Arc<ImageData>) -> String {
        if let Some((name, _)) = self.images.iter().find(|(_, i)| Arc::ptr_eq(i, image)) {
            return name.clone();
        }
        let name = format!("Im{}", self.images.len());
        self.images.push((name.clone(), Arc::clone(image)));
        name
    }

    pub fn images(&self) -> &[(String, Arc<ImageData>)] {
        &self.images
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, RgbaImage};

    /// Minimal baseline JPEG header: SOI, APP0 and SOF0
    pub(crate) fn jpeg_header(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46];
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        data.extend_from_slice(&[0u8; 9]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn test_jpeg_passthrough() {
        let bytes = jpeg_header(640, 480, 3);
        let image = ImageData::decode(&bytes).unwrap();
        assert_eq!((image.width, image.height), (640, 480));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.filter, ImageFilter::DCTDecode);
        assert_eq!(image.data, bytes);
        assert!(image.soft_mask().is_none());
    }

    #[test]
    fn test_grayscale_jpeg() {
        let image = ImageData::from_jpeg(jpeg_header(10, 20, 1)).unwrap();
        assert_eq!(image.color_space, ColorSpace::DeviceGray);
        assert_eq!(image.aspect_ratio(), 0.5);
    }

    #[test]
    fn test_truncated_jpeg_is_rejected() {
        assert!(ImageData::decode(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).is_err());
    }

    /// Encode `image` as a PNG file
    pub(crate) fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Rewrite the IHDR dimensions of a PNG file, keeping its CRC valid
    fn with_png_dimensions(mut png: Vec<u8>, width: u32, height: u32) -> Vec<u8> {
        png[16..20].copy_from_slice(&width.to_be_bytes());
        png[20..24].copy_from_slice(&height.to_be_bytes());
        let mut crc = flate2::Crc::new();
        crc.update(&png[12..29]);
        png[29..33].copy_from_slice(&crc.sum().to_be_bytes());
        png
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let err = ImageData::decode(b"plain text, not pixels").unwrap_err();
        assert!(matches!(err, ImageError::Unsupported(_)));
    }

    #[test]
    fn test_png_with_alpha_gets_soft_mask() {
        let rgba = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 64]).unwrap();
        let image = ImageData::decode(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.filter, ImageFilter::FlateDecode);
        assert!(image.soft_mask().is_some());
    }

    #[test]
    fn test_gray_png_stays_gray() {
        let luma = GrayImage::from_raw(3, 1, vec![0, 128, 255]).unwrap();
        let image = ImageData::decode(&png_bytes(DynamicImage::ImageLuma8(luma))).unwrap();
        assert_eq!(image.color_space, ColorSpace::DeviceGray);
        assert!(image.alpha.is_none());
    }

    #[test]
    fn test_gif_is_decoded() {
        let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut out, ImageFormat::Gif)
            .unwrap();
        let image = ImageData::decode(&out.into_inner()).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.filter, ImageFilter::FlateDecode);
    }

    #[test]
    fn test_huge_declared_dimensions_are_rejected() {
        let png = png_bytes(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)));
        for (width, height) in [(u32::MAX, u32::MAX), (MAX_IMAGE_DIMENSION + 1, 1)] {
            let forged = with_png_dimensions(png.clone(), width, height);
            assert!(ImageData::decode(&forged).is_err());
        }
    }

    #[test]
    fn test_sample_count_overflow_is_an_error() {
        let err = ImageData::from_pixels(u32::MAX, u32::MAX, ColorSpace::DeviceCMYK, &[0; 4], None)
            .unwrap_err();
        assert!(matches!(err, ImageError::InvalidFormat(_)));
    }

    #[test]
    fn test_opaque_alpha_is_dropped() {
        let image = ImageData::from_pixels(
            2,
            1,
            ColorSpace::DeviceRGB,
            &[0, 0, 0, 255, 255, 255],
            Some(&[255, 255]),
        )
        .unwrap();
        assert!(image.alpha.is_none());
    }

    #[test]
    fn test_xobject_with_soft_mask() {
        let image =
            ImageData::from_pixels(1, 1, ColorSpace::DeviceGray, &[128], Some(&[10])).unwrap();
        let xobject = image.to_xobject(Some(12));
        assert_eq!(xobject.dict.get("SMask"), Some(&PdfObject::reference(12)));
        assert_eq!(xobject.dict.get("Filter"), Some(&PdfObject::name("FlateDecode")));
        assert!(xobject.compressed);

        let mask = image.soft_mask().unwrap();
        assert_eq!(mask.dict.get("ColorSpace"), Some(&PdfObject::name("DeviceGray")));
    }

    #[test]
    fn test_sample_count_is_checked() {
        assert!(ImageData::from_pixels(2, 2, ColorSpace::DeviceRGB, &[0; 5], None).is_err());
    }

    #[test]
    fn test_image_manager_dedupes_shared_images() {
        let a = Arc::new(ImageData::from_jpeg(jpeg_header(1, 1, 3)).unwrap());
        let b = Arc::new(ImageData::from_jpeg(jpeg_header(1, 1, 3)).unwrap());
        let mut manager = ImageManager::new();
        assert_eq!(manager.register(&a), "Im0");
        assert_eq!(manager.register(&b), "Im1");
        assert_eq!(manager.register(&a), "Im0");
        assert_eq!(manager.image_count(), 2);
    }
}
