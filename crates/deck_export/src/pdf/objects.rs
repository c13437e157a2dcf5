//! PDF Object Model
//!
//! The handful of basic object types a PDF file is built from, and their
//! byte serialization.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    /// Name object, written with a leading `/`
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// Indirect reference (object number, generation number)
    Reference(u32, u16),
}

/// PDF string encoding
#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    /// Literal string enclosed in parentheses
    Literal(Vec<u8>),
    /// Hexadecimal string enclosed in angle brackets
    Hex(Vec<u8>),
}

impl PdfString {
    pub fn literal(data: impl Into<Vec<u8>>) -> Self {
        PdfString::Literal(data.into())
    }

    /// Literal string for document metadata, encoded as WinAnsi bytes
    pub fn text(s: &str) -> Self {
        PdfString::Literal(text_engine::encode_win_ansi(s))
    }
}

/// PDF dictionary with keys kept in sorted order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }

    /// Set the `Type` entry
    pub fn with_type(mut self, type_name: &str) -> Self {
        self.insert("Type", PdfObject::name(type_name));
        self
    }
}

/// PDF stream (dictionary + data)
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Data already carries its final filter and must not be compressed again
    pub compressed: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            compressed: false,
        }
    }

    /// A stream whose data is already encoded with `filter`
    pub fn encoded(dict: PdfDictionary, data: Vec<u8>, filter: &str) -> Self {
        let mut stream = Self {
            dict,
            data,
            compressed: true,
        };
        stream.dict.insert("Filter", PdfObject::name(filter));
        stream
    }
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn reference(obj_num: u32) -> Self {
        PdfObject::Reference(obj_num, 0)
    }

    pub fn text(s: &str) -> Self {
        PdfObject::String(PdfString::text(s))
    }

    /// Array of reals, as used by MediaBox and matrices
    pub fn reals(values: &[f64]) -> Self {
        PdfObject::Array(values.iter().map(|&v| PdfObject::Real(v)).collect())
    }

    /// Serialize this object
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            PdfObject::Null => out.write_all(b"null"),
            PdfObject::Boolean(b) => write!(out, "{b}"),
            PdfObject::Integer(n) => write!(out, "{n}"),
            PdfObject::Real(n) => out.write_all(format_number(*n).as_bytes()),
            PdfObject::String(s) => write_string(out, s),
            PdfObject::Name(name) => write_name(out, name),
            PdfObject::Array(items) => {
                out.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b" ")?;
                    }
                    item.write_to(out)?;
                }
                out.write_all(b"]")
            }
            PdfObject::Dictionary(dict) => write_dictionary(out, dict),
            PdfObject::Stream(stream) => {
                write_dictionary(out, &stream.dict)?;
                out.write_all(b"\nstream\n")?;
                out.write_all(&stream.data)?;
                out.write_all(b"\nendstream")
            }
            PdfObject::Reference(obj_num, gen_num) => write!(out, "{obj_num} {gen_num} R"),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        buf
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(stream: PdfStream) -> Self {
        PdfObject::Stream(stream)
    }
}

/// Format a number with at most four decimals and no trailing zeros
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let s = format!("{n:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Escape bytes for a literal string body
pub fn escape_literal(data: &[u8], out: &mut Vec<u8>) {
    for &byte in data {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x20..=0x7E | 0x80..=0xFF => out.push(byte),
            _ => out.extend_from_slice(format!("\\{byte:03o}").as_bytes()),
        }
    }
}

fn write_string<W: Write>(out: &mut W, s: &PdfString) -> io::Result<()> {
    match s {
        PdfString::Literal(data) => {
            let mut body = Vec::with_capacity(data.len() + 2);
            body.push(b'(');
            escape_literal(data, &mut body);
            body.push(b')');
            out.write_all(&body)
        }
        PdfString::Hex(data) => {
            out.write_all(b"<")?;
            for byte in data {
                write!(out, "{byte:02X}")?;
            }
            out.write_all(b">")
        }
    }
}

fn write_name<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    out.write_all(b"/")?;
    for byte in name.bytes() {
        let delimiter = matches!(
            byte,
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        );
        if (0x21..=0x7E).contains(&byte) && !delimiter {
            out.write_all(&[byte])?;
        } else {
            write!(out, "#{byte:02X}")?;
        }
    }
    Ok(())
}

fn write_dictionary<W: Write>(out: &mut W, dict: &PdfDictionary) -> io::Result<()> {
    out.write_all(b"<<")?;
    for (key, value) in dict.iter() {
        out.write_all(b" ")?;
        write_name(out, key)?;
        out.write_all(b" ")?;
        value.write_to(out)?;
    }
    out.write_all(b" >>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(obj: &PdfObject) -> String {
        String::from_utf8(obj.to_bytes()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&PdfObject::Null), "null");
        assert_eq!(render(&PdfObject::Boolean(true)), "true");
        assert_eq!(render(&PdfObject::Integer(42)), "42");
        assert_eq!(render(&PdfObject::Real(3.14159)), "3.1416");
        assert_eq!(render(&PdfObject::Real(960.0)), "960");
        assert_eq!(render(&PdfObject::reference(7)), "7 0 R");
    }

    #[test]
    fn test_negative_zero_is_normalised() {
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_string_escapes() {
        let obj = PdfObject::String(PdfString::literal(b"a(b)\\c\n".to_vec()));
        assert_eq!(render(&obj), "(a\\(b\\)\\\\c\\n)");
        let hex = PdfObject::String(PdfString::Hex(vec![0xAB, 0x01]));
        assert_eq!(render(&hex), "<AB01>");
    }

    #[test]
    fn test_text_string_uses_win_ansi() {
        let PdfObject::String(PdfString::Literal(bytes)) = PdfObject::text("caf\u{e9}") else {
            panic!("expected literal");
        };
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(render(&PdfObject::name("Type")), "/Type");
        assert_eq!(render(&PdfObject::name("A B/C")), "/A#20B#2FC");
    }

    #[test]
    fn test_dictionary_and_array() {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("MediaBox", PdfObject::reals(&[0.0, 0.0, 960.0, 540.0]));
        assert_eq!(render(&PdfObject::from(dict)), "<< /MediaBox [0 0 960 540] /Type /Page >>");
    }

    #[test]
    fn test_stream() {
        let stream = PdfStream::new(b"q Q".to_vec());
        assert_eq!(render(&PdfObject::from(stream)), "<< >>\nstream\nq Q\nendstream");
    }
}
