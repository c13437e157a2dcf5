//! Layout Engine - Slide text and table layout
//!
//! This crate turns the declarative content of slide elements into measured,
//! positioned pieces ready for drawing: inline run tokenizing, markdown line
//! classification, highlighter markup parsing, word wrapping and table grid
//! geometry. Everything here is pure and synchronous.

pub mod code_tokens;
pub mod inline;
pub mod markdown;
mod table_layout;
pub mod text_layout;

pub use code_tokens::{parse_highlighted, CodeLine, CodeToken};
pub use inline::{tokenize, TextRun};
pub use markdown::{parse_document, parse_markdown, Indent, LineContent, ParsedDocument, ParsedLine};
pub use table_layout::*;
pub use text_layout::{
    layout_text, MathMode, MathSize, PlacedBullet, PlacedLine, Segment, SegmentContent, TextLayout,
    VisualLine, BULLET,
};
