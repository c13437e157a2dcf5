//! Deck Export - Slide deck to PDF
//!
//! Re-renders a slide deck into a PDF without the live canvas: markdown text
//! is parsed, measured and wrapped with standard font metrics, highlighted
//! code is placed token by token, shapes and tables are drawn as vector
//! paths, and math and SVG diagrams are embedded through a rasterizer.
//!
//! # Pipeline
//!
//! 1. `prepare`: asynchronous per-element work (assets, highlighting,
//!    rasterization), run concurrently within a slide
//! 2. `drawers`: synchronous conversion of prepared elements to draw
//!    descriptors, committed in element order
//! 3. `pdf`: content streams, resources and file structure
//!
//! ```ignore
//! use deck_export::{DeckExporter, FsAssetResolver, NullRasterizer, PlainHighlighter};
//!
//! let exporter = DeckExporter::new(FsAssetResolver::new("assets"), PlainHighlighter, NullRasterizer);
//! let pdf = exporter.export(&deck).await?;
//! ```

mod assembler;
pub mod drawers;
mod error;
pub mod pdf;
pub mod prepare;
pub mod raster;
mod services;
mod settings;

pub use assembler::*;
pub use error::*;
pub use services::*;
pub use settings::*;
