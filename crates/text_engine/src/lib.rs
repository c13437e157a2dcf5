//! Text Engine - Fonts and metrics for the export renderer
//!
//! The export target only has the standard PDF fonts available, so every CSS
//! font family is mapped onto one of three physical families and measured
//! with the built-in AFM advance widths.
//!
//! # Modules
//!
//! - `font`: Family classification and the standard font faces
//! - `metrics`: Advance widths, ascent and descent
//! - `encoding`: WinAnsiEncoding byte mapping

mod encoding;
mod font;
mod metrics;

pub use encoding::*;
pub use font::*;
pub use metrics::*;
