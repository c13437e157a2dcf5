//! Defaults table shared with the live canvas renderer.
//!
//! Every value here is used whenever an element, its theme, or the slide
//! omits a setting, so both renderers agree without per-call configuration.

/// Logical canvas width in device pixels
pub const CANVAS_WIDTH: f64 = 960.0;
/// Logical canvas height in device pixels
pub const CANVAS_HEIGHT: f64 = 540.0;

pub const BACKGROUND_COLOR: &str = "#ffffff";

pub const TEXT_COLOR: &str = "#1f2937";
pub const TEXT_FONT_SIZE: f64 = 24.0;
pub const TEXT_FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";
pub const LINE_HEIGHT: f64 = 1.4;

pub const CODE_FONT_SIZE: f64 = 16.0;
pub const CODE_FONT_FAMILY: &str = "JetBrains Mono, Menlo, monospace";
pub const CODE_BACKGROUND: &str = "#1e1e1e";
pub const CODE_FOREGROUND: &str = "#d4d4d4";
pub const CODE_CORNER_RADIUS: f64 = 8.0;
pub const CODE_THEME: &str = "github-dark";

pub const TABLE_FONT_SIZE: f64 = 16.0;
pub const TABLE_TEXT_COLOR: &str = "#1f2937";
pub const TABLE_FILL: &str = "#ffffff";
pub const TABLE_HEADER_FILL: &str = "#374151";
pub const TABLE_HEADER_COLOR: &str = "#ffffff";
pub const TABLE_BORDER_COLOR: &str = "#d1d5db";

pub const SHAPE_FILL: &str = "#3b82f6";
pub const SHAPE_STROKE: &str = "#1e3a8a";
pub const SHAPE_STROKE_WIDTH: f64 = 2.0;
pub const SHAPE_CORNER_RADIUS: f64 = 0.0;
