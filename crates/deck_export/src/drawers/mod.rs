//! Primitive Drawers
//!
//! The synchronous half of an export: each prepared element becomes a list
//! of draw descriptors. Drawers never await and never touch the page; the
//! assembler appends what they return in element order.

mod code;
mod image;
mod shape;
mod table;
mod text;
mod video;

pub use code::{draw_code, CODE_LINE_HEIGHT, CODE_PADDING};
pub use image::{draw_diagram, draw_image};
pub use shape::{draw_shape, ARROW_HEAD_SIZE};
pub use table::{draw_table, truncate_to_width};
pub use text::draw_text;
pub use video::{draw_video, VIDEO_LABEL};

use crate::pdf::{GroupRenderInfo, PdfRenderItem};
use crate::prepare::{Prepared, PreparedElement};

/// Switches that change what drawers emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    pub video_placeholders: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            video_placeholders: true,
        }
    }
}

/// Draw one prepared element, wrapped in a rotation group when rotated
pub fn draw_element(prepared: &PreparedElement<'_>, options: &DrawOptions) -> Vec<PdfRenderItem> {
    let element = prepared.element;
    let bounds = element.bounds();
    let items = match &prepared.prepared {
        Prepared::Text(text) => draw_text(text, bounds),
        Prepared::Code(code) => draw_code(code, bounds),
        Prepared::Shape(kind, style) => draw_shape(*kind, style, bounds),
        Prepared::Table(table) => draw_table(table, bounds),
        Prepared::Image(image) => draw_image(image, bounds),
        Prepared::Diagram(raster) => draw_diagram(raster, bounds),
        Prepared::Video if options.video_placeholders => draw_video(bounds),
        Prepared::Video | Prepared::Skipped => Vec::new(),
    };

    match element.effective_rotation() {
        Some(rotation) if !items.is_empty() => vec![PdfRenderItem::Group(GroupRenderInfo {
            rotation,
            center: bounds.center(),
            items,
        })],
        _ => items,
    }
}
