//! Text drawer
//!
//! Runs the layout engine over a prepared text element and turns each
//! placed line into text and image descriptors.

use crate::pdf::{ImageRenderInfo, PdfRenderItem, RgbColor, TextRenderInfo};
use crate::prepare::PreparedText;
use deck_model::Bounds;
use layout_engine::{layout_text, MathMode, SegmentContent, BULLET};

/// Inline math is centred on this fraction of the font size above the baseline
const INLINE_MATH_RISE: f64 = 0.35;

pub fn draw_text(text: &PreparedText, bounds: Bounds) -> Vec<PdfRenderItem> {
    let layout = layout_text(&text.lines, bounds, &text.style, |expr, mode| {
        text.math_size(expr, mode)
    });
    if layout.clipped > 0 {
        tracing::debug!("{} text lines clipped at the box bottom", layout.clipped);
    }

    let color = RgbColor::from(text.style.color);
    let mut items = Vec::new();

    for placed in &layout.lines {
        if let Some(bullet) = placed.bullet {
            items.push(PdfRenderItem::Text(TextRenderInfo {
                text: BULLET.to_string(),
                x: bullet.x,
                y: placed.baseline,
                font: bullet.font,
                font_size: bullet.font_size,
                color,
            }));
        }

        let mut x = placed.x;
        for segment in &placed.line.segments {
            match &segment.content {
                SegmentContent::Text(run) => {
                    if !run.trim().is_empty() {
                        items.push(PdfRenderItem::Text(TextRenderInfo {
                            text: run.clone(),
                            x,
                            y: placed.baseline,
                            font: segment.font,
                            font_size: segment.font_size,
                            color,
                        }));
                    }
                }
                SegmentContent::Math { expr, mode } => {
                    if let Some(raster) = text.math(expr, *mode) {
                        let y = match mode {
                            MathMode::Display => placed.top,
                            MathMode::Inline => {
                                placed.baseline
                                    - INLINE_MATH_RISE * segment.font_size
                                    - segment.height / 2.0
                            }
                        };
                        items.push(PdfRenderItem::Image(ImageRenderInfo {
                            image: raster.image.clone(),
                            x,
                            y,
                            width: segment.width,
                            height: segment.height,
                        }));
                    }
                }
            }
            x += segment.width;
        }
    }
    items
}
