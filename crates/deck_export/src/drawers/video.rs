//! Video placeholder drawer

use crate::pdf::{Paint, PdfRenderItem, RectRenderInfo, RgbColor, TextRenderInfo};
use deck_model::{Bounds, Color};
use text_engine::{measure_text, StandardFont};

pub const VIDEO_LABEL: &str = "[Video]";

const PLACEHOLDER_FILL: Color = Color::rgb(0x1f, 0x29, 0x37);
const PLACEHOLDER_BORDER: Color = Color::rgb(0x4b, 0x55, 0x63);
const LABEL_COLOR: Color = Color::rgb(0xd1, 0xd5, 0xdb);
const LABEL_SIZE: f64 = 20.0;
const LABEL_FONT: StandardFont = StandardFont::Helvetica;

pub fn draw_video(bounds: Bounds) -> Vec<PdfRenderItem> {
    let (cx, cy) = bounds.center();
    let label_width = measure_text(VIDEO_LABEL, LABEL_FONT, LABEL_SIZE);
    vec![
        PdfRenderItem::Rectangle(RectRenderInfo {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            corner_radius: 0.0,
            paint: Paint {
                fill: Some(PLACEHOLDER_FILL.into()),
                stroke: Some(PLACEHOLDER_BORDER.into()),
                stroke_width: 2.0,
            },
        }),
        PdfRenderItem::Text(TextRenderInfo {
            text: VIDEO_LABEL.to_string(),
            x: cx - label_width / 2.0,
            y: cy + LABEL_SIZE * 0.35,
            font: LABEL_FONT,
            font_size: LABEL_SIZE,
            color: RgbColor::from(LABEL_COLOR),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_label_is_centred() {
        let items = draw_video(Bounds::new(0.0, 0.0, 400.0, 200.0));
        let [PdfRenderItem::Rectangle(frame), PdfRenderItem::Text(label)] = items.as_slice() else {
            panic!("unexpected items {items:?}");
        };
        assert!(frame.paint.fill.is_some() && frame.paint.stroke.is_some());
        assert_eq!(label.text, VIDEO_LABEL);
        let width = measure_text(VIDEO_LABEL, LABEL_FONT, LABEL_SIZE);
        assert!((label.x + width / 2.0 - 200.0).abs() < 1e-9);
        assert!((label.y - 107.0).abs() < 1e-9);
    }
}
