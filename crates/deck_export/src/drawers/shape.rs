//! Shape drawer

use crate::pdf::{
    EllipseRenderInfo, LineRenderInfo, Paint, PdfRenderItem, PolygonRenderInfo, RectRenderInfo,
    RgbColor,
};
use deck_model::{Bounds, ResolvedShapeStyle, ShapeKind};

/// Offset of the arrowhead's back corners from its tip, along both axes
pub const ARROW_HEAD_SIZE: f64 = 10.0;

/// Filled and stroked with a visible fill, stroke-only otherwise
fn closed_paint(style: &ResolvedShapeStyle) -> Paint {
    let stroke = (!style.stroke.is_transparent() && style.stroke_width > 0.0)
        .then(|| RgbColor::from(style.stroke));
    Paint {
        fill: (!style.fill.is_transparent()).then(|| RgbColor::from(style.fill)),
        stroke,
        stroke_width: style.stroke_width,
    }
}

pub fn draw_shape(kind: ShapeKind, style: &ResolvedShapeStyle, bounds: Bounds) -> Vec<PdfRenderItem> {
    match kind {
        ShapeKind::Rectangle => vec![PdfRenderItem::Rectangle(RectRenderInfo {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            corner_radius: style.corner_radius,
            paint: closed_paint(style),
        })],
        ShapeKind::Ellipse => vec![PdfRenderItem::Ellipse(EllipseRenderInfo {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            paint: closed_paint(style),
        })],
        ShapeKind::Line => vec![center_line(style, bounds)],
        ShapeKind::Arrow => {
            let mut items = vec![center_line(style, bounds)];
            let (tip_x, cy) = (bounds.right(), bounds.center().1);
            items.push(PdfRenderItem::Polygon(PolygonRenderInfo {
                points: vec![
                    (tip_x, cy),
                    (tip_x - ARROW_HEAD_SIZE, cy - ARROW_HEAD_SIZE),
                    (tip_x - ARROW_HEAD_SIZE, cy + ARROW_HEAD_SIZE),
                ],
                paint: Paint::fill(line_color(style)),
            }));
            items
        }
    }
}

/// Lines use the stroke colour, or the fill when the stroke is transparent
fn line_color(style: &ResolvedShapeStyle) -> RgbColor {
    if style.stroke.is_transparent() {
        style.fill.into()
    } else {
        style.stroke.into()
    }
}

fn center_line(style: &ResolvedShapeStyle, bounds: Bounds) -> PdfRenderItem {
    let width = if style.stroke_width > 0.0 {
        style.stroke_width
    } else {
        1.0
    };
    let cy = bounds.center().1;
    PdfRenderItem::Line(LineRenderInfo {
        x1: bounds.x,
        y1: cy,
        x2: bounds.right(),
        y2: cy,
        color: line_color(style),
        width,
    })
}
