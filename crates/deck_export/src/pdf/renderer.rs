//! Draw Descriptors to Content Streams
//!
//! Drawers describe a page as a list of `PdfRenderItem`s in canvas
//! coordinates (origin top-left, y down). Every item carries its own colours,
//! font and line width; nothing is inherited from an earlier item. The
//! renderer flips coordinates into PDF space and emits the items strictly in
//! list order, so later items paint over earlier ones.

use super::content::ContentStream;
use super::fonts::FontManager;
use super::images::{ImageData, ImageManager};
use deck_model::Color;
use std::collections::BTreeSet;
use std::sync::Arc;
use text_engine::StandardFont;

/// Bezier control distance for a quarter circle of radius 1
const KAPPA: f64 = 0.5523;

/// A color in RGB format (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for RgbColor {
    fn from(color: Color) -> Self {
        let (r, g, b) = color.to_unit_rgb();
        Self { r, g, b }
    }
}

/// Fill and stroke of a closed shape; `None` leaves that part unpainted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Option<RgbColor>,
    pub stroke: Option<RgbColor>,
    pub stroke_width: f64,
}

impl Paint {
    pub fn fill(color: RgbColor) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroke(color: RgbColor, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    fn is_visible(&self) -> bool {
        self.fill.is_some() || self.stroke.is_some()
    }
}

/// A single line of text drawn at its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderInfo {
    pub text: String,
    pub x: f64,
    /// Baseline position from the top of the page
    pub y: f64,
    pub font: StandardFont,
    pub font_size: f64,
    pub color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRenderInfo {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: RgbColor,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRenderInfo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub paint: Paint,
}

/// Ellipse inscribed in a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseRenderInfo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRenderInfo {
    pub points: Vec<(f64, f64)>,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRenderInfo {
    pub image: Arc<ImageData>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Items drawn rotated about a centre point
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRenderInfo {
    /// Clockwise rotation in degrees
    pub rotation: f64,
    pub center: (f64, f64),
    pub items: Vec<PdfRenderItem>,
}

/// Abstract render item for PDF generation
#[derive(Debug, Clone, PartialEq)]
pub enum PdfRenderItem {
    Text(TextRenderInfo),
    Line(LineRenderInfo),
    Rectangle(RectRenderInfo),
    Ellipse(EllipseRenderInfo),
    Polygon(PolygonRenderInfo),
    Image(ImageRenderInfo),
    Group(GroupRenderInfo),
}

/// One page worth of draw descriptors
#[derive(Debug, Clone, PartialEq)]
pub struct PageRenderInfo {
    pub width: f64,
    pub height: f64,
    pub items: Vec<PdfRenderItem>,
}

impl PageRenderInfo {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: PdfRenderItem) {
        self.items.push(item);
    }
}

/// A rendered page: its content stream and the resources it references
#[derive(Debug)]
pub struct RenderedPage {
    pub content: ContentStream,
    pub fonts: BTreeSet<String>,
    pub images: BTreeSet<String>,
}

/// PDF page renderer.
///
/// Font and image resource names are shared by every page it renders.
#[derive(Debug, Default)]
pub struct PdfRenderer {
    font_manager: FontManager,
    image_manager: ImageManager,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_manager(&self) -> &FontManager {
        &self.font_manager
    }

    pub fn image_manager(&self) -> &ImageManager {
        &self.image_manager
    }

    pub fn render_page(&mut self, page: &PageRenderInfo) -> RenderedPage {
        let mut rendered = RenderedPage {
            content: ContentStream::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        };
        for item in &page.items {
            self.render_item(&mut rendered, item, page.height);
        }
        rendered
    }

    fn render_item(&mut self, out: &mut RenderedPage, item: &PdfRenderItem, page_height: f64) {
        match item {
            PdfRenderItem::Text(text) => {
                let name = self.font_manager.register(text.font);
                render_text(&mut out.content, text, &name, page_height);
                out.fonts.insert(name);
            }
            PdfRenderItem::Line(line) => render_line(&mut out.content, line, page_height),
            PdfRenderItem::Rectangle(rect) => render_rectangle(&mut out.content, rect, page_height),
            PdfRenderItem::Ellipse(ellipse) => {
                render_ellipse(&mut out.content, ellipse, page_height)
            }
            PdfRenderItem::Polygon(polygon) => {
                render_polygon(&mut out.content, polygon, page_height)
            }
            PdfRenderItem::Image(image) => {
                let name = self.image_manager.register(&image.image);
                render_image(&mut out.content, image, &name, page_height);
                out.images.insert(name);
            }
            PdfRenderItem::Group(group) => {
                out.content.save_state();
                apply_rotation(&mut out.content, group, page_height);
                for child in &group.items {
                    self.render_item(out, child, page_height);
                }
                out.content.restore_state();
            }
        }
    }
}

fn render_text(content: &mut ContentStream, text: &TextRenderInfo, font_name: &str, page_height: f64) {
    let color = text.color;
    content
        .save_state()
        .begin_text()
        .set_font(font_name, text.font_size)
        .set_fill_rgb(color.r, color.g, color.b)
        .set_text_matrix(1.0, 0.0, 0.0, 1.0, text.x, page_height - text.y)
        .show_text(&text.text)
        .end_text()
        .restore_state();
}

fn render_line(content: &mut ContentStream, line: &LineRenderInfo, page_height: f64) {
    let color = line.color;
    content
        .save_state()
        .set_stroke_rgb(color.r, color.g, color.b)
        .set_line_width(line.width)
        .move_to(line.x1, page_height - line.y1)
        .line_to(line.x2, page_height - line.y2)
        .stroke()
        .restore_state();
}

/// Set colours, run `path`, then paint it according to `paint`
fn paint_path<F>(content: &mut ContentStream, paint: &Paint, path: F)
where
    F: FnOnce(&mut ContentStream),
{
    if !paint.is_visible() {
        return;
    }
    content.save_state();
    if let Some(fill) = paint.fill {
        content.set_fill_rgb(fill.r, fill.g, fill.b);
    }
    if let Some(stroke) = paint.stroke {
        content
            .set_stroke_rgb(stroke.r, stroke.g, stroke.b)
            .set_line_width(paint.stroke_width);
    }
    path(content);
    match (paint.fill.is_some(), paint.stroke.is_some()) {
        (true, true) => content.fill_and_stroke(),
        (true, false) => content.fill(),
        (false, true) => content.stroke(),
        (false, false) => content.end_path(),
    };
    content.restore_state();
}

fn render_rectangle(content: &mut ContentStream, rect: &RectRenderInfo, page_height: f64) {
    let bottom = page_height - rect.y - rect.height;
    let radius = rect.corner_radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    paint_path(content, &rect.paint, |content| {
        if radius <= 0.0 {
            content.rect(rect.x, bottom, rect.width, rect.height);
        } else {
            rounded_rect_path(content, rect.x, bottom, rect.width, rect.height, radius);
        }
    });
}

/// Closed rounded-rectangle path; `(x, y)` is the lower-left corner
fn rounded_rect_path(content: &mut ContentStream, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let k = r * KAPPA;
    let (right, top) = (x + w, y + h);
    content
        .move_to(x + r, y)
        .line_to(right - r, y)
        .curve_to(right - r + k, y, right, y + r - k, right, y + r)
        .line_to(right, top - r)
        .curve_to(right, top - r + k, right - r + k, top, right - r, top)
        .line_to(x + r, top)
        .curve_to(x + r - k, top, x, top - r + k, x, top - r)
        .line_to(x, y + r)
        .curve_to(x, y + r - k, x + r - k, y, x + r, y)
        .close_path();
}

fn render_ellipse(content: &mut ContentStream, ellipse: &EllipseRenderInfo, page_height: f64) {
    let rx = ellipse.width / 2.0;
    let ry = ellipse.height / 2.0;
    let cx = ellipse.x + rx;
    let cy = page_height - ellipse.y - ry;
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    paint_path(content, &ellipse.paint, |content| {
        content
            .move_to(cx + rx, cy)
            .curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close_path();
    });
}

fn render_polygon(content: &mut ContentStream, polygon: &PolygonRenderInfo, page_height: f64) {
    let Some((&(x0, y0), rest)) = polygon.points.split_first() else {
        return;
    };
    paint_path(content, &polygon.paint, |content| {
        content.move_to(x0, page_height - y0);
        for &(x, y) in rest {
            content.line_to(x, page_height - y);
        }
        content.close_path();
    });
}

fn render_image(content: &mut ContentStream, image: &ImageRenderInfo, name: &str, page_height: f64) {
    let bottom = page_height - image.y - image.height;
    // Image space is the unit square, scaled up to the target box
    content
        .save_state()
        .transform(image.width, 0.0, 0.0, image.height, image.x, bottom)
        .draw_xobject(name)
        .restore_state();
}

/// Concatenate a rotation about the group centre, converted to PDF space
fn apply_rotation(content: &mut ContentStream, group: &GroupRenderInfo, page_height: f64) {
    // Clockwise on the canvas is clockwise on the page, i.e. a negative angle in PDF space
    let angle = -group.rotation.to_radians();
    let (sin, cos) = angle.sin_cos();
    let (px, py) = (group.center.0, page_height - group.center.1);
    content.transform(
        cos,
        sin,
        -sin,
        cos,
        px - cos * px + sin * py,
        py - sin * px - cos * py,
    );
}
