//! Table drawer

use crate::pdf::{LineRenderInfo, Paint, PdfRenderItem, RectRenderInfo, RgbColor, TextRenderInfo};
use crate::prepare::PreparedTable;
use deck_model::Bounds;
use layout_engine::TableGeometry;
use text_engine::{measure_text, StandardFont};

const ELLIPSIS: &str = "\u{2026}";
const BORDER_WIDTH: f64 = 1.0;

/// Cut `text` so it fits in `max_width`, ending with an ellipsis when cut
pub fn truncate_to_width(text: &str, font: StandardFont, font_size: f64, max_width: f64) -> String {
    if measure_text(text, font, font_size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - measure_text(ELLIPSIS, font, font_size);
    let mut kept = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        let w = measure_text(ch.encode_utf8(&mut buf), font, font_size);
        if width + w > budget {
            break;
        }
        width += w;
        kept.push(ch);
    }
    if kept.is_empty() && budget < 0.0 {
        return String::new();
    }
    kept.push_str(ELLIPSIS);
    kept
}

fn cell_text(
    geometry: &TableGeometry,
    row: usize,
    column: usize,
    text: &str,
    font: StandardFont,
    font_size: f64,
    color: RgbColor,
) -> Option<PdfRenderItem> {
    let text = truncate_to_width(text.trim(), font, font_size, geometry.text_width());
    if text.is_empty() {
        return None;
    }
    let (x, y) = geometry.text_origin(row, column, font_size);
    Some(PdfRenderItem::Text(TextRenderInfo {
        text,
        x,
        y,
        font,
        font_size,
        color,
    }))
}

pub fn draw_table(table: &PreparedTable, bounds: Bounds) -> Vec<PdfRenderItem> {
    let style = &table.style;
    let geometry = TableGeometry::for_content(bounds, &table.headers, &table.rows);
    let font_size = style.font_size;
    let border = RgbColor::from(style.border_color);
    let mut items = Vec::new();

    let fill_rect = |rect: Bounds, color: RgbColor| {
        PdfRenderItem::Rectangle(RectRenderInfo {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            corner_radius: 0.0,
            paint: Paint::fill(color),
        })
    };
    if !style.fill.is_transparent() {
        items.push(fill_rect(bounds, style.fill.into()));
    }
    if !style.header_fill.is_transparent() {
        items.push(fill_rect(geometry.row_rect(0), style.header_fill.into()));
    }

    let header_color = RgbColor::from(style.header_color);
    for (column, header) in table.headers.iter().enumerate() {
        items.extend(cell_text(
            &geometry,
            0,
            column,
            header,
            StandardFont::HelveticaBold,
            font_size,
            header_color,
        ));
    }

    let body_color = RgbColor::from(style.color);
    for (r, row) in table.rows.iter().enumerate() {
        for (column, cell) in row.iter().enumerate() {
            items.extend(cell_text(
                &geometry,
                r + 1,
                column,
                cell,
                StandardFont::Helvetica,
                font_size,
                body_color,
            ));
        }
    }

    for separator in geometry
        .column_separators()
        .into_iter()
        .chain(geometry.row_separators())
    {
        items.push(PdfRenderItem::Line(LineRenderInfo {
            x1: separator.from.0,
            y1: separator.from.1,
            x2: separator.to.0,
            y2: separator.to.1,
            color: border,
            width: BORDER_WIDTH,
        }));
    }

    items.push(PdfRenderItem::Rectangle(RectRenderInfo {
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
        corner_radius: 0.0,
        paint: Paint::stroke(border, BORDER_WIDTH),
    }));
    items
}
