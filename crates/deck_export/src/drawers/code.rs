//! Code block drawer

use crate::pdf::{Paint, PdfRenderItem, RectRenderInfo, RgbColor, TextRenderInfo};
use crate::prepare::PreparedCode;
use deck_model::Bounds;
use text_engine::{measure_text, StandardFont};

/// Inner padding of the code box on every side
pub const CODE_PADDING: f64 = 16.0;
/// Line advance as a multiple of the code font size
pub const CODE_LINE_HEIGHT: f64 = 1.5;

const CODE_FONT: StandardFont = StandardFont::Courier;

pub fn draw_code(code: &PreparedCode, bounds: Bounds) -> Vec<PdfRenderItem> {
    let style = &code.style;
    let mut items = Vec::new();

    if !style.background.is_transparent() {
        items.push(PdfRenderItem::Rectangle(RectRenderInfo {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            corner_radius: style.corner_radius,
            paint: Paint::fill(style.background.into()),
        }));
    }

    let font_size = style.font_size;
    let advance = CODE_LINE_HEIGHT * font_size;
    let first_baseline = bounds.y + CODE_PADDING + font_size;

    for (i, line) in code.lines.iter().enumerate() {
        let baseline = first_baseline + i as f64 * advance;
        if baseline > bounds.bottom() {
            tracing::debug!("{} code lines clipped", code.lines.len() - i);
            break;
        }

        let mut x = bounds.x + CODE_PADDING;
        for token in line {
            if !token.text.trim().is_empty() {
                items.push(PdfRenderItem::Text(TextRenderInfo {
                    text: token.text.clone(),
                    x,
                    y: baseline,
                    font: CODE_FONT,
                    font_size,
                    color: RgbColor::from(token.color),
                }));
            }
            x += measure_text(&token.text, CODE_FONT, font_size);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_model::{CodeStyle, Color};
    use layout_engine::parse_highlighted;

    fn prepared(markup: &str) -> PreparedCode {
        let style = CodeStyle::resolve(None, None);
        PreparedCode {
            lines: parse_highlighted(markup, style.foreground),
            style,
        }
    }

    #[test]
    fn test_tokens_are_placed_left_to_right() {
        let code = prepared(
            r#"<pre><code><span class="line"><span style="color:#FF0000">const</span> x</span></code></pre>"#,
        );
        let items = draw_code(&code, Bounds::new(100.0, 50.0, 400.0, 200.0));
        let [PdfRenderItem::Rectangle(background), PdfRenderItem::Text(keyword), PdfRenderItem::Text(rest)] =
            items.as_slice()
        else {
            panic!("unexpected items {items:?}");
        };
        assert_eq!(background.corner_radius, 8.0);
        assert_eq!(keyword.text, "const");
        assert_eq!(keyword.color, RgbColor::from(Color::rgb(255, 0, 0)));
        assert_eq!((keyword.x, keyword.y), (116.0, 50.0 + 16.0 + 16.0));
        assert_eq!(rest.text, " x");
        assert_eq!(rest.x, 116.0 + measure_text("const", CODE_FONT, 16.0));
        assert_eq!(rest.font, StandardFont::Courier);
    }

    #[test]
    fn test_lines_advance_and_clip() {
        let markup = (0..10)
            .map(|i| format!("<span class=\"line\">line{i}</span>"))
            .collect::<Vec<_>>()
            .join("\n");
        let code = prepared(&format!("<pre><code>{markup}</code></pre>"));
        // Baselines at 32, 56, 80, 104; the fifth would be 128
        let items = draw_code(&code, Bounds::new(0.0, 0.0, 300.0, 110.0));
        let baselines: Vec<f64> = items
            .iter()
            .filter_map(|item| match item {
                PdfRenderItem::Text(text) => Some(text.y),
                _ => None,
            })
            .collect();
        assert_eq!(baselines, vec![32.0, 56.0, 80.0, 104.0]);
    }
}
