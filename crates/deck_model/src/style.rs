//! Element styles, theme defaults, and style resolution
//!
//! Effective style = theme default for the element type, shallow-overridden
//! by the element's own style, with the defaults table filling whatever is
//! still unset. Resolution is pure.

use crate::color::Color;
use crate::defaults;
use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of a text block inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Text element style override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub align: Option<HorizontalAlign>,
    #[serde(default)]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(default)]
    pub line_height: Option<f64>,
}

/// Fully resolved text style
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: Color,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub line_height: f64,
}

impl TextStyle {
    /// Shallow merge: fields set on `over` win
    pub fn merged(&self, over: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: over.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: over.font_size.or(self.font_size),
            color: over.color.clone().or_else(|| self.color.clone()),
            align: over.align.or(self.align),
            vertical_align: over.vertical_align.or(self.vertical_align),
            line_height: over.line_height.or(self.line_height),
        }
    }

    /// Resolve a theme default and an element override against the defaults table
    pub fn resolve(theme: Option<&TextStyle>, element: Option<&TextStyle>) -> ResolvedTextStyle {
        let style = merge_layers(theme, element);
        ResolvedTextStyle {
            font_family: style
                .font_family
                .unwrap_or_else(|| defaults::TEXT_FONT_FAMILY.to_string()),
            font_size: positive_or(style.font_size, defaults::TEXT_FONT_SIZE),
            color: Color::parse_or(style.color.as_deref(), defaults::TEXT_COLOR),
            align: style.align.unwrap_or_default(),
            vertical_align: style.vertical_align.unwrap_or_default(),
            line_height: positive_or(style.line_height, defaults::LINE_HEIGHT),
        }
    }
}

/// Code element style override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStyle {
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Fully resolved code style
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCodeStyle {
    pub font_size: f64,
    pub background: Color,
    pub foreground: Color,
    pub corner_radius: f64,
    pub theme: String,
}

impl CodeStyle {
    pub fn merged(&self, over: &CodeStyle) -> CodeStyle {
        CodeStyle {
            font_size: over.font_size.or(self.font_size),
            background: over.background.clone().or_else(|| self.background.clone()),
            color: over.color.clone().or_else(|| self.color.clone()),
            corner_radius: over.corner_radius.or(self.corner_radius),
            theme: over.theme.clone().or_else(|| self.theme.clone()),
        }
    }

    pub fn resolve(theme: Option<&CodeStyle>, element: Option<&CodeStyle>) -> ResolvedCodeStyle {
        let style = merge_layers(theme, element);
        ResolvedCodeStyle {
            font_size: positive_or(style.font_size, defaults::CODE_FONT_SIZE),
            background: Color::parse_or(style.background.as_deref(), defaults::CODE_BACKGROUND),
            foreground: Color::parse_or(style.color.as_deref(), defaults::CODE_FOREGROUND),
            corner_radius: style
                .corner_radius
                .filter(|r| *r >= 0.0)
                .unwrap_or(defaults::CODE_CORNER_RADIUS),
            theme: style.theme.unwrap_or_else(|| defaults::CODE_THEME.to_string()),
        }
    }
}

/// Shape element style override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
}

/// Fully resolved shape style
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl ShapeStyle {
    pub fn merged(&self, over: &ShapeStyle) -> ShapeStyle {
        ShapeStyle {
            fill: over.fill.clone().or_else(|| self.fill.clone()),
            stroke: over.stroke.clone().or_else(|| self.stroke.clone()),
            stroke_width: over.stroke_width.or(self.stroke_width),
            corner_radius: over.corner_radius.or(self.corner_radius),
        }
    }

    pub fn resolve(theme: Option<&ShapeStyle>, element: Option<&ShapeStyle>) -> ResolvedShapeStyle {
        let style = merge_layers(theme, element);
        ResolvedShapeStyle {
            fill: Color::parse_or(style.fill.as_deref(), defaults::SHAPE_FILL),
            stroke: Color::parse_or(style.stroke.as_deref(), defaults::SHAPE_STROKE),
            stroke_width: style
                .stroke_width
                .filter(|w| *w >= 0.0)
                .unwrap_or(defaults::SHAPE_STROKE_WIDTH),
            corner_radius: style
                .corner_radius
                .filter(|r| *r >= 0.0)
                .unwrap_or(defaults::SHAPE_CORNER_RADIUS),
        }
    }
}

/// Table element style override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub header_fill: Option<String>,
    #[serde(default)]
    pub header_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
}

/// Fully resolved table style
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTableStyle {
    pub font_size: f64,
    pub color: Color,
    pub fill: Color,
    pub header_fill: Color,
    pub header_color: Color,
    pub border_color: Color,
}

impl TableStyle {
    pub fn merged(&self, over: &TableStyle) -> TableStyle {
        TableStyle {
            font_size: over.font_size.or(self.font_size),
            color: over.color.clone().or_else(|| self.color.clone()),
            fill: over.fill.clone().or_else(|| self.fill.clone()),
            header_fill: over.header_fill.clone().or_else(|| self.header_fill.clone()),
            header_color: over.header_color.clone().or_else(|| self.header_color.clone()),
            border_color: over.border_color.clone().or_else(|| self.border_color.clone()),
        }
    }

    pub fn resolve(theme: Option<&TableStyle>, element: Option<&TableStyle>) -> ResolvedTableStyle {
        let style = merge_layers(theme, element);
        ResolvedTableStyle {
            font_size: positive_or(style.font_size, defaults::TABLE_FONT_SIZE),
            color: Color::parse_or(style.color.as_deref(), defaults::TABLE_TEXT_COLOR),
            fill: Color::parse_or(style.fill.as_deref(), defaults::TABLE_FILL),
            header_fill: Color::parse_or(style.header_fill.as_deref(), defaults::TABLE_HEADER_FILL),
            header_color: Color::parse_or(
                style.header_color.as_deref(),
                defaults::TABLE_HEADER_COLOR,
            ),
            border_color: Color::parse_or(
                style.border_color.as_deref(),
                defaults::TABLE_BORDER_COLOR,
            ),
        }
    }
}

/// Per-element-type style defaults for a deck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<TextStyle>,
    #[serde(default)]
    pub code: Option<CodeStyle>,
    #[serde(default)]
    pub shape: Option<ShapeStyle>,
    #[serde(default)]
    pub table: Option<TableStyle>,
}

/// Styles that support a shallow field-wise merge
trait Layered: Clone + Default {
    fn merged(&self, over: &Self) -> Self;
}

impl Layered for TextStyle {
    fn merged(&self, over: &Self) -> Self {
        TextStyle::merged(self, over)
    }
}

impl Layered for CodeStyle {
    fn merged(&self, over: &Self) -> Self {
        CodeStyle::merged(self, over)
    }
}

impl Layered for ShapeStyle {
    fn merged(&self, over: &Self) -> Self {
        ShapeStyle::merged(self, over)
    }
}

impl Layered for TableStyle {
    fn merged(&self, over: &Self) -> Self {
        TableStyle::merged(self, over)
    }
}

fn merge_layers<S: Layered>(theme: Option<&S>, element: Option<&S>) -> S {
    match (theme, element) {
        (Some(theme), Some(element)) => Layered::merged(theme, element),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => S::default(),
    }
}

fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let style = TextStyle::resolve(None, None);
        assert_eq!(style.font_size, defaults::TEXT_FONT_SIZE);
        assert_eq!(style.font_family, defaults::TEXT_FONT_FAMILY);
        assert_eq!(style.line_height, defaults::LINE_HEIGHT);
        assert_eq!(style.align, HorizontalAlign::Left);
        assert_eq!(style.vertical_align, VerticalAlign::Top);
    }

    #[test]
    fn test_element_wins_over_theme() {
        let theme = TextStyle {
            font_size: Some(30.0),
            color: Some("#ff0000".into()),
            align: Some(HorizontalAlign::Center),
            ..Default::default()
        };
        let element = TextStyle {
            font_size: Some(12.0),
            ..Default::default()
        };

        let style = TextStyle::resolve(Some(&theme), Some(&element));
        assert_eq!(style.font_size, 12.0);
        // Unset element fields come from the theme
        assert_eq!(style.color, Color::rgb(255, 0, 0));
        assert_eq!(style.align, HorizontalAlign::Center);
    }

    #[test]
    fn test_non_positive_sizes_fall_back() {
        let element = TextStyle {
            font_size: Some(0.0),
            line_height: Some(-1.0),
            ..Default::default()
        };
        let style = TextStyle::resolve(None, Some(&element));
        assert_eq!(style.font_size, defaults::TEXT_FONT_SIZE);
        assert_eq!(style.line_height, defaults::LINE_HEIGHT);
    }

    #[test]
    fn test_shape_transparent_fill() {
        let element = ShapeStyle {
            fill: Some("transparent".into()),
            ..Default::default()
        };
        let style = ShapeStyle::resolve(None, Some(&element));
        assert!(style.fill.is_transparent());
        assert_eq!(style.stroke_width, defaults::SHAPE_STROKE_WIDTH);
    }

    #[test]
    fn test_code_and_table_defaults() {
        let code = CodeStyle::resolve(None, None);
        assert_eq!(code.font_size, defaults::CODE_FONT_SIZE);
        assert_eq!(code.theme, defaults::CODE_THEME);
        assert_eq!(code.corner_radius, defaults::CODE_CORNER_RADIUS);

        let table = TableStyle::resolve(None, None);
        assert_eq!(table.font_size, defaults::TABLE_FONT_SIZE);
        assert_ne!(table.header_fill, table.fill);
    }

    #[test]
    fn test_alignment_serde() {
        let style: TextStyle =
            serde_json::from_str(r#"{"align":"right","verticalAlign":"middle"}"#).unwrap();
        assert_eq!(style.align, Some(HorizontalAlign::Right));
        assert_eq!(style.vertical_align, Some(VerticalAlign::Middle));
    }
}
