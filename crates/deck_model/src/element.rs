//! Slide elements

use crate::error::{DeckModelError, Result};
use crate::style::{CodeStyle, ShapeStyle, TableStyle, TextStyle};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in canvas coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One visual object on a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the box centre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Rotation in degrees, `None` when absent or effectively zero
    pub fn effective_rotation(&self) -> Option<f64> {
        self.rotation
            .filter(|r| r.is_finite() && (r % 360.0).abs() > f64::EPSILON)
    }

    /// The element's type tag as it appears in deck JSON
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Geometry must be finite with a positive size
    pub fn validate(&self) -> Result<()> {
        let coords = [self.x, self.y, self.width, self.height];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(DeckModelError::InvalidElement {
                id: self.id.clone(),
                reason: "non-finite geometry".to_string(),
            });
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(DeckModelError::InvalidElement {
                id: self.id.clone(),
                reason: format!("size must be positive, got {}x{}", self.width, self.height),
            });
        }
        Ok(())
    }
}

/// Geometric shape subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

/// Type-specific payload, selected by the `"type"` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<TextStyle>,
    },
    Code {
        code: String,
        #[serde(default)]
        language: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<CodeStyle>,
    },
    Shape {
        shape: ShapeKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<ShapeStyle>,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Table {
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<TableStyle>,
    },
    #[serde(alias = "svg")]
    Diagram {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        svg: Option<String>,
    },
    Video {
        src: String,
    },
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Code { .. } => "code",
            ElementKind::Shape { .. } => "shape",
            ElementKind::Image { .. } => "image",
            ElementKind::Table { .. } => "table",
            ElementKind::Diagram { .. } => "diagram",
            ElementKind::Video { .. } => "video",
        }
    }
}
