//! Deck and slide types

use crate::defaults;
use crate::element::Element;
use crate::error::{DeckModelError, Result};
use crate::style::Theme;
use serde::{Deserialize, Serialize};

/// Logical canvas size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn validate(&self) -> Result<()> {
        let valid = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if valid {
            Ok(())
        } else {
            Err(DeckModelError::InvalidCanvas(format!(
                "{}x{}",
                self.width, self.height
            )))
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: defaults::CANVAS_WIDTH,
            height: defaults::CANVAS_HEIGHT,
        }
    }
}

/// Slide background
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Asset path or data URL of a full-bleed background image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A single slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Transition settings, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hidden: false,
            background: None,
            elements: Vec::new(),
            transition: None,
            notes: None,
        }
    }
}

/// A full presentation: ordered slides plus shared theme and metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub canvas: CanvasSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Parse a deck from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the deck to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Slides that produce pages, in render order
    pub fn visible_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|slide| !slide.hidden)
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone().unwrap_or_default()
    }

    /// Check the shape invariants the export engine relies on
    pub fn validate(&self) -> Result<()> {
        self.canvas.validate()?;
        self.slides
            .iter()
            .flat_map(|slide| slide.elements.iter())
            .try_for_each(Element::validate)
    }
}
