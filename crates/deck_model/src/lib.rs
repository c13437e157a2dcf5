//! Deck Model - Slide deck document types
//!
//! This crate provides the declarative slide model shared by the live canvas
//! and the export engine: decks, slides, typed elements, themes, the defaults
//! table, and pure style resolution.

mod color;
mod deck;
pub mod defaults;
mod element;
mod error;
pub mod style;

pub use color::*;
pub use deck::*;
pub use element::*;
pub use error::*;
pub use style::*;
