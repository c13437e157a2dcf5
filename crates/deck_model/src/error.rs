//! Error types for deck model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckModelError {
    #[error("Deck JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid element {id}: {reason}")]
    InvalidElement { id: String, reason: String },

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),
}

pub type Result<T> = std::result::Result<T, DeckModelError>;
