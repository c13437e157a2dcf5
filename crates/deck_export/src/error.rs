//! Error types for deck export

use crate::pdf::PdfError;
use thiserror::Error;

/// Errors that abort a whole export.
///
/// Per-element failures are logged and the element is skipped instead.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
