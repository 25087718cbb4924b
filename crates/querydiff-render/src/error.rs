//! Error types for report rendering.

use thiserror::Error;

/// Errors raised while rendering or saving a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// IO error (writing report files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Rendered output was not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Unknown output format name.
    #[error("unknown report format: {0}")]
    UnknownFormat(String),
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
