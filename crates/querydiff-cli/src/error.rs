//! Error types for the command-line tool.

use querydiff_core::CompareError;
use querydiff_render::RenderError;

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The query was rejected before execution.
    #[error("{0}")]
    InvalidQuery(String),

    /// A query returned more rows than allowed.
    #[error("Query returned more than {limit} rows")]
    RowLimitExceeded {
        /// The configured row cap.
        limit: usize,
    },

    /// The command did not finish in time.
    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    /// A `--map` argument was not of the form `LEFT=RIGHT`.
    #[error("Invalid column mapping '{0}', expected LEFT=RIGHT")]
    MappingArgument(String),

    /// Database error during query execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The comparison itself failed.
    #[error(transparent)]
    Compare(#[from] CompareError),

    /// A report could not be rendered or saved.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// IO error (reading query files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for command-line operations.
pub type Result<T> = std::result::Result<T, CliError>;
