//! Error types for the comparison pipeline.

use std::fmt;

/// Which of the two compared results an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first query (left side).
    Left,
    /// The second query (right side), after column mapping.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("query1"),
            Self::Right => f.write_str("query2"),
        }
    }
}

/// Errors that abort a comparison. No partial report is produced.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A join key is absent from one of the schemas or listed twice, or the
    /// merged match-row layout would repeat a column name.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// The side whose schema is missing the column, if any.
        side: Option<Side>,
        /// Error message.
        message: String,
    },

    /// No join keys were given and the schemas share no column to fall back on.
    #[error("No common column to join on")]
    NoCommonColumn,

    /// A column mapping is duplicated or conflicts with an existing column.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// A result schema lists the same column twice.
    #[error("Duplicate column '{0}' in result")]
    DuplicateColumn(String),

    /// A row does not carry one value per column.
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        /// Row index.
        row: usize,
        /// Number of columns in the schema.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// The query execution provider failed; its error is passed through as is.
    #[error("Query execution failed: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CompareError {
    /// Builds a [`CompareError::SchemaMismatch`] for a column missing on `side`.
    pub(crate) fn missing_column(side: Side, column: &str) -> Self {
        Self::SchemaMismatch {
            side: Some(side),
            message: format!("join key '{column}' not found in {side} columns"),
        }
    }
}

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;
