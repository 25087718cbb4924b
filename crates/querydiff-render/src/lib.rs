//! # querydiff-render
//!
//! Renderers for [`querydiff_core::ComparisonReport`]:
//!
//! - **JSON** with a metadata envelope
//! - **CSV**, one file per report category plus a summary
//! - **HTML**, a standalone page with summary cards and tables
//! - **Markdown** for documentation
//!
//! [`ReportWriter`] saves any combination of them as timestamped files.

use std::fmt;
use std::str::FromStr;

pub mod cells;
pub mod csv;
pub mod error;
pub mod html;
pub mod json;
pub mod markdown;
pub mod writer;

pub use self::csv::{to_csv, CsvFile};
pub use error::{RenderError, Result};
pub use html::to_html;
pub use json::to_json;
pub use markdown::to_markdown;
pub use writer::{ReportWriter, SavedReport};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// JSON document.
    Json,
    /// CSV files.
    Csv,
    /// HTML page.
    Html,
    /// Markdown document.
    Markdown,
}

impl ReportFormat {
    /// Every supported format.
    pub const ALL: [Self; 4] = [Self::Json, Self::Csv, Self::Html, Self::Markdown];

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }

    /// Format name as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" | "htm" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{RenderError, Result};
    pub use crate::writer::{ReportWriter, SavedReport};
    pub use crate::{to_csv, to_html, to_json, to_markdown, ReportFormat};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert!(matches!(
            "xlsx".parse::<ReportFormat>(),
            Err(RenderError::UnknownFormat(name)) if name == "xlsx"
        ));
    }

    #[test]
    fn test_format_round_trips_through_display() {
        for format in ReportFormat::ALL {
            assert_eq!(format.to_string().parse::<ReportFormat>().unwrap(), format);
        }
    }
}
