//! Text helpers shared by the renderers.

use querydiff_core::{Record, Summary, Value};

/// Renders a value for a table cell. NULL becomes `NULL`.
pub fn cell(value: &Value) -> String {
    value.to_string()
}

/// Renders a value for CSV output. NULL becomes an empty field.
pub fn csv_cell(value: &Value) -> String {
    value.canonical().unwrap_or_default()
}

/// Renders a mismatch key as `col=value, col=value`.
pub fn key_label(key: &Record) -> String {
    key.iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turns a snake_case field name into a title, e.g. `only_in_query1` into
/// `Only In Query1`.
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary fields in report order, as `(field name, rendered value)`.
pub fn summary_metrics(summary: &Summary) -> Vec<(&'static str, String)> {
    vec![
        ("total_rows_query1", summary.total_rows_query1.to_string()),
        ("total_rows_query2", summary.total_rows_query2.to_string()),
        ("matches", summary.matches.to_string()),
        ("only_in_query1", summary.only_in_query1.to_string()),
        ("only_in_query2", summary.only_in_query2.to_string()),
        ("mismatches", summary.mismatches.to_string()),
        ("execution_time", seconds(summary)),
    ]
}

/// Execution time in seconds with two decimals.
pub fn seconds(summary: &Summary) -> String {
    format!("{:.2}", summary.execution_time.as_secs_f64())
}

/// Escapes text for embedding in HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escapes text for a Markdown table cell.
pub fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Review status derived from the match rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// At least 95% of rows matched.
    Excellent,
    /// At least 80% of rows matched.
    Good,
    /// Anything lower.
    NeedsReview,
}

impl Status {
    /// Classifies a match rate given in percent.
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 95.0 {
            Self::Excellent
        } else if rate >= 80.0 {
            Self::Good
        } else {
            Self::NeedsReview
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsReview => "Needs Review",
        }
    }

    /// Badge color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#28a745",
            Self::Good => "#ffc107",
            Self::NeedsReview => "#dc3545",
        }
    }
}
