//! Writing rendered reports to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;

use querydiff_core::{ColumnMapping, ComparisonReport};

use crate::error::Result;
use crate::{csv, html, json, markdown, ReportFormat};

/// File stem of the JSON, HTML and Markdown reports.
pub const REPORT_STEM: &str = "comparison_report";

/// A report file written by [`ReportWriter::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    /// Format of the file.
    pub format: ReportFormat,
    /// Path of the file.
    pub path: PathBuf,
}

/// Renders a report in several formats and saves the files.
#[derive(Debug, Clone)]
pub struct ReportWriter<'a> {
    report: &'a ComparisonReport,
    mapping: Option<&'a ColumnMapping>,
    generated_at: NaiveDateTime,
}

impl<'a> ReportWriter<'a> {
    /// Creates a writer stamped with the current local time.
    #[must_use]
    pub fn new(report: &'a ComparisonReport) -> Self {
        Self {
            report,
            mapping: None,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Sets the mapping shown in the Markdown column table.
    #[must_use]
    pub const fn mapping(mut self, mapping: &'a ColumnMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Overrides the generation timestamp.
    #[must_use]
    pub const fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    /// Renders the report as a single document. CSV output is the
    /// concatenation of its files, each preceded by a `# name` line.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => json::to_json(self.report, self.generated_at, true),
            ReportFormat::Html => Ok(html::to_html(self.report, self.generated_at)),
            ReportFormat::Markdown => Ok(markdown::to_markdown(
                self.report,
                self.mapping.unwrap_or(&ColumnMapping::identity()),
                self.generated_at,
            )),
            ReportFormat::Csv => Ok(csv::to_csv(self.report)?
                .into_iter()
                .map(|file| format!("# {}\n{}", file.name, file.content))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Writes one timestamped file per format (several for CSV) into `dir`,
    /// creating it if needed.
    pub fn save(&self, dir: &Path, formats: &[ReportFormat]) -> Result<Vec<SavedReport>> {
        fs::create_dir_all(dir)?;
        let stamp = self.generated_at.format("%Y%m%d_%H%M%S").to_string();
        let mut saved = Vec::new();

        for &format in formats {
            if format == ReportFormat::Csv {
                for file in csv::to_csv(self.report)? {
                    let path = dir.join(format!("{}_{stamp}.csv", file.name));
                    fs::write(&path, file.content)?;
                    saved.push(SavedReport { format, path });
                }
                continue;
            }

            let content = self.render(format)?;
            let path = dir.join(format!("{REPORT_STEM}_{stamp}.{}", format.extension()));
            fs::write(&path, content)?;
            saved.push(SavedReport { format, path });
        }

        info!(dir = %dir.display(), files = saved.len(), "Reports saved");
        Ok(saved)
    }
}
