//! CSV rendering: one file per report category plus a summary.

use querydiff_core::{ComparisonReport, Record};

use crate::cells::{csv_cell, key_label, summary_metrics, title_case};
use crate::error::{RenderError, Result};

/// One rendered CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    /// File stem, e.g. `matches`.
    pub name: &'static str,
    /// File content.
    pub content: String,
}

/// Renders the report as `matches`, `only_query1`, `only_query2`,
/// `mismatches` and `summary` files.
///
/// Empty categories are skipped except `summary`, which is always present.
pub fn to_csv(report: &ComparisonReport) -> Result<Vec<CsvFile>> {
    let mut files = Vec::with_capacity(5);

    for (name, records) in [
        ("matches", &report.matches),
        ("only_query1", &report.only_in_query1),
        ("only_query2", &report.only_in_query2),
    ] {
        if !records.is_empty() {
            files.push(CsvFile {
                name,
                content: records_csv(records)?,
            });
        }
    }

    if !report.mismatches.is_empty() {
        files.push(CsvFile {
            name: "mismatches",
            content: mismatches_csv(report)?,
        });
    }

    files.push(CsvFile {
        name: "summary",
        content: summary_csv(report)?,
    });

    Ok(files)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| RenderError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn records_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if let Some(first) = records.first() {
        writer.write_record(first.columns())?;
    }
    for record in records {
        writer.write_record(record.iter().map(|(_, value)| csv_cell(value)))?;
    }
    finish(writer)
}

fn mismatches_csv(report: &ComparisonReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["key", "column", "query1_value", "query2_value", "match_status"])?;
    for mismatch in &report.mismatches {
        let key = key_label(&mismatch.key);
        for (column, diff) in mismatch.differences.iter() {
            let query1 = csv_cell(&diff.query1);
            let query2 = csv_cell(&diff.query2);
            writer.write_record([key.as_str(), column, query1.as_str(), query2.as_str(), "MISMATCH"])?;
        }
    }
    finish(writer)
}

fn summary_csv(report: &ComparisonReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["metric", "value"])?;
    for (field, value) in summary_metrics(&report.summary) {
        writer.write_record([title_case(field), value])?;
    }
    finish(writer)
}
