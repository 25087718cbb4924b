//! Markdown rendering for documentation and pull requests.

use chrono::NaiveDateTime;

use querydiff_core::{ColumnMapping, ComparisonReport};

use crate::cells::{cell, md_escape, seconds};

/// Number of mismatch records written out in full.
pub const MARKDOWN_MISMATCH_LIMIT: usize = 20;

/// Renders the report as a Markdown document.
///
/// `mapping` is used to show the second query's own name next to each
/// shared column.
#[must_use]
pub fn to_markdown(
    report: &ComparisonReport,
    mapping: &ColumnMapping,
    generated_at: NaiveDateTime,
) -> String {
    let summary = &report.summary;
    let mut md = String::new();

    md.push_str("# SQL Query Comparison Report\n\n");
    md.push_str(&format!("**Generated:** {}  \n", generated_at.format("%Y-%m-%d %H:%M:%S")));
    md.push_str(&format!("**Execution Time:** {}s  \n", seconds(summary)));
    md.push_str(&format!("**Match Rate:** {:.1}%\n\n", summary.match_rate()));

    md.push_str("## Summary Statistics\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    for (label, value) in [
        ("Total Rows (Query 1)", summary.total_rows_query1),
        ("Total Rows (Query 2)", summary.total_rows_query2),
        ("Matches", summary.matches),
        ("Mismatches", summary.mismatches),
        ("Only in Query 1", summary.only_in_query1),
        ("Only in Query 2", summary.only_in_query2),
    ] {
        md.push_str(&format!("| {label} | {value} |\n"));
    }
    md.push('\n');

    if !report.mismatches.is_empty() {
        md.push_str("## Mismatch Details\n\n");
        for (i, mismatch) in report
            .mismatches
            .iter()
            .take(MARKDOWN_MISMATCH_LIMIT)
            .enumerate()
        {
            let key = mismatch
                .key
                .iter()
                .map(|(column, value)| format!("**{}**={}", md_escape(column), md_escape(&cell(value))))
                .collect::<Vec<_>>()
                .join(", ");
            md.push_str(&format!("### Mismatch {}: {key}\n\n", i + 1));
            md.push_str("| Column | Query 1 Value | Query 2 Value |\n");
            md.push_str("|--------|---------------|---------------|\n");
            for (column, diff) in mismatch.differences.iter() {
                md.push_str(&format!(
                    "| {} | `{}` | `{}` |\n",
                    md_escape(column),
                    md_escape(&cell(&diff.query1)),
                    md_escape(&cell(&diff.query2)),
                ));
            }
            md.push('\n');
        }

        let hidden = summary.mismatches.saturating_sub(MARKDOWN_MISMATCH_LIMIT);
        if hidden > 0 {
            md.push_str(&format!("*... and {hidden} more mismatches*\n\n"));
        }
    }

    md.push_str("## Column Mappings\n\n");
    md.push_str("| Query 1 Column | Query 2 Column |\n");
    md.push_str("|----------------|----------------|\n");
    let columns = &report.columns;
    for column in &columns.mapped {
        let right = mapping.reverse_lookup(column).unwrap_or(column.as_str());
        md.push_str(&format!("| {} | {} |\n", md_escape(column), md_escape(right)));
    }

    let unmapped1: Vec<&str> = columns
        .query1
        .iter()
        .filter(|c| !columns.mapped.contains(c))
        .map(String::as_str)
        .collect();
    let unmapped2: Vec<&str> = columns
        .query2
        .iter()
        .map(String::as_str)
        .filter(|c| {
            let mapped_name = mapping.left_name_for(c).unwrap_or(*c);
            !columns.mapped.iter().any(|m| m == mapped_name)
        })
        .collect();
    if !unmapped1.is_empty() {
        md.push_str(&format!("| *{}* | *(unmapped)* |\n", md_escape(&unmapped1.join(", "))));
    }
    if !unmapped2.is_empty() {
        md.push_str(&format!("| *(unmapped)* | *{}* |\n", md_escape(&unmapped2.join(", "))));
    }

    md
}
