//! The comparison pipeline: map, align, diff, report.

use std::time::Instant;

use tracing::info;

use crate::align::{align, JoinKeySet};
use crate::diff::{diff_matched, SharedColumns};
use crate::error::Result;
use crate::mapping::ColumnMapping;
use crate::report::{ComparisonReport, ReportBuilder, DEFAULT_PREVIEW_LIMIT};
use crate::table::TabularResult;

/// Tunables of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Maximum number of rows kept per report category.
    pub preview_limit: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl CompareOptions {
    /// Sets the preview limit.
    #[must_use]
    pub const fn preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }
}

/// Compares two materialized results with the default options.
pub fn compare(
    left: &TabularResult,
    right: &TabularResult,
    mapping: &ColumnMapping,
    keys: &JoinKeySet,
) -> Result<ComparisonReport> {
    compare_with(left, right, mapping, keys, &CompareOptions::default())
}

/// Compares two materialized results.
///
/// Fails before any row is processed if the mapping or the join keys do not
/// fit the schemas, and without a report if suffixing shared columns would
/// clash with an existing column name.
pub fn compare_with(
    left: &TabularResult,
    right: &TabularResult,
    mapping: &ColumnMapping,
    keys: &JoinKeySet,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    compare_since(Instant::now(), left, right, mapping, keys, options)
}

/// Runs the pipeline, reporting the time elapsed since `started`.
pub(crate) fn compare_since(
    started: Instant,
    left: &TabularResult,
    right: &TabularResult,
    mapping: &ColumnMapping,
    keys: &JoinKeySet,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    let mapped = mapping.apply(right)?;
    let alignment = align(left, &mapped, keys)?;

    let shared = SharedColumns::between(left, &mapped);
    let compared = shared.without_keys(alignment.keys());
    let outcome = diff_matched(&alignment, &compared);

    let mut report = ReportBuilder::new(options.preview_limit).build(
        left,
        &mapped,
        &alignment,
        outcome,
        &shared,
    )?;
    report.summary.execution_time = started.elapsed();

    info!(
        matches = report.summary.matches,
        mismatches = report.summary.mismatches,
        only_in_query1 = report.summary.only_in_query1,
        only_in_query2 = report.summary.only_in_query2,
        elapsed_ms = report.summary.execution_time.as_millis(),
        "Comparison finished"
    );

    Ok(report)
}
