//! The comparison report: summary counts, bounded previews and column
//! metadata.
//!
//! Field names of the serialized report are a stable contract for the
//! renderers (`summary`, `matches`, `only_in_query1`, `only_in_query2`,
//! `mismatches`, `columns`).

use std::time::Duration;

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::align::{Alignment, ResolvedKeys};
use crate::diff::{DiffOutcome, MismatchRecord, SharedColumns};
use crate::error::{CompareError, Result};
use crate::mapping::MappedResult;
use crate::table::{Record, Row, Tabular, TabularResult};

/// Maximum number of rows kept per report category.
pub const DEFAULT_PREVIEW_LIMIT: usize = 100;

/// Suffix for left values of shared columns in merged match rows.
pub const LEFT_SUFFIX: &str = "_query1";

/// Suffix for right values of shared columns in merged match rows.
pub const RIGHT_SUFFIX: &str = "_query2";

/// Aggregate counts. Always computed over the full, untruncated results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Rows returned by the first query.
    pub total_rows_query1: usize,
    /// Rows returned by the second query.
    pub total_rows_query2: usize,
    /// Matched pairs with no differing column.
    pub matches: usize,
    /// Left rows without a partner.
    pub only_in_query1: usize,
    /// Right rows without a partner.
    pub only_in_query2: usize,
    /// Matched pairs with at least one differing column.
    pub mismatches: usize,
    /// Wall-clock time of the comparison, serialized in seconds.
    #[serde(serialize_with = "serialize_seconds")]
    pub execution_time: Duration,
}

impl Summary {
    /// Number of matched pairs, clean or not.
    #[must_use]
    pub const fn matched_pairs(&self) -> usize {
        self.matches + self.mismatches
    }

    /// Share of rows, across both sides, that belong to a clean match, in
    /// percent. Zero when both sides are empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn match_rate(&self) -> f64 {
        let total = self.total_rows_query1 + self.total_rows_query2;
        if total == 0 {
            return 0.0;
        }
        (self.matches * 2) as f64 / total as f64 * 100.0
    }
}

fn serialize_seconds<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64((duration.as_secs_f64() * 100.0).round() / 100.0)
}

/// Column metadata of both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnsInfo {
    /// Columns of the first query.
    pub query1: Vec<String>,
    /// Columns of the second query, before mapping.
    pub query2: Vec<String>,
    /// Columns present on both sides after mapping, join keys included.
    pub mapped: Vec<String>,
}

/// The outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Counts and timing.
    pub summary: Summary,
    /// Merged rows of clean matches, at most the preview limit.
    pub matches: Vec<Record>,
    /// Left-only rows, at most the preview limit.
    pub only_in_query1: Vec<Record>,
    /// Right-only rows under mapped column names, at most the preview limit.
    pub only_in_query2: Vec<Record>,
    /// Mismatch records, at most the preview limit.
    pub mismatches: Vec<MismatchRecord>,
    /// Column metadata.
    pub columns: ColumnsInfo,
}

impl ComparisonReport {
    /// Returns `true` when every row matched cleanly on both sides.
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.summary.mismatches == 0
            && self.summary.only_in_query1 == 0
            && self.summary.only_in_query2 == 0
    }
}

/// Assembles a [`ComparisonReport`] from the pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    preview_limit: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_LIMIT)
    }
}

impl ReportBuilder {
    /// Creates a builder keeping at most `preview_limit` rows per category.
    #[must_use]
    pub const fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    /// Builds the report. `execution_time` is left at zero for the caller
    /// to fill in once the whole comparison is done.
    ///
    /// Fails with [`CompareError::SchemaMismatch`] if the merged match-row
    /// layout would hold the same column name twice.
    pub fn build(
        &self,
        left: &TabularResult,
        right: &MappedResult<'_>,
        alignment: &Alignment<'_>,
        outcome: DiffOutcome<'_>,
        shared: &SharedColumns,
    ) -> Result<ComparisonReport> {
        let merger = Merger::new(left, right, alignment.keys(), shared)?;

        let summary = Summary {
            total_rows_query1: left.len(),
            total_rows_query2: right.rows().len(),
            matches: outcome.matches.len(),
            only_in_query1: alignment.left_only().count(),
            only_in_query2: alignment.right_only().count(),
            mismatches: outcome.mismatches.len(),
            execution_time: Duration::ZERO,
        };

        let matches = outcome
            .matches
            .iter()
            .take(self.preview_limit)
            .map(|(l, r)| merger.merge(l, r))
            .collect();
        let only_in_query1 = alignment
            .left_only()
            .take(self.preview_limit)
            .map(|row| left.record(row))
            .collect();
        let only_in_query2 = alignment
            .right_only()
            .take(self.preview_limit)
            .map(|row| right.record(row))
            .collect();

        let mut mismatches = outcome.mismatches;
        mismatches.truncate(self.preview_limit);

        Ok(ComparisonReport {
            summary,
            matches,
            only_in_query1,
            only_in_query2,
            mismatches,
            columns: ColumnsInfo {
                query1: left.columns().to_vec(),
                query2: right.original_columns().to_vec(),
                mapped: shared.names(),
            },
        })
    }
}

/// Lays out a matched pair as one record: key columns once, shared columns
/// suffixed per side, unshared columns under their own name.
struct Merger {
    layout: Vec<(String, Source)>,
}

#[derive(Clone, Copy)]
enum Source {
    Left(usize),
    Right(usize),
}

impl Merger {
    fn new(
        left: &TabularResult,
        right: &MappedResult<'_>,
        keys: &ResolvedKeys,
        shared: &SharedColumns,
    ) -> Result<Self> {
        let mut layout = Vec::with_capacity(left.columns().len() + right.columns().len());
        for (i, name) in left.columns().iter().enumerate() {
            let column = if keys.contains(name) || !shared.contains(name) {
                name.clone()
            } else {
                format!("{name}{LEFT_SUFFIX}")
            };
            layout.push((column, Source::Left(i)));
        }
        for (i, name) in right.columns().iter().enumerate() {
            if keys.contains(name) {
                continue;
            }
            let column = if shared.contains(name) {
                format!("{name}{RIGHT_SUFFIX}")
            } else {
                name.clone()
            };
            layout.push((column, Source::Right(i)));
        }

        let mut seen = HashSet::with_capacity(layout.len());
        for (column, _) in &layout {
            if !seen.insert(column.as_str()) {
                return Err(CompareError::SchemaMismatch {
                    side: None,
                    message: format!("merged column '{column}' would appear twice in matched rows"),
                });
            }
        }

        Ok(Self { layout })
    }

    fn merge(&self, left: &Row, right: &Row) -> Record {
        Record::new(
            self.layout
                .iter()
                .map(|(column, source)| {
                    let value = match *source {
                        Source::Left(i) => left[i].clone(),
                        Source::Right(i) => right[i].clone(),
                    };
                    (column.clone(), value)
                })
                .collect(),
        )
    }
}
