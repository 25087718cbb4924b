//! Column mapping between the two result schemas.
//!
//! A mapping pair `(left, right)` says that the right result's column
//! `right` holds the same data as the left result's column `left`. Applying
//! the mapping relabels the right schema into the left namespace; rows are
//! borrowed, never copied.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{CompareError, Result};
use crate::table::{Row, Tabular, TabularResult};

/// A validated set of `(left, right)` column name pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    pairs: Vec<(String, String)>,
}

impl ColumnMapping {
    /// Creates a mapping, rejecting empty names and any left or right name
    /// that appears in more than one pair.
    pub fn new<L, R>(pairs: impl IntoIterator<Item = (L, R)>) -> Result<Self>
    where
        L: Into<String>,
        R: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(l, r)| (l.into(), r.into()))
            .collect();

        let mut lefts = HashSet::new();
        let mut rights = HashSet::new();
        for (left, right) in &pairs {
            if left.is_empty() || right.is_empty() {
                return Err(CompareError::InvalidMapping(format!(
                    "empty column name in pair '{left}' = '{right}'"
                )));
            }
            if !lefts.insert(left.as_str()) {
                return Err(CompareError::InvalidMapping(format!(
                    "left column '{left}' is mapped more than once"
                )));
            }
            if !rights.insert(right.as_str()) {
                return Err(CompareError::InvalidMapping(format!(
                    "right column '{right}' is mapped more than once"
                )));
            }
        }

        Ok(Self { pairs })
    }

    /// Returns an empty mapping (every column compared under its own name).
    #[must_use]
    pub const fn identity() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Returns the declared pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` if no pairs were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the left-side name a right column is renamed to.
    #[must_use]
    pub fn left_name_for(&self, right: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, r)| r == right)
            .map(|(l, _)| l.as_str())
    }

    /// Returns the original right-side name of a left-namespace column.
    #[must_use]
    pub fn reverse_lookup(&self, left: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(l, _)| l == left)
            .map(|(_, r)| r.as_str())
    }

    /// Relabels `right` into the left namespace.
    ///
    /// Columns without a pair keep their name. Pairs naming a right column
    /// that does not exist are ignored. A rename that would land on a name
    /// still used by another right column is rejected.
    pub fn apply<'a>(&self, right: &'a TabularResult) -> Result<MappedResult<'a>> {
        for (left, r) in &self.pairs {
            if !right.has_column(r) {
                debug!(left = %left, right = %r, "Mapping pair ignored, right column absent");
            }
        }

        let columns: Vec<String> = right
            .columns()
            .iter()
            .map(|c| self.left_name_for(c).unwrap_or(c.as_str()).to_string())
            .collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for (renamed, original) in columns.iter().zip(right.columns()) {
            if !seen.insert(renamed.as_str()) {
                return Err(CompareError::InvalidMapping(format!(
                    "mapping '{original}' to '{renamed}' conflicts with an existing column"
                )));
            }
        }

        Ok(MappedResult {
            columns,
            source: right,
        })
    }
}

/// A right-side result viewed under its mapped column names.
#[derive(Debug, Clone)]
pub struct MappedResult<'a> {
    columns: Vec<String>,
    source: &'a TabularResult,
}

impl MappedResult<'_> {
    /// Returns the column names as they were before mapping.
    #[must_use]
    pub fn original_columns(&self) -> &[String] {
        self.source.columns()
    }
}

impl Tabular for MappedResult<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[Row] {
        self.source.rows()
    }
}
