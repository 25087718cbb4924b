//! Value-level diffing of matched rows.

use serde::{Serialize, Serializer};

use crate::align::{Alignment, ResolvedKeys};
use crate::table::{Record, Row, Tabular};
use crate::value::Value;

/// Columns present in both schemas after mapping, in left declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedColumns {
    columns: Vec<(String, usize, usize)>,
}

impl SharedColumns {
    /// Intersects the left schema with the (mapped) right schema.
    pub fn between(left: &impl Tabular, right: &impl Tabular) -> Self {
        let columns = left
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(li, name)| right.column_index(name).map(|ri| (name.clone(), li, ri)))
            .collect();
        Self { columns }
    }

    /// Shared column names, key columns included.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _, _)| name.clone()).collect()
    }

    /// Returns the shared columns that are not join keys.
    #[must_use]
    pub fn without_keys(&self, keys: &ResolvedKeys) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|(name, _, _)| !keys.contains(name))
                .cloned()
                .collect(),
        }
    }

    /// Returns `true` if `column` is shared.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|(name, _, _)| name == column)
    }

    /// Returns the number of shared columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no column is shared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The two values of a differing column. Values keep their original type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueDiff {
    /// Value from the first query.
    pub query1: Value,
    /// Value from the second query.
    pub query2: Value,
}

/// Differing columns of one matched row, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDiffs(Vec<(String, ValueDiff)>);

impl ColumnDiffs {
    /// Looks up the difference recorded for a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ValueDiff> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, d)| d)
    }

    /// Iterates over differing columns in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueDiff)> {
        self.0.iter().map(|(c, d)| (c.as_str(), d))
    }

    /// Returns the number of differing columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no column differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ColumnDiffs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, d)| (c, d)))
    }
}

/// A matched row whose shared non-key columns differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchRecord {
    /// Join key values of the row.
    pub key: Record,
    /// Every differing column.
    pub differences: ColumnDiffs,
}

/// Matched pairs split into clean matches and mismatches.
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome<'a> {
    /// Pairs whose compared columns are all equal.
    pub matches: Vec<(&'a Row, &'a Row)>,
    /// Pairs with at least one differing column.
    pub mismatches: Vec<MismatchRecord>,
}

/// Compares one pair of rows column by column.
fn diff_pair(left: &Row, right: &Row, compared: &SharedColumns) -> ColumnDiffs {
    ColumnDiffs(
        compared
            .columns
            .iter()
            .filter(|(_, li, ri)| !left[*li].canonical_eq(&right[*ri]))
            .map(|(name, li, ri)| {
                (
                    name.clone(),
                    ValueDiff {
                        query1: left[*li].clone(),
                        query2: right[*ri].clone(),
                    },
                )
            })
            .collect(),
    )
}

/// Diffs every matched pair of `alignment` over the shared non-key columns.
pub fn diff_matched<'a>(alignment: &Alignment<'a>, compared: &SharedColumns) -> DiffOutcome<'a> {
    let key_index = alignment.keys().left_index();
    let key_columns = alignment.keys().columns();
    let mut outcome = DiffOutcome::default();

    for (left_row, right_row) in alignment.matched() {
        let differences = diff_pair(left_row, right_row, compared);
        if differences.is_empty() {
            outcome.matches.push((left_row, right_row));
        } else {
            let key = Record::new(
                key_columns
                    .iter()
                    .zip(key_index)
                    .map(|(name, &i)| (name.clone(), left_row[i].clone()))
                    .collect(),
            );
            outcome.mismatches.push(MismatchRecord { key, differences });
        }
    }

    tracing::debug!(
        compared = compared.len(),
        matches = outcome.matches.len(),
        mismatches = outcome.mismatches.len(),
        "Diffed matched rows"
    );

    outcome
}
