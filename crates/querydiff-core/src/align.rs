//! Row alignment: a full outer join of two results on their key columns.
//!
//! Keys are compared on the canonical string form of their values. A key
//! containing NULL never matches anything, as in SQL joins. Rows sharing a
//! key fan out into one pair per left/right combination.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{CompareError, Result, Side};
use crate::table::{Row, Tabular};

/// The ordered columns, in the left namespace, used to align rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinKeySet {
    columns: Vec<String>,
}

impl JoinKeySet {
    /// Creates a key set from column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an empty key set, which falls back to the first common column.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Returns the declared key columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if no key column was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolves the key columns against both schemas.
    ///
    /// An empty key set picks the first left column also present on the
    /// right. Every key must exist on both sides and appear only once.
    pub fn resolve(&self, left: &impl Tabular, right: &impl Tabular) -> Result<ResolvedKeys> {
        let columns = if self.columns.is_empty() {
            let fallback = left
                .columns()
                .iter()
                .find(|c| right.has_column(c))
                .ok_or(CompareError::NoCommonColumn)?;
            debug!(column = %fallback, "No join keys given, using first common column");
            vec![fallback.clone()]
        } else {
            let mut seen = HashSet::with_capacity(self.columns.len());
            for column in &self.columns {
                if !seen.insert(column.as_str()) {
                    return Err(CompareError::SchemaMismatch {
                        side: None,
                        message: format!("join key '{column}' is listed more than once"),
                    });
                }
            }
            self.columns.clone()
        };

        let mut left_index = Vec::with_capacity(columns.len());
        let mut right_index = Vec::with_capacity(columns.len());
        for column in &columns {
            left_index.push(
                left.column_index(column)
                    .ok_or_else(|| CompareError::missing_column(Side::Left, column))?,
            );
            right_index.push(
                right
                    .column_index(column)
                    .ok_or_else(|| CompareError::missing_column(Side::Right, column))?,
            );
        }

        Ok(ResolvedKeys {
            columns,
            left_index,
            right_index,
        })
    }
}

/// Key columns resolved to positions in both schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeys {
    columns: Vec<String>,
    left_index: Vec<usize>,
    right_index: Vec<usize>,
}

impl ResolvedKeys {
    /// Key column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if `column` is one of the keys.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Key column positions in the left schema.
    #[must_use]
    pub fn left_index(&self) -> &[usize] {
        &self.left_index
    }

    /// Key column positions in the right schema.
    #[must_use]
    pub fn right_index(&self) -> &[usize] {
        &self.right_index
    }
}

/// One output row of the outer join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignedRow<'a> {
    /// Both sides share the key.
    Matched {
        /// Row from the left result.
        left: &'a Row,
        /// Row from the right result.
        right: &'a Row,
    },
    /// The key exists only on the left.
    LeftOnly(&'a Row),
    /// The key exists only on the right.
    RightOnly(&'a Row),
}

/// The complete outer join of two results.
///
/// Every input row appears in at least one aligned row; a left row paired
/// with `k` right rows appears in `k` matched rows.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    keys: ResolvedKeys,
    rows: Vec<AlignedRow<'a>>,
}

impl<'a> Alignment<'a> {
    /// The resolved key columns.
    #[must_use]
    pub const fn keys(&self) -> &ResolvedKeys {
        &self.keys
    }

    /// All aligned rows in join order.
    #[must_use]
    pub fn rows(&self) -> &[AlignedRow<'a>] {
        &self.rows
    }

    /// Matched `(left, right)` pairs in join order.
    pub fn matched(&self) -> impl Iterator<Item = (&'a Row, &'a Row)> + '_ {
        self.rows.iter().filter_map(|row| match row {
            AlignedRow::Matched { left, right } => Some((*left, *right)),
            _ => None,
        })
    }

    /// Rows only present on the left, in left input order.
    pub fn left_only(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.rows.iter().filter_map(|row| match row {
            AlignedRow::LeftOnly(left) => Some(*left),
            _ => None,
        })
    }

    /// Rows only present on the right, in right input order.
    pub fn right_only(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.rows.iter().filter_map(|row| match row {
            AlignedRow::RightOnly(right) => Some(*right),
            _ => None,
        })
    }
}

/// Canonical key tuple of a row, or `None` if any key value is NULL.
fn key_of(row: &Row, index: &[usize]) -> Option<Vec<String>> {
    index.iter().map(|&i| row[i].canonical()).collect()
}

/// Outer-joins `left` and `right` on `keys`.
///
/// Fails with [`CompareError::SchemaMismatch`] before touching any row if a
/// key column is missing.
pub fn align<'a, L, R>(left: &'a L, right: &'a R, keys: &JoinKeySet) -> Result<Alignment<'a>>
where
    L: Tabular,
    R: Tabular,
{
    let keys = keys.resolve(left, right)?;
    let right_rows = right.rows();

    let mut groups: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for (position, row) in right_rows.iter().enumerate() {
        if let Some(key) = key_of(row, &keys.right_index) {
            groups.entry(key).or_default().push(position);
        }
    }

    let mut paired = vec![false; right_rows.len()];
    let mut rows = Vec::with_capacity(left.rows().len() + right_rows.len());

    for left_row in left.rows() {
        let partners = key_of(left_row, &keys.left_index).and_then(|key| groups.get(&key));
        match partners {
            Some(partners) => {
                for &position in partners {
                    paired[position] = true;
                    rows.push(AlignedRow::Matched {
                        left: left_row,
                        right: &right_rows[position],
                    });
                }
            }
            None => rows.push(AlignedRow::LeftOnly(left_row)),
        }
    }

    rows.extend(
        right_rows
            .iter()
            .zip(&paired)
            .filter(|(_, paired)| !**paired)
            .map(|(row, _)| AlignedRow::RightOnly(row)),
    );

    debug!(
        keys = ?keys.columns,
        aligned = rows.len(),
        "Aligned query results"
    );

    Ok(Alignment { keys, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TabularResult;
    use crate::value::Value;

    fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> TabularResult {
        TabularResult::from_parts(columns, rows).unwrap()
    }

    #[test]
    fn test_resolve_fallback_to_first_common_column() {
        let left = table(&["name", "id", "email"], Vec::new());
        let right = table(&["email", "id"], Vec::new());
        let keys = JoinKeySet::empty().resolve(&left, &right).unwrap();
        // Left declaration order decides: "id" precedes "email".
        assert_eq!(keys.columns(), ["id"]);
        assert_eq!(keys.left_index(), [1]);
        assert_eq!(keys.right_index(), [1]);
    }

    #[test]
    fn test_resolve_no_common_column() {
        let left = table(&["a"], Vec::new());
        let right = table(&["b"], Vec::new());
        let err = JoinKeySet::empty().resolve(&left, &right).unwrap_err();
        assert!(matches!(err, CompareError::NoCommonColumn));
    }

    #[test]
    fn test_resolve_missing_key() {
        let left = table(&["id"], Vec::new());
        let right = table(&["uid"], Vec::new());
        let err = JoinKeySet::new(["id"]).resolve(&left, &right).unwrap_err();
        assert!(matches!(
            err,
            CompareError::SchemaMismatch {
                side: Some(Side::Right),
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_duplicate_key() {
        let left = table(&["id"], Vec::new());
        let err = JoinKeySet::new(["id", "id"]).resolve(&left, &left).unwrap_err();
        assert!(matches!(err, CompareError::SchemaMismatch { side: None, .. }));
    }

    #[test]
    fn test_outer_join_categories() {
        let left = table(
            &["id"],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        );
        let right = table(
            &["id"],
            vec![vec![Value::Int(2)], vec![Value::Int(3)]],
        );
        let alignment = align(&left, &right, &JoinKeySet::new(["id"])).unwrap();
        assert_eq!(alignment.matched().count(), 1);
        assert_eq!(alignment.left_only().collect::<Vec<_>>(), [&vec![Value::Int(1)]]);
        assert_eq!(alignment.right_only().collect::<Vec<_>>(), [&vec![Value::Int(3)]]);
    }

    #[test]
    fn test_duplicate_keys_fan_out() {
        let left = table(
            &["k", "v"],
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(1), Value::from("b")],
            ],
        );
        let right = table(
            &["k", "v"],
            vec![
                vec![Value::Int(1), Value::from("x")],
                vec![Value::Int(1), Value::from("y")],
                vec![Value::Int(1), Value::from("z")],
            ],
        );
        let alignment = align(&left, &right, &JoinKeySet::new(["k"])).unwrap();
        assert_eq!(alignment.matched().count(), 6);
        assert_eq!(alignment.left_only().count(), 0);
        assert_eq!(alignment.right_only().count(), 0);

        let pairs: Vec<(String, String)> = alignment
            .matched()
            .map(|(l, r)| (l[1].to_string(), r[1].to_string()))
            .collect();
        assert_eq!(pairs[0], ("a".to_string(), "x".to_string()));
        assert_eq!(pairs[5], ("b".to_string(), "z".to_string()));
    }

    #[test]
    fn test_null_keys_never_match() {
        let left = table(&["id"], vec![vec![Value::Null]]);
        let right = table(&["id"], vec![vec![Value::Null]]);
        let alignment = align(&left, &right, &JoinKeySet::new(["id"])).unwrap();
        assert_eq!(alignment.matched().count(), 0);
        assert_eq!(alignment.left_only().count(), 1);
        assert_eq!(alignment.right_only().count(), 1);
    }

    #[test]
    fn test_composite_key_with_numeric_normalization() {
        let left = table(
            &["a", "b"],
            vec![vec![Value::Int(1), Value::from("x")]],
        );
        let right = table(
            &["a", "b"],
            vec![
                vec![Value::Float(1.0), Value::from("x")],
                vec![Value::Int(1), Value::from("y")],
            ],
        );
        let alignment = align(&left, &right, &JoinKeySet::new(["a", "b"])).unwrap();
        assert_eq!(alignment.matched().count(), 1);
        assert_eq!(alignment.right_only().count(), 1);
    }

    #[test]
    fn test_right_only_after_left_rows() {
        let left = table(&["id"], vec![vec![Value::Int(5)]]);
        let right = table(&["id"], vec![vec![Value::Int(9)], vec![Value::Int(5)]]);
        let alignment = align(&left, &right, &JoinKeySet::new(["id"])).unwrap();
        assert!(matches!(alignment.rows()[0], AlignedRow::Matched { .. }));
        assert!(matches!(alignment.rows()[1], AlignedRow::RightOnly(_)));
    }
}
