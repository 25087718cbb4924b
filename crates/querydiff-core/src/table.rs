//! Materialized query results.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::error::{CompareError, Result};
use crate::value::Value;

/// A row of values, positionally aligned with its schema.
pub type Row = Vec<Value>;

/// Read access shared by query results and their renamed views.
pub trait Tabular {
    /// Column names in declaration order.
    fn columns(&self) -> &[String];

    /// Rows, each holding one value per column.
    fn rows(&self) -> &[Row];

    /// Returns the position of a column, if present.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| c == name)
    }

    /// Returns `true` if the schema has a column with this name.
    fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Pairs a row with the column names of this schema.
    fn record(&self, row: &Row) -> Record {
        Record::new(self.columns().iter().cloned().zip(row.iter().cloned()).collect())
    }
}

/// The result of executing one query: a schema plus its rows.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TabularResult {
    /// Creates a result, checking that column names are unique and that
    /// every row carries exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CompareError::DuplicateColumn(column.clone()));
            }
        }

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(CompareError::RaggedRow {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    /// Convenience constructor from borrowed column names.
    pub fn from_parts(columns: &[&str], rows: Vec<Row>) -> Result<Self> {
        Self::new(columns.iter().map(|c| (*c).to_string()).collect(), rows)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the result has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Tabular for TabularResult {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Ordered column/value pairs. Serializes as a JSON object that keeps the
/// column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    /// Creates a record from ordered pairs.
    #[must_use]
    pub const fn new(fields: Vec<(String, Value)>) -> Self {
        Self(fields)
    }

    /// Appends a field.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.0.push((column.into(), value));
    }

    /// Looks up a field by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Iterates over the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, v)| (c, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_well_formed() {
        let result = TabularResult::from_parts(
            &["id", "name"],
            vec![vec![Value::Int(1), Value::from("a")]],
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.column_index("name"), Some(1));
        assert!(!result.has_column("email"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = TabularResult::from_parts(&["id", "id"], Vec::new()).unwrap_err();
        assert!(matches!(err, CompareError::DuplicateColumn(c) if c == "id"));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = TabularResult::from_parts(
            &["id", "name"],
            vec![vec![Value::Int(1), Value::Null], vec![Value::Int(2)]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompareError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_record_keeps_column_order() {
        let result = TabularResult::from_parts(
            &["z", "a", "m"],
            vec![vec![Value::Int(1), Value::Int(2), Value::Null]],
        )
        .unwrap();
        let record = result.record(&result.rows()[0]);
        assert_eq!(record.get("a"), Some(&Value::Int(2)));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"z":1,"a":2,"m":null}"#
        );
    }
}
