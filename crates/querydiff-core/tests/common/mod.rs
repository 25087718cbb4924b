#![allow(dead_code)]

use querydiff_core::{TabularResult, Value};

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> TabularResult {
    TabularResult::from_parts(columns, rows)
        .unwrap_or_else(|e| panic!("Failed to build result {columns:?}: {e}"))
}

/// Builds an `(id, name)` result.
pub fn people(rows: &[(i64, &str)]) -> TabularResult {
    table(
        &["id", "name"],
        rows.iter()
            .map(|(id, name)| vec![Value::Int(*id), Value::from(*name)])
            .collect(),
    )
}

/// Builds a single-column `id` result counting from 0.
pub fn ids(count: i64) -> TabularResult {
    table(&["id"], (0..count).map(|i| vec![Value::Int(i)]).collect())
}
