#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use querydiff_core::{compare, ColumnMapping, ComparisonReport, JoinKeySet, TabularResult, Value};

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> TabularResult {
    TabularResult::from_parts(columns, rows)
        .unwrap_or_else(|e| panic!("Failed to build result {columns:?}: {e}"))
}

pub fn mapping() -> ColumnMapping {
    ColumnMapping::new([("id", "user_id")]).unwrap()
}

/// Two users on the left, three on the right: one clean match, one
/// mismatch on `name`, one row only in query2.
pub fn sample_report() -> ComparisonReport {
    let left = table(
        &["id", "name"],
        vec![
            vec![Value::Int(1), Value::from("A")],
            vec![Value::Int(2), Value::from("B")],
        ],
    );
    let right = table(
        &["user_id", "name"],
        vec![
            vec![Value::Int(1), Value::from("A")],
            vec![Value::Int(2), Value::from("C")],
            vec![Value::Int(3), Value::from("D")],
        ],
    );
    compare(&left, &right, &mapping(), &JoinKeySet::new(["id"])).unwrap()
}

/// `count` rows whose `name` differs on every row.
pub fn mismatching_report(count: i64) -> ComparisonReport {
    let rows = |suffix: &str| {
        (0..count)
            .map(|i| vec![Value::Int(i), Value::from(format!("n{i}{suffix}"))])
            .collect()
    };
    let left = table(&["id", "name"], rows("a"));
    let right = table(&["id", "name"], rows("b"));
    compare(&left, &right, &ColumnMapping::identity(), &JoinKeySet::new(["id"])).unwrap()
}

pub fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap()
}
