//! SQLite execution provider.
//!
//! Rows are streamed from the pool and decoded into dynamically typed
//! [`Value`]s. The runtime storage class decides the variant, refined by the
//! declared column type for booleans and timestamps.

use chrono::NaiveDateTime;
use futures::TryStreamExt;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Executor, Row as _, TypeInfo, ValueRef};
use tracing::debug;

use querydiff_core::{QuerySource, Row, TabularResult, Value};

use crate::error::{CliError, Result};
use crate::validate::validate_select;

/// Default maximum number of rows a compared query may return.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// Number of rows returned by a preview execution.
pub const PREVIEW_ROWS: usize = 1000;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// What to do when a query returns more rows than allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    /// Fail with [`CliError::RowLimitExceeded`].
    Fail(usize),
    /// Keep the first rows and stop reading.
    Truncate(usize),
}

impl RowLimit {
    const fn cap(self) -> usize {
        match self {
            Self::Fail(cap) | Self::Truncate(cap) => cap,
        }
    }
}

/// Executes read-only queries against a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    pool: SqlitePool,
    max_rows: usize,
}

impl SqliteSource {
    /// Creates a source with the default row cap.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Sets the maximum number of rows a compared query may return.
    #[must_use]
    pub const fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks connectivity with `SELECT 1`.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Validates and runs `sql`, reading at most `limit` rows.
    pub async fn query(&self, sql: &str, limit: RowLimit) -> Result<TabularResult> {
        validate_select(sql)?;

        let cap = limit.cap();
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        {
            let mut stream = sqlx::query(sql).fetch(&self.pool);
            while let Some(row) = stream.try_next().await? {
                if columns.is_none() {
                    columns = Some(row.columns().iter().map(|c| c.name().to_string()).collect());
                }
                if rows.len() == cap {
                    match limit {
                        RowLimit::Fail(limit) => return Err(CliError::RowLimitExceeded { limit }),
                        RowLimit::Truncate(_) => break,
                    }
                }
                rows.push(decode_row(&row)?);
            }
        }

        let columns = match columns {
            Some(columns) => columns,
            None => self.describe_columns(sql).await?,
        };
        debug!(rows = rows.len(), columns = columns.len(), "Query executed");

        Ok(TabularResult::new(columns, rows)?)
    }

    /// Column names of a query that returned no row.
    async fn describe_columns(&self, sql: &str) -> Result<Vec<String>> {
        let described = (&self.pool).describe(sql).await?;
        Ok(described
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }
}

impl QuerySource for SqliteSource {
    type Error = CliError;

    async fn fetch(&self, sql: &str) -> Result<TabularResult> {
        self.query(sql, RowLimit::Fail(self.max_rows)).await
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len()).map(|i| decode_value(row, i)).collect()
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let storage = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };
    let declared = row.column(index).type_info().name().to_ascii_uppercase();

    let value = match storage.as_str() {
        "INTEGER" if matches!(declared.as_str(), "BOOLEAN" | "BOOL") => {
            Value::Bool(row.try_get_unchecked::<bool, _>(index)?)
        }
        "INTEGER" => Value::Int(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => {
            let text: String = row.try_get_unchecked(index)?;
            if matches!(declared.as_str(), "DATETIME" | "TIMESTAMP") {
                parse_timestamp(&text).map_or(Value::Text(text), Value::Timestamp)
            } else {
                Value::Text(text)
            }
        }
    };
    Ok(value)
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-01-02 03:04:05").unwrap();
        assert_eq!(ts.to_string(), "2024-01-02 03:04:05");
        assert!(parse_timestamp("2024-01-02T03:04:05.250").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_row_limit_cap() {
        assert_eq!(RowLimit::Fail(3).cap(), 3);
        assert_eq!(RowLimit::Truncate(7).cap(), 7);
    }
}
