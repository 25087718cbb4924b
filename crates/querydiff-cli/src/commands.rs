//! Building blocks of the subcommands.

use std::fs;

use serde::Serialize;
use tracing::debug;

use querydiff_core::{ColumnMapping, Tabular, Value};

use crate::error::{CliError, Result};
use crate::source::{RowLimit, SqliteSource, PREVIEW_ROWS};

/// Reads a query argument: inline SQL, or `@path` to read it from a file.
pub fn read_query(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            debug!(path, "Reading query from file");
            Ok(fs::read_to_string(path)?)
        }
        None => Ok(arg.to_string()),
    }
}

/// Parses repeated `LEFT=RIGHT` arguments into a mapping.
pub fn parse_mapping<S: AsRef<str>>(args: &[S]) -> Result<ColumnMapping> {
    let pairs = args
        .iter()
        .map(|arg| {
            let arg = arg.as_ref();
            arg.split_once('=')
                .map(|(left, right)| (left.trim().to_string(), right.trim().to_string()))
                .ok_or_else(|| CliError::MappingArgument(arg.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ColumnMapping::new(pairs)?)
}

/// Output of the `execute` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteOutput {
    /// Result columns.
    pub columns: Vec<String>,
    /// Up to [`PREVIEW_ROWS`] rows.
    pub rows: Vec<Vec<Value>>,
    /// Number of rows returned.
    pub row_count: usize,
}

/// Runs one query and keeps the first [`PREVIEW_ROWS`] rows.
pub async fn execute(source: &SqliteSource, sql: &str) -> Result<ExecuteOutput> {
    let result = source.query(sql, RowLimit::Truncate(PREVIEW_ROWS)).await?;
    Ok(ExecuteOutput {
        columns: result.columns().to_vec(),
        rows: result.rows().to_vec(),
        row_count: result.len(),
    })
}

/// Output of the `ping` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingStatus {
    /// `success` or `error`.
    pub status: &'static str,
    /// Human-readable detail.
    pub message: String,
}

/// Tests connectivity. Failures are reported in the status, not raised.
pub async fn ping(source: &SqliteSource) -> PingStatus {
    match source.ping().await {
        Ok(()) => PingStatus {
            status: "success",
            message: "Connected successfully".to_string(),
        },
        Err(err) => PingStatus {
            status: "error",
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mapping() {
        let mapping = parse_mapping(&["id=user_id", " name = full_name "]).unwrap();
        assert_eq!(mapping.reverse_lookup("id"), Some("user_id"));
        assert_eq!(mapping.reverse_lookup("name"), Some("full_name"));
    }

    #[test]
    fn test_parse_mapping_rejects_missing_separator() {
        let err = parse_mapping(&["id"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid column mapping 'id', expected LEFT=RIGHT");
    }

    #[test]
    fn test_parse_mapping_rejects_duplicates() {
        let err = parse_mapping(&["id=a", "id=b"]).unwrap_err();
        assert!(matches!(err, CliError::Compare(_)));
    }

    #[test]
    fn test_read_query() {
        assert_eq!(read_query("SELECT 1").unwrap(), "SELECT 1");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.sql");
        std::fs::write(&path, "SELECT 2").unwrap();
        assert_eq!(read_query(&format!("@{}", path.display())).unwrap(), "SELECT 2");
        assert!(matches!(read_query("@/nonexistent/q.sql"), Err(CliError::Io(_))));
    }
}
