//! The seam to whatever executes the queries.
//!
//! The core never opens connections. A [`QuerySource`] hands it fully
//! materialized results; its failures are wrapped, not interpreted.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

use crate::align::JoinKeySet;
use crate::compare::{compare_since, CompareOptions};
use crate::error::{CompareError, Result};
use crate::mapping::ColumnMapping;
use crate::report::ComparisonReport;
use crate::table::TabularResult;

/// Executes a read-only query and materializes its result.
pub trait QuerySource {
    /// Error produced by the execution provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs `sql` and returns every row.
    fn fetch(
        &self,
        sql: &str,
    ) -> impl Future<Output = std::result::Result<TabularResult, Self::Error>> + Send;
}

fn upstream<E: std::error::Error + Send + Sync + 'static>(err: E) -> CompareError {
    CompareError::Upstream(Box::new(err))
}

/// Runs both queries against `source`, then compares their results.
///
/// The reported execution time covers query execution as well. Source
/// errors are returned as [`CompareError::Upstream`] and never retried.
pub async fn compare_queries<S: QuerySource + Sync>(
    source: &S,
    query1: &str,
    query2: &str,
    mapping: &ColumnMapping,
    keys: &JoinKeySet,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    let started = Instant::now();

    let left = source.fetch(query1).await.map_err(upstream)?;
    debug!(rows = left.len(), "Fetched query1");
    let right = source.fetch(query2).await.map_err(upstream)?;
    debug!(rows = right.len(), "Fetched query2");

    compare_since(started, &left, &right, mapping, keys, options)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::value::Value;

    #[derive(Debug, thiserror::Error)]
    #[error("unknown query: {0}")]
    struct UnknownQuery(String);

    struct FixedSource(HashMap<&'static str, TabularResult>);

    impl QuerySource for FixedSource {
        type Error = UnknownQuery;

        async fn fetch(&self, sql: &str) -> std::result::Result<TabularResult, UnknownQuery> {
            self.0
                .get(sql)
                .cloned()
                .ok_or_else(|| UnknownQuery(sql.to_string()))
        }
    }

    fn source() -> FixedSource {
        let a = TabularResult::from_parts(&["id"], vec![vec![Value::Int(1)]]).unwrap();
        let b = TabularResult::from_parts(&["id"], vec![vec![Value::Int(1)], vec![Value::Int(2)]])
            .unwrap();
        FixedSource(HashMap::from([("a", a), ("b", b)]))
    }

    #[tokio::test]
    async fn test_compare_queries() {
        let report = compare_queries(
            &source(),
            "a",
            "b",
            &ColumnMapping::identity(),
            &JoinKeySet::empty(),
            &CompareOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(report.summary.matches, 1);
        assert_eq!(report.summary.only_in_query2, 1);
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through() {
        let err = compare_queries(
            &source(),
            "a",
            "missing",
            &ColumnMapping::identity(),
            &JoinKeySet::empty(),
            &CompareOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CompareError::Upstream(_)));
        assert_eq!(err.to_string(), "Query execution failed: unknown query: missing");
    }
}
