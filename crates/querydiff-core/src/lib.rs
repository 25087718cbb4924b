//! # querydiff-core
//!
//! Row-level comparison of two SQL query results.
//!
//! Given two materialized results, a column mapping and a set of join keys,
//! the pipeline:
//!
//! - **Maps** the second result's columns into the first result's names
//! - **Aligns** rows with a full outer join on the key columns
//! - **Diffs** every matched pair over the shared non-key columns
//! - **Reports** counts, bounded previews and column metadata
//!
//! Values are compared on their canonical string form, so an integer and an
//! integral float holding the same number are equal while a text `"3.0"`
//! and an integer `3` are not.
//!
//! ## Example
//!
//! ```rust
//! use querydiff_core::prelude::*;
//!
//! let left = TabularResult::from_parts(
//!     &["id", "name"],
//!     vec![
//!         vec![Value::Int(1), Value::from("A")],
//!         vec![Value::Int(2), Value::from("B")],
//!     ],
//! )?;
//! let right = TabularResult::from_parts(
//!     &["user_id", "name"],
//!     vec![
//!         vec![Value::Int(1), Value::from("A")],
//!         vec![Value::Int(2), Value::from("C")],
//!         vec![Value::Int(3), Value::from("D")],
//!     ],
//! )?;
//!
//! let mapping = ColumnMapping::new([("id", "user_id")])?;
//! let report = compare(&left, &right, &mapping, &JoinKeySet::new(["id"]))?;
//!
//! assert_eq!(report.summary.matches, 1);
//! assert_eq!(report.summary.mismatches, 1);
//! assert_eq!(report.summary.only_in_query2, 1);
//! # Ok::<(), querydiff_core::CompareError>(())
//! ```
//!
//! The whole pipeline is synchronous and holds no shared state, so
//! independent comparisons may run concurrently. Inputs are held in memory
//! for the duration of one comparison.

pub mod align;
pub mod compare;
pub mod diff;
pub mod error;
pub mod mapping;
pub mod report;
pub mod source;
pub mod table;
pub mod value;

pub use align::{align, AlignedRow, Alignment, JoinKeySet};
pub use compare::{compare, compare_with, CompareOptions};
pub use error::{CompareError, Result, Side};
pub use mapping::{ColumnMapping, MappedResult};
pub use report::{ComparisonReport, Summary};
pub use source::{compare_queries, QuerySource};
pub use table::{Record, Row, Tabular, TabularResult};
pub use value::Value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::align::{AlignedRow, Alignment, JoinKeySet};
    pub use crate::compare::{compare, compare_with, CompareOptions};
    pub use crate::diff::{MismatchRecord, ValueDiff};
    pub use crate::error::{CompareError, Result};
    pub use crate::mapping::ColumnMapping;
    pub use crate::report::{ColumnsInfo, ComparisonReport, Summary};
    pub use crate::source::{compare_queries, QuerySource};
    pub use crate::table::{Record, Row, Tabular, TabularResult};
    pub use crate::value::Value;
}
