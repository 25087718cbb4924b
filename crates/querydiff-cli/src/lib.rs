//! # querydiff-cli
//!
//! Support library of the `querydiff` binary: the SQLite execution
//! provider, the read-only query validator and the subcommand helpers.

pub mod commands;
pub mod error;
pub mod source;
pub mod validate;

pub use error::{CliError, Result};
pub use source::{RowLimit, SqliteSource};
pub use validate::{extract_columns, validate_select};
