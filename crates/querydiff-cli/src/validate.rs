//! Read-only query checks and select-list inspection.
//!
//! Only single `SELECT` statements are executed. Leading comments and
//! whitespace are ignored when looking for the first keyword.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CliError, Result};

/// Maximum number of columns reported by [`extract_columns`].
pub const MAX_EXTRACTED_COLUMNS: usize = 20;

static LEADING_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s+|--[^\n]*|/\*(?s:.*?)\*/)*").expect("Invalid leading noise regex")
});

static FIRST_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]+").expect("Invalid first word regex"));

static LITERALS_AND_COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)'(?:[^']|'')*'|"(?:[^"]|"")*"|--[^\n]*|/\*.*?\*/"#)
        .expect("Invalid literal regex")
});

static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)--[^\n]*|/\*.*?\*/").expect("Invalid comment regex")
});

static SELECT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^select\s+(?:distinct\s+|all\s+)?(.*?)(?:\bfrom\b|\bwhere\b|\bgroup\s+by\b|\border\s+by\b|\blimit\b|;|\z)",
    )
    .expect("Invalid select list regex")
});

static EXPLICIT_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)^(.+?)\s+as\s+(?:"[^"]*"|`[^`]*`|\[[^\]]*\]|\w+)$"#)
        .expect("Invalid alias regex")
});

static IMPLICIT_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([^\s()]+|[^\s()]*\([^()]*\))\s+(?:"[^"]*"|`[^`]*`|\[[^\]]*\]|\w+)$"#)
        .expect("Invalid alias regex")
});

fn strip_leading_noise(sql: &str) -> &str {
    LEADING_NOISE
        .find(sql)
        .map_or(sql, |m| &sql[m.end()..])
}

/// Checks that `sql` is a single `SELECT` statement.
pub fn validate_select(sql: &str) -> Result<()> {
    let body = strip_leading_noise(sql);
    if body.trim().is_empty() {
        return Err(CliError::InvalidQuery("Empty query".to_string()));
    }

    let is_select = FIRST_WORD
        .find(body)
        .is_some_and(|word| word.as_str().eq_ignore_ascii_case("select"));
    if !is_select {
        return Err(CliError::InvalidQuery(
            "Only SELECT queries are supported".to_string(),
        ));
    }

    let code = LITERALS_AND_COMMENTS.replace_all(body, " ");
    let code = code.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if code.contains(';') {
        return Err(CliError::InvalidQuery(
            "Only a single statement is supported".to_string(),
        ));
    }

    Ok(())
}

/// Lists the expressions of the select list, aliases removed.
///
/// `*` entries are skipped and at most [`MAX_EXTRACTED_COLUMNS`] names are
/// returned. Anything that is not a `SELECT` yields an empty list.
#[must_use]
pub fn extract_columns(sql: &str) -> Vec<String> {
    let code = COMMENTS.replace_all(sql, " ");
    let code = code.trim_start();
    let Some(list) = SELECT_LIST.captures(code).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    split_top_level(list.as_str())
        .into_iter()
        .map(|item| strip_alias(item.trim()).to_string())
        .filter(|column| !column.is_empty() && column != "*")
        .take(MAX_EXTRACTED_COLUMNS)
        .collect()
}

fn strip_alias(expr: &str) -> &str {
    EXPLICIT_ALIAS
        .captures(expr)
        .or_else(|| IMPLICIT_ALIAS.captures(expr))
        .and_then(|c| c.get(1))
        .map_or(expr, |m| m.as_str().trim())
}

/// Splits on commas outside parentheses and quotes.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}
