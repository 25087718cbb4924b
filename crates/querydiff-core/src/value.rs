//! Scalar values carried by query results.
//!
//! Database drivers hand back loosely typed cells. They are normalized into
//! the closed [`Value`] set so that comparison and serialization stay
//! exhaustive.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// Byte blobs at or above this size are replaced by a placeholder when
/// serialized.
pub const BINARY_PREVIEW_LIMIT: usize = 1000;

/// Placeholder emitted for oversized byte blobs.
pub const BINARY_PLACEHOLDER: &str = "[BINARY DATA]";

/// Largest magnitude for which every integral `f64` is exactly representable.
const EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// A single cell of a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
    /// Binary blob value.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns `true` for SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a short name of the variant, used in log output.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Returns the canonical textual form used for equality checks.
    ///
    /// `None` marks the absence of a value (SQL NULL); it never equals the
    /// text `"null"`. Integral floats render like integers, so `Int(3)` and
    /// `Float(3.0)` share a canonical form.
    #[must_use]
    pub fn canonical(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(canonical_float(*f)),
            Self::Text(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(format_timestamp(ts, ' ')),
            Self::Bytes(b) => Some(to_hex(b)),
        }
    }

    /// Compares two values under canonical string equality.
    #[must_use]
    pub fn canonical_eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn canonical_float(f: f64) -> String {
    if f.is_nan() {
        return String::from("NaN");
    }
    if f.is_infinite() {
        return if f > 0.0 {
            String::from("inf")
        } else {
            String::from("-inf")
        };
    }
    if f.fract() == 0.0 && f.abs() < EXACT_FLOAT_INT {
        // Exact: the magnitude check keeps the value inside i64 range.
        return (f as i64).to_string();
    }
    format!("{f}")
}

/// Formats a timestamp as `date<sep>time`, appending microseconds only when
/// the sub-second part is non-zero.
pub(crate) fn format_timestamp(ts: &NaiveDateTime, sep: char) -> String {
    let base = ts.format(&format!("%Y-%m-%d{sep}%H:%M:%S")).to_string();
    let micros = ts.nanosecond() / 1_000;
    if micros == 0 {
        base
    } else {
        format!("{base}.{micros:06}")
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Self::Float(_) => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts, 'T')),
            Self::Bytes(b) if b.len() < BINARY_PREVIEW_LIMIT => serializer.serialize_str(&to_hex(b)),
            Self::Bytes(_) => serializer.serialize_str(BINARY_PLACEHOLDER),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
