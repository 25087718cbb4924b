//! JSON rendering with a metadata envelope.

use chrono::NaiveDateTime;
use serde::Serialize;

use querydiff_core::ComparisonReport;

use crate::error::Result;

/// Version of the JSON envelope layout.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Value of the envelope `type` field.
pub const RESULT_TYPE: &str = "sql_comparison_result";

#[derive(Serialize)]
struct Metadata {
    generated_at: String,
    version: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Envelope<'a> {
    metadata: Metadata,
    data: &'a ComparisonReport,
}

/// Renders the report as `{"metadata": {..}, "data": <report>}`.
pub fn to_json(report: &ComparisonReport, generated_at: NaiveDateTime, pretty: bool) -> Result<String> {
    let envelope = Envelope {
        metadata: Metadata {
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            version: FORMAT_VERSION,
            kind: RESULT_TYPE,
        },
        data: report,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(json)
}
