//! Wall-clock timestamps in the textual format stored in status records.

use chrono::{DateTime, Utc};

/// Format used for every timestamp written to the log store,
/// e.g. `2024-03-01T12:30:05.123456Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Current UTC time, formatted for storage.
pub fn utc_now() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
