use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Format used to embed run timestamps in file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Parses a timestamp string into a naive datetime.
/// Supports various formats: ISO 8601, SQL datetime, date only, etc.
/// Values carrying an offset are normalized to UTC.
pub fn parse_timestamp(timestamp_str: &str) -> Option<NaiveDateTime> {
    let timestamp_str = timestamp_str.trim();
    if timestamp_str.is_empty() {
        return None;
    }

    // ISO 8601 with timezone (e.g., "2025-12-16T10:30:00Z" or "2025-12-16T10:30:00+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp_str) {
        return Some(dt.naive_utc());
    }

    // PostgreSQL text output for timestamptz (e.g., "2025-12-16 10:30:00+00")
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(timestamp_str, format) {
            return Some(dt.naive_utc());
        }
    }

    // ISO 8601 without timezone, with or without fractional seconds
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(timestamp_str, format) {
            return Some(naive_dt);
        }
    }

    // Date only (e.g., "2025-12-16") - treat as midnight
    NaiveDate::parse_from_str(timestamp_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Builds `<dir>/<stem>_<YYYYMMDD_HHMMSS>.<ext>`.
/// If that file already exists, `_1`, `_2`, ... is appended to the name.
pub fn timestamped_path(dir: &Path, stem: &str, ext: &str, now: NaiveDateTime) -> PathBuf {
    let base = format!("{}_{}", stem, now.format(FILE_TIMESTAMP_FORMAT));
    let mut candidate = dir.join(format!("{}.{}", base, ext));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}.{}", base, suffix, ext));
        suffix += 1;
    }
    candidate
}

/// Counts whitespace-delimited tokens; absent text counts as zero.
pub fn word_count(text: Option<&str>) -> usize {
    text.map_or(0, |t| t.split_whitespace().count())
}

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
