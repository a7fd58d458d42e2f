//! Per-record derivation of response time, word count and sentiment.

use crate::domain::{columns, RawDataset, RawRecord, Sentiment, TransformedRecord};
use crate::error::{EtlError, Result};
use crate::metrics::{self, MetricsSummary};
use crate::utils::{parse_timestamp, word_count};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Transformed records together with the summary computed over them.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub records: Vec<TransformedRecord>,
    pub metrics: MetricsSummary,
}

/// Positions of the columns the transform reads.
struct ColumnMap {
    review_id: usize,
    content: usize,
    reply_content: usize,
    posted_at: usize,
    replied_at: usize,
    polarity: usize,
    text_final: usize,
}

impl ColumnMap {
    fn resolve(dataset: &RawDataset) -> Result<Self> {
        let missing: Vec<&str> = columns::REQUIRED
            .iter()
            .copied()
            .filter(|name| dataset.column_index(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(EtlError::data(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // All present, checked above
        let idx = |name: &str| dataset.column_index(name).unwrap_or_default();
        Ok(Self {
            review_id: idx(columns::REVIEW_ID),
            content: idx(columns::CONTENT),
            reply_content: idx(columns::REPLY_CONTENT),
            posted_at: idx(columns::POSTED_AT),
            replied_at: idx(columns::REPLIED_AT),
            polarity: idx(columns::POLARITY),
            text_final: idx(columns::TEXT_FINAL),
        })
    }
}

/// Transforms every row of the dataset and computes the metrics summary.
pub fn transform_dataset(dataset: &RawDataset) -> Result<TransformOutput> {
    if dataset.is_empty() {
        return Err(EtlError::data("dataset is empty, nothing to analyse"));
    }

    let map = ColumnMap::resolve(dataset)?;
    debug!(columns = dataset.columns.len(), "resolved source columns");

    let records = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row, raw)| transform_record(&map, row + 1, raw))
        .collect::<Result<Vec<_>>>()?;

    for record in records.iter().filter(|r| r.has_negative_response_time()) {
        warn!(
            review_id = record.review_id.as_deref().unwrap_or("<none>"),
            minutes = record.response_time_minutes,
            "reply recorded before post, excluded from average response time"
        );
    }

    let metrics = metrics::compute(&records)?;
    Ok(TransformOutput { records, metrics })
}

fn transform_record(map: &ColumnMap, row: usize, raw: &RawRecord) -> Result<TransformedRecord> {
    let posted_at = timestamp_field(raw, map.posted_at, columns::POSTED_AT, row)?;
    let replied_at = timestamp_field(raw, map.replied_at, columns::REPLIED_AT, row)?;

    Ok(TransformedRecord {
        review_id: raw.get(map.review_id).map(str::to_string),
        content: raw.get(map.content).map(str::to_string),
        reply_content: raw.get(map.reply_content).map(str::to_string),
        posted_at,
        replied_at,
        response_time_minutes: elapsed_minutes(posted_at, replied_at),
        word_count: word_count(raw.get(map.text_final)),
        sentiment: Sentiment::from_polarity(raw.get(map.polarity)),
        raw: raw.clone(),
    })
}

fn timestamp_field(
    raw: &RawRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<Option<NaiveDateTime>> {
    match raw.get(index) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_timestamp(value).map(Some).ok_or_else(|| {
            EtlError::data(format!(
                "row {}: malformed timestamp '{}' in column '{}'",
                row, value, column
            ))
        }),
    }
}

/// Minutes from post to reply, negative when the reply predates the post.
pub fn elapsed_minutes(
    posted_at: Option<NaiveDateTime>,
    replied_at: Option<NaiveDateTime>,
) -> Option<f64> {
    let (posted, replied) = (posted_at?, replied_at?);
    let elapsed = replied.signed_duration_since(posted);
    // Microsecond precision; falls back to milliseconds past ~292k years
    let minutes = match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 60_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 60_000.0,
    };
    Some(minutes)
}
