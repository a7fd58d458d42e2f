//! Aggregate metrics over the transformed set.

use crate::domain::{Sentiment, TransformedRecord};
use crate::error::{EtlError, Result};

/// Summary computed once per run over all transformed records.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub total_reviews: usize,
    pub positive_reviews: usize,
    pub negative_reviews: usize,
    /// Mean over defined, non-negative response times; `None` if there are none
    pub avg_response_time: Option<f64>,
    pub avg_word_count: f64,
    /// Percentage of records with non-empty reply content
    pub response_rate: f64,
    /// Records whose reply predates the post
    pub negative_response_times: usize,
}

/// A metric value, typed by how the report renders it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(usize),
    /// Rounded to two decimals in the report; absent when undefined
    Mean(Option<f64>),
    Percentage(f64),
}

impl MetricsSummary {
    /// The report rows, in fixed order.
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("total_reviews", MetricValue::Count(self.total_reviews)),
            ("positive_reviews", MetricValue::Count(self.positive_reviews)),
            ("negative_reviews", MetricValue::Count(self.negative_reviews)),
            ("avg_response_time", MetricValue::Mean(self.avg_response_time)),
            ("avg_word_count", MetricValue::Mean(Some(self.avg_word_count))),
            ("response_rate", MetricValue::Percentage(self.response_rate)),
        ]
    }
}

#[derive(Default)]
struct Accumulator {
    total: usize,
    positive: usize,
    negative: usize,
    replies: usize,
    response_sum: f64,
    response_count: usize,
    negative_responses: usize,
    words: usize,
}

/// Computes the summary in a single pass. An empty set has no defined mean.
pub fn compute(records: &[TransformedRecord]) -> Result<MetricsSummary> {
    if records.is_empty() {
        return Err(EtlError::data("cannot compute metrics over zero records"));
    }

    let mut acc = Accumulator::default();
    for record in records {
        acc.total += 1;
        acc.words += record.word_count;
        match record.sentiment {
            Sentiment::Positive => acc.positive += 1,
            Sentiment::Negative => acc.negative += 1,
            Sentiment::Unknown => {}
        }
        if record.has_reply() {
            acc.replies += 1;
        }
        match record.response_time_minutes {
            Some(minutes) if minutes < 0.0 => acc.negative_responses += 1,
            Some(minutes) if minutes.is_finite() => {
                acc.response_sum += minutes;
                acc.response_count += 1;
            }
            _ => {}
        }
    }

    let avg_response_time =
        (acc.response_count > 0).then(|| acc.response_sum / acc.response_count as f64);

    Ok(MetricsSummary {
        total_reviews: acc.total,
        positive_reviews: acc.positive,
        negative_reviews: acc.negative,
        avg_response_time,
        avg_word_count: acc.words as f64 / acc.total as f64,
        response_rate: (acc.replies * 100) as f64 / acc.total as f64,
        negative_response_times: acc.negative_responses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;
    use pretty_assertions::assert_eq;

    fn record(minutes: Option<f64>, words: usize, reply: Option<&str>, sentiment: Sentiment) -> TransformedRecord {
        TransformedRecord {
            review_id: None,
            content: None,
            reply_content: reply.map(str::to_string),
            posted_at: None,
            replied_at: None,
            response_time_minutes: minutes,
            word_count: words,
            sentiment,
            raw: RawRecord::new(Vec::new()),
        }
    }

    #[test]
    fn test_mean_response_time() {
        let records = vec![
            record(Some(10.0), 1, None, Sentiment::Unknown),
            record(Some(20.0), 2, None, Sentiment::Unknown),
            record(Some(30.0), 3, None, Sentiment::Unknown),
        ];
        let summary = compute(&records).unwrap();
        assert_eq!(summary.avg_response_time, Some(20.0));
        assert_eq!(summary.avg_word_count, 2.0);
    }

    #[test]
    fn test_mean_ignores_missing_values() {
        let records = vec![
            record(Some(10.0), 0, None, Sentiment::Unknown),
            record(None, 0, None, Sentiment::Unknown),
        ];
        assert_eq!(compute(&records).unwrap().avg_response_time, Some(10.0));

        let records = vec![record(None, 0, None, Sentiment::Unknown)];
        assert_eq!(compute(&records).unwrap().avg_response_time, None);
    }

    #[test]
    fn test_reply_rate() {
        let records: Vec<_> = (0..10)
            .map(|i| {
                let reply = if i < 7 { Some("thanks") } else { None };
                record(None, 0, reply, Sentiment::Unknown)
            })
            .collect();
        assert_eq!(compute(&records).unwrap().response_rate, 70.0);
    }

    #[test]
    fn test_reply_rate_counts_whitespace_reply() {
        let records = vec![
            record(None, 0, Some("   "), Sentiment::Unknown),
            record(None, 0, None, Sentiment::Unknown),
        ];
        assert_eq!(compute(&records).unwrap().response_rate, 50.0);
    }

    #[test]
    fn test_sentiment_counts() {
        let records = vec![
            record(None, 0, None, Sentiment::Positive),
            record(None, 0, None, Sentiment::Positive),
            record(None, 0, None, Sentiment::Negative),
            record(None, 0, None, Sentiment::Unknown),
        ];
        let summary = compute(&records).unwrap();
        assert_eq!(summary.total_reviews, 4);
        assert_eq!(summary.positive_reviews, 2);
        assert_eq!(summary.negative_reviews, 1);
    }

    #[test]
    fn test_negative_response_times_flagged_not_averaged() {
        let records = vec![
            record(Some(-5.0), 0, None, Sentiment::Unknown),
            record(Some(15.0), 0, None, Sentiment::Unknown),
        ];
        let summary = compute(&records).unwrap();
        assert_eq!(summary.negative_response_times, 1);
        assert_eq!(summary.avg_response_time, Some(15.0));
    }

    #[test]
    fn test_empty_set_is_error() {
        assert!(matches!(compute(&[]), Err(EtlError::Data(_))));
    }

    #[test]
    fn test_entries_order_and_types() {
        let summary = MetricsSummary {
            total_reviews: 3,
            positive_reviews: 1,
            negative_reviews: 1,
            avg_response_time: Some(12.345),
            avg_word_count: 4.0,
            response_rate: 66.66666666666667,
            negative_response_times: 0,
        };
        let names: Vec<_> = summary.entries().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "total_reviews",
                "positive_reviews",
                "negative_reviews",
                "avg_response_time",
                "avg_word_count",
                "response_rate",
            ]
        );
        assert_eq!(summary.entries()[0].1, MetricValue::Count(3));
        assert_eq!(summary.entries()[5].1, MetricValue::Percentage(66.66666666666667));
    }
}
