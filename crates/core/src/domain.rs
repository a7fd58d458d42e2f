use chrono::NaiveDateTime;

/// Column names of the `sentiment` source table the transform depends on.
pub mod columns {
    pub const REVIEW_ID: &str = "reviewid";
    pub const CONTENT: &str = "content";
    pub const REPLY_CONTENT: &str = "replycontent";
    pub const POSTED_AT: &str = "at";
    pub const REPLIED_AT: &str = "repliedat";
    pub const POLARITY: &str = "polarity";
    pub const TEXT_FINAL: &str = "text_final";

    pub const REQUIRED: [&str; 7] = [
        REVIEW_ID,
        CONTENT,
        REPLY_CONTENT,
        POSTED_AT,
        REPLIED_AT,
        POLARITY,
        TEXT_FINAL,
    ];
}

/// One source row. `None` is a SQL NULL (or an empty field in the staging file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub values: Vec<Option<String>>,
}

impl RawRecord {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// The full result set of the extraction query, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDataset {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalized sentiment classification of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    /// Polarity missing or not one of the recognized values
    Unknown,
}

impl Sentiment {
    /// Classifies a raw polarity value. Every input maps to a variant.
    pub fn from_polarity(polarity: Option<&str>) -> Self {
        match polarity {
            Some("positive") => Sentiment::Positive,
            Some("negative") => Sentiment::Negative,
            _ => Sentiment::Unknown,
        }
    }

    /// Display label for the report; `Unknown` renders as an absent value.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Sentiment::Positive => Some("Positive"),
            Sentiment::Negative => Some("Negative"),
            Sentiment::Unknown => None,
        }
    }
}

/// A raw record augmented with the derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRecord {
    pub review_id: Option<String>,
    pub content: Option<String>,
    pub reply_content: Option<String>,
    pub posted_at: Option<NaiveDateTime>,
    pub replied_at: Option<NaiveDateTime>,
    /// Minutes between post and reply; absent when either timestamp is missing
    pub response_time_minutes: Option<f64>,
    pub word_count: usize,
    pub sentiment: Sentiment,
    pub raw: RawRecord,
}

impl TransformedRecord {
    /// A reply recorded before its post.
    pub fn has_negative_response_time(&self) -> bool {
        self.response_time_minutes.map_or(false, |m| m < 0.0)
    }

    pub fn has_reply(&self) -> bool {
        self.reply_content
            .as_deref()
            .map_or(false, |reply| !reply.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_recognized_values() {
        assert_eq!(Sentiment::from_polarity(Some("positive")), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(Some("negative")), Sentiment::Negative);
        assert_eq!(Sentiment::Positive.label(), Some("Positive"));
        assert_eq!(Sentiment::Negative.label(), Some("Negative"));
    }

    #[test]
    fn test_sentiment_other_values_are_unknown() {
        assert_eq!(Sentiment::from_polarity(Some("neutral")), Sentiment::Unknown);
        assert_eq!(Sentiment::from_polarity(Some("Positive")), Sentiment::Unknown);
        assert_eq!(Sentiment::from_polarity(None), Sentiment::Unknown);
        assert_eq!(Sentiment::Unknown.label(), None);
    }

    #[test]
    fn test_whitespace_reply_counts_as_reply() {
        let mut record = TransformedRecord {
            review_id: None,
            content: None,
            reply_content: Some("   ".to_string()),
            posted_at: None,
            replied_at: None,
            response_time_minutes: None,
            word_count: 0,
            sentiment: Sentiment::Unknown,
            raw: RawRecord::new(Vec::new()),
        };
        assert!(record.has_reply());

        record.reply_content = Some(String::new());
        assert!(!record.has_reply());
        record.reply_content = None;
        assert!(!record.has_reply());
    }

    #[test]
    fn test_column_index() {
        let dataset = RawDataset::new(
            vec!["reviewid".to_string(), "content".to_string()],
            Vec::new(),
        );
        assert_eq!(dataset.column_index("content"), Some(1));
        assert_eq!(dataset.column_index("polarity"), None);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_raw_record_get_null() {
        let record = RawRecord::new(vec![Some("a".to_string()), None]);
        assert_eq!(record.get(0), Some("a"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(5), None);
    }
}
