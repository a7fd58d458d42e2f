//! Cell-level model of the two report sheets.
//!
//! Rendering adapters only translate these cells into their own format, so
//! rounding, ordering and column sizing live here.

use crate::domain::TransformedRecord;
use crate::metrics::{MetricValue, MetricsSummary};
use crate::utils::round2;

pub const ANALYSIS_SHEET: &str = "Sentiment Analysis";
pub const METRICS_SHEET: &str = "Metrics";

pub const ANALYSIS_HEADERS: [&str; 5] = [
    "Review ID",
    "Content",
    "Sentiment",
    "Response Time (min)",
    "Word Count",
];
pub const METRICS_HEADERS: [&str; 2] = ["Metric", "Value"];

/// Header background colour as 0xRRGGBB.
pub const HEADER_FILL_RGB: u32 = 0x366092;

/// Widest a column is ever sized to, in characters.
pub const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl Cell {
    fn text(value: Option<&str>) -> Self {
        value.map_or(Cell::Blank, |v| Cell::Text(v.to_string()))
    }

    /// The value as it reads in the sheet, used for sizing.
    pub fn rendered(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(number) => number.to_string(),
            Cell::Blank => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetLayout {
    /// Header row plus data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Width per column: longest rendered value plus padding, capped.
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.rendered().chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default();
                (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

pub fn analysis_sheet(records: &[TransformedRecord]) -> SheetLayout {
    let rows = records
        .iter()
        .map(|record| {
            vec![
                Cell::text(record.review_id.as_deref()),
                Cell::text(record.content.as_deref()),
                Cell::text(record.sentiment.label()),
                record
                    .response_time_minutes
                    .map_or(Cell::Blank, |m| Cell::Number(round2(m))),
                Cell::Number(record.word_count as f64),
            ]
        })
        .collect();

    SheetLayout {
        name: ANALYSIS_SHEET,
        headers: ANALYSIS_HEADERS.to_vec(),
        rows,
    }
}

pub fn metrics_sheet(metrics: &MetricsSummary) -> SheetLayout {
    let rows = metrics
        .entries()
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                MetricValue::Count(count) => Cell::Number(count as f64),
                MetricValue::Mean(mean) => mean.map_or(Cell::Blank, |m| Cell::Number(round2(m))),
                MetricValue::Percentage(percent) => Cell::Number(round2(percent)),
            };
            vec![Cell::Text(name.to_string()), value]
        })
        .collect();

    SheetLayout {
        name: METRICS_SHEET,
        headers: METRICS_HEADERS.to_vec(),
        rows,
    }
}

/// Both sheets, in workbook order.
pub fn workbook_layout(records: &[TransformedRecord], metrics: &MetricsSummary) -> Vec<SheetLayout> {
    vec![analysis_sheet(records), metrics_sheet(metrics)]
}
