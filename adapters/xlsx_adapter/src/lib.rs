use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use sentiment_core::domain::TransformedRecord;
use sentiment_core::error::{EtlError, Result};
use sentiment_core::layout::{self, Cell, SheetLayout, HEADER_FILL_RGB};
use sentiment_core::metrics::MetricsSummary;
use sentiment_core::ports::ReportWriter;
use sentiment_core::utils::timestamped_path;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const FILE_STEM: &str = "sentiment_analysis";

/// Excel writer adapter implementation
pub struct XlsxReportWriter {
    output_folder: PathBuf,
}

impl XlsxReportWriter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    fn header_format() -> Format {
        Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL_RGB))
            .set_align(FormatAlign::Center)
    }

    /// Writes one sheet of the layout into the worksheet
    fn render_sheet(
        worksheet: &mut Worksheet,
        sheet: &SheetLayout,
        header_format: &Format,
    ) -> std::result::Result<(), XlsxError> {
        worksheet.set_name(sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, header_format)?;
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_num, col, *number)?;
                    }
                    Cell::Blank => {}
                }
            }
        }

        for (col, width) in sheet.column_widths().into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width as f64)?;
        }
        Ok(())
    }
}

fn xlsx_error(e: XlsxError) -> EtlError {
    match e {
        XlsxError::IoError(io) => EtlError::filesystem(io.to_string()),
        other => EtlError::serialization(other.to_string()),
    }
}

impl ReportWriter for XlsxReportWriter {
    fn write(
        &self,
        records: &[TransformedRecord],
        metrics: &MetricsSummary,
        now: NaiveDateTime,
    ) -> Result<PathBuf> {
        // Create output directory if it doesn't exist
        fs::create_dir_all(&self.output_folder).map_err(|e| {
            EtlError::filesystem(format!(
                "cannot create {}: {}",
                self.output_folder.display(),
                e
            ))
        })?;

        let header_format = Self::header_format();
        let mut workbook = Workbook::new();
        for sheet in layout::workbook_layout(records, metrics) {
            let worksheet = workbook.add_worksheet();
            Self::render_sheet(worksheet, &sheet, &header_format).map_err(xlsx_error)?;
            debug!(sheet = sheet.name, rows = sheet.row_count(), "sheet rendered");
        }

        let path = timestamped_path(&self.output_folder, FILE_STEM, "xlsx", now);
        workbook.save(&path).map_err(xlsx_error)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sentiment_core::domain::{RawRecord, Sentiment};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn records() -> Vec<TransformedRecord> {
        vec![TransformedRecord {
            review_id: Some("r1".to_string()),
            content: Some("Works well".to_string()),
            reply_content: Some("Thanks".to_string()),
            posted_at: None,
            replied_at: None,
            response_time_minutes: Some(12.3456),
            word_count: 2,
            sentiment: Sentiment::Positive,
            raw: RawRecord::new(Vec::new()),
        }]
    }

    fn metrics() -> MetricsSummary {
        MetricsSummary {
            total_reviews: 1,
            positive_reviews: 1,
            negative_reviews: 0,
            avg_response_time: None,
            avg_word_count: 2.0,
            response_rate: 100.0,
            negative_response_times: 0,
        }
    }

    #[test]
    fn test_write_creates_timestamped_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("analysis_output");
        let writer = XlsxReportWriter::new(&output);

        let path = writer.write(&records(), &metrics(), now()).unwrap();
        assert_eq!(path, output.join("sentiment_analysis_20261017_080000.xlsx"));

        // xlsx is a zip container
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_write_twice_keeps_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = XlsxReportWriter::new(dir.path());

        let first = writer.write(&records(), &metrics(), now()).unwrap();
        let second = writer.write(&records(), &metrics(), now()).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_output_folder_blocked_by_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        fs::write(&blocker, "not a directory").unwrap();

        let err = XlsxReportWriter::new(&blocker)
            .write(&records(), &metrics(), now())
            .unwrap_err();
        assert!(matches!(err, EtlError::Filesystem(_)));
    }
}
