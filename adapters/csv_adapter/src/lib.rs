use chrono::NaiveDateTime;
use csv::{ReaderBuilder, WriterBuilder};
use sentiment_core::domain::{RawDataset, RawRecord};
use sentiment_core::error::{EtlError, Result};
use sentiment_core::ports::StagingStore;
use sentiment_core::utils::timestamped_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const FILE_STEM: &str = "sentiment";

/// Stages extracted rows as `<dir>/sentiment_<YYYYMMDD_HHMMSS>.csv`.
///
/// NULL is written as an empty field and every empty field reads back as
/// absent, so an empty string and NULL are indistinguishable after staging.
pub struct CsvStagingStore {
    extract_dir: PathBuf,
}

impl CsvStagingStore {
    pub fn new(extract_dir: impl Into<PathBuf>) -> Self {
        Self {
            extract_dir: extract_dir.into(),
        }
    }
}

fn csv_error(path: &Path, e: csv::Error) -> EtlError {
    if e.is_io_error() {
        EtlError::filesystem(format!("{}: {}", path.display(), e))
    } else {
        EtlError::serialization(format!("{}: {}", path.display(), e))
    }
}

impl StagingStore for CsvStagingStore {
    fn stage(&self, dataset: &RawDataset, now: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.extract_dir).map_err(|e| {
            EtlError::filesystem(format!(
                "cannot create {}: {}",
                self.extract_dir.display(),
                e
            ))
        })?;

        let path = timestamped_path(&self.extract_dir, FILE_STEM, "csv", now);
        let mut writer = WriterBuilder::new()
            .from_path(&path)
            .map_err(|e| csv_error(&path, e))?;

        writer
            .write_record(&dataset.columns)
            .map_err(|e| csv_error(&path, e))?;
        for row in &dataset.rows {
            let fields = row.values.iter().map(|v| v.as_deref().unwrap_or(""));
            writer
                .write_record(fields)
                .map_err(|e| csv_error(&path, e))?;
        }
        writer
            .flush()
            .map_err(|e| EtlError::filesystem(format!("{}: {}", path.display(), e)))?;

        debug!(rows = dataset.len(), path = %path.display(), "staged extraction");
        Ok(path)
    }

    fn read(&self, path: &Path) -> Result<RawDataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let values = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect();
            rows.push(RawRecord::new(values));
        }

        Ok(RawDataset::new(columns, rows))
    }
}
