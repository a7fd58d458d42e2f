use crate::domain::{RawDataset, TransformedRecord};
use crate::error::Result;
use crate::metrics::MetricsSummary;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Fixed extraction query run against the source store.
pub const EXTRACT_QUERY: &str = "SELECT s.* FROM sentiment s";

pub trait SourceRepository {
    // Runs EXTRACT_QUERY and returns every row in store order.
    // The connection must be released before returning, on success or failure.
    fn fetch_all(&self) -> Result<RawDataset>;
}

/// Intermediate handoff between extraction and transformation.
pub trait StagingStore {
    /// Persists the dataset under a name derived from `now` and returns its path.
    fn stage(&self, dataset: &RawDataset, now: NaiveDateTime) -> Result<PathBuf>;

    fn read(&self, path: &Path) -> Result<RawDataset>;
}

/// Trait for writing the final report
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ReportWriter {
    fn write(
        &self,
        records: &[TransformedRecord],
        metrics: &MetricsSummary,
        now: NaiveDateTime,
    ) -> Result<PathBuf>;
}
