use crate::domain::RawDataset;
use crate::error::{EtlError, PipelineError, Stage};
use crate::metrics::MetricsSummary;
use crate::ports::{ReportWriter, SourceRepository, StagingStore};
use crate::transform::{self, TransformOutput};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub staged_file: PathBuf,
    pub report_file: PathBuf,
    pub metrics: MetricsSummary,
}

/// Application service running extract, transform and load in sequence
pub struct PipelineService {
    source: Box<dyn SourceRepository>,
    staging: Box<dyn StagingStore>,
    report_writer: Box<dyn ReportWriter>,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl PipelineService {
    /// Creates a new PipelineService with the given dependencies
    pub fn new(
        source: Box<dyn SourceRepository>,
        staging: Box<dyn StagingStore>,
        report_writer: Box<dyn ReportWriter>,
    ) -> Self {
        Self {
            source,
            staging,
            report_writer,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used for file timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Pulls every source row and stages it; returns the staged file path.
    pub fn extract(&self) -> Result<PathBuf, PipelineError> {
        let at_stage = |e: EtlError| PipelineError::new(Stage::Extract, e);
        let dataset = self.source.fetch_all().map_err(at_stage)?;
        let path = self.staging.stage(&dataset, (self.clock)()).map_err(at_stage)?;
        info!(rows = dataset.len(), path = %path.display(), "data extracted");
        Ok(path)
    }

    /// Reads the staged file back and derives records and metrics.
    pub fn transform(&self, staged_file: &Path) -> Result<TransformOutput, PipelineError> {
        let at_stage = |e: EtlError| PipelineError::new(Stage::Transform, e);
        let dataset: RawDataset = self.staging.read(staged_file).map_err(at_stage)?;
        let output = transform::transform_dataset(&dataset).map_err(at_stage)?;
        info!(records = output.records.len(), "data transformed");
        Ok(output)
    }

    pub fn load(&self, output: &TransformOutput) -> Result<PathBuf, PipelineError> {
        let path = self
            .report_writer
            .write(&output.records, &output.metrics, (self.clock)())
            .map_err(|e| PipelineError::new(Stage::Load, e))?;
        info!(path = %path.display(), "analysis saved");
        Ok(path)
    }

    /// Runs all three stages, stopping at the first failure.
    pub fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        let staged_file = self.extract()?;
        let output = self.transform(&staged_file)?;
        let report_file = self.load(&output)?;
        Ok(PipelineOutcome {
            staged_file,
            report_file,
            metrics: output.metrics,
        })
    }
}
