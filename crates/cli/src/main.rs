mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use csv_adapter::CsvStagingStore;
use postgres_adapter::PostgresSourceRepository;
use sentiment_core::application::PipelineService;
use sentiment_core::error::{EtlError, PipelineError, Stage};
use sentiment_core::ports::{ReportWriter, SourceRepository, StagingStore};
use sqlite_adapter::SqliteSourceRepository;
use tracing::{error, info, warn};
use xlsx_adapter::XlsxReportWriter;

fn main() {
    // A missing .env file is fine; settings may come from the real environment
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init_stderr_logging();

    match run(&cli) {
        Ok(report) => {
            println!("\nETL pipeline completed successfully");
            println!("Analysis saved to {}", report.display());
        }
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("ETL pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn source_repository(cli: &Cli) -> Result<Box<dyn SourceRepository>, EtlError> {
    if let Some(path) = &cli.sqlite {
        info!(path = %path.display(), "using sqlite source");
        return Ok(Box::new(SqliteSourceRepository::new(path.clone())));
    }

    let config = cli.database_config();
    let params = config.validate().map_err(|e| {
        warn!(source = %config.display_string(), "incomplete postgres settings");
        e
    })?;
    info!(source = %params.display_string(), "using postgres source");
    Ok(Box::new(PostgresSourceRepository::new(params)))
}

fn run(cli: &Cli) -> Result<std::path::PathBuf, PipelineError> {
    // Bad configuration means nothing could be extracted
    let source =
        source_repository(cli).map_err(|e| PipelineError::new(Stage::Extract, e))?;
    let config = cli.pipeline_config();

    // Instantiate concrete implementations of secondary adapters
    let staging: Box<dyn StagingStore> = Box::new(CsvStagingStore::new(config.extract_dir));
    let report_writer: Box<dyn ReportWriter> = Box::new(XlsxReportWriter::new(config.output_dir));

    let service = PipelineService::new(source, staging, report_writer);
    let outcome = service.run()?;

    let metrics = &outcome.metrics;
    info!(
        total = metrics.total_reviews,
        positive = metrics.positive_reviews,
        negative = metrics.negative_reviews,
        response_rate = metrics.response_rate,
        "run summary"
    );
    if metrics.negative_response_times > 0 {
        info!(
            count = metrics.negative_response_times,
            "records with reply before post were left out of the average response time"
        );
    }
    Ok(outcome.report_file)
}
