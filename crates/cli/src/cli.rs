//! Command-line arguments. Every database setting can also come from the
//! environment (or a `.env` file), so a plain `sentiment-etl` runs.

use clap::Parser;
use sentiment_core::config::{DatabaseConfig, PipelineConfig, DEFAULT_EXTRACT_DIR, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

/// Extracts the sentiment table, derives response metrics and writes an Excel report
#[derive(Parser, Debug)]
#[command(name = "sentiment-etl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database host
    #[arg(long, env = "SENTIMENT_DB_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = "SENTIMENT_DB_PORT", value_name = "PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database name
    #[arg(long, env = "SENTIMENT_DB_NAME", value_name = "DATABASE")]
    pub database: Option<String>,

    /// Database user
    #[arg(long, env = "SENTIMENT_DB_USER", value_name = "USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "SENTIMENT_DB_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read from a SQLite file instead of PostgreSQL; database settings are then ignored
    #[arg(long, value_name = "PATH")]
    pub sqlite: Option<PathBuf>,

    /// Folder for the intermediate extraction file
    #[arg(long, value_name = "DIR", default_value = DEFAULT_EXTRACT_DIR)]
    pub extract_dir: PathBuf,

    /// Folder for the Excel report
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

impl Cli {
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            extract_dir: self.extract_dir.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}
