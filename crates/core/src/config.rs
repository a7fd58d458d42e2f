//! Run configuration.
//!
//! Values arrive from the CLI layer (flags or environment); nothing here
//! carries a default credential.

use crate::error::{EtlError, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_EXTRACT_DIR: &str = "extract";
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_output";

/// PostgreSQL connection parameters as supplied by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Connection parameters with every required field present.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    /// Checks that every parameter is set, naming all that are missing.
    pub fn validate(&self) -> Result<ConnectionParams> {
        let missing: Vec<&str> = [
            ("host", &self.host),
            ("database", &self.database),
            ("user", &self.user),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(EtlError::config(format!(
                "missing database setting(s): {}",
                missing.join(", ")
            )));
        }
        if self.port == 0 {
            return Err(EtlError::config("database port must be non-zero"));
        }

        Ok(ConnectionParams {
            host: self.host.clone().unwrap_or_default(),
            port: self.port,
            database: self.database.clone().unwrap_or_default(),
            user: self.user.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        })
    }

    /// Returns a display-safe string (no password) for logs.
    pub fn display_string(&self) -> String {
        let host = self.host.as_deref().unwrap_or("<unset>");
        let database = self.database.as_deref().unwrap_or("<unset>");
        format!("{database} @ {host}:{}", self.port)
    }
}

impl ConnectionParams {
    pub fn display_string(&self) -> String {
        format!("{} @ {}:{}", self.database, self.host, self.port)
    }
}

// Keep the password out of debug output.
impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Where the pipeline writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub extract_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract_dir: PathBuf::from(DEFAULT_EXTRACT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> DatabaseConfig {
        DatabaseConfig {
            host: Some("db.local".to_string()),
            port: DEFAULT_PORT,
            database: Some("reviews".to_string()),
            user: Some("etl".to_string()),
            password: Some("s3cret".to_string()),
        }
    }

    #[test]
    fn test_validate_complete_config() {
        let params = full_config().validate().unwrap();
        assert_eq!(params.host, "db.local");
        assert_eq!(params.port, 5432);
        assert_eq!(params.password, "s3cret");
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let config = DatabaseConfig {
            user: None,
            password: Some(String::new()),
            ..full_config()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: missing database setting(s): user, password"
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = DatabaseConfig {
            port: 0,
            ..full_config()
        };
        assert!(matches!(config.validate(), Err(EtlError::Config(_))));
    }

    #[test]
    fn test_display_string_hides_password() {
        let config = full_config();
        assert_eq!(config.display_string(), "reviews @ db.local:5432");
        let params = config.validate().unwrap();
        assert!(!format!("{:?}", params).contains("s3cret"));
        assert_eq!(params.display_string(), "reviews @ db.local:5432");
    }

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.extract_dir, PathBuf::from("extract"));
        assert_eq!(config.output_dir, PathBuf::from("analysis_output"));
    }
}
