//! Error types for the sentiment pipeline.

use std::fmt;
use thiserror::Error;

/// Main error type shared by the core and every adapter.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors
    #[error("Query error: {0}")]
    Query(String),

    /// Directory or file creation, read and write failures
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Malformed dates, missing columns, empty dataset
    #[error("Data error: {0}")]
    Data(String),

    /// Intermediate file or spreadsheet encoding failures
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EtlError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn filesystem(msg: impl Into<String>) -> Self {
        Self::Filesystem(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Filesystem(_) => "Filesystem Error",
            Self::Data(_) => "Data Error",
            Self::Serialization(_) => "Serialization Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using EtlError.
pub type Result<T> = std::result::Result<T, EtlError>;

/// The three pipeline stages, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extraction",
            Stage::Transform => "transformation",
            Stage::Load => "load",
        };
        f.write_str(name)
    }
}

/// A stage failure as surfaced to the operator.
#[derive(Error, Debug)]
#[error("Error during {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: EtlError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: EtlError) -> Self {
        Self { stage, source }
    }

    pub fn category(&self) -> &'static str {
        self.source.category()
    }
}
