//! Error types for the MTI pipeline.
//!

use crate::config::ConfigurationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("No input files found in {}", directory.display())]
    NoInputFiles { directory: PathBuf },
    #[error("Scheduler error: {0}")]
    SchedulerError(String),
}

impl PipelineError {
    /// Attach the offending path to an I/O error
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::DatabaseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
