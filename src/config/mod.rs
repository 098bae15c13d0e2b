//! # Pipeline Configuration System
//!
//! YAML-based configuration with environment-specific overrides. All paths,
//! table names and scheduler settings used by the pipeline come from here.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mti_pipeline::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (environment auto-detected)
//! let manager = ConfigManager::load()?;
//!
//! let batch_size = manager.config().chunking.batch_size;
//! let outputs = manager.config().mti.output_subdir("0001");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation::validate_table_name;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring mti-pipeline.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Record store connection and table names
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Input file partitioning
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Job scheduler submission settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Medical Text Indexer installation and file tree
    #[serde(default)]
    pub mti: MtiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Table holding `assay_id` and `description`
    pub source_table: String,
    /// Destination table for parsed annotations
    pub annotation_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "${DATABASE_URL}".to_string(),
            max_connections: 5,
            source_table: "chembl_21.assays".to_string(),
            annotation_table: "assay_mesh_annotations".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Records per input file
    pub batch_size: usize,
    /// Input files per numbered subdirectory
    pub files_per_directory: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            batch_size: 4000,
            files_per_directory: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub program: String,
    pub job_name: String,
    /// Output files smaller than this are treated as failed jobs
    pub failure_threshold_bytes: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            program: "bsub".to_string(),
            job_name: "myArray".to_string(),
            failure_threshold_bytes: 20_000,
        }
    }
}

/// Layout of the MTI installation.
///
/// `mti_root` holds `run.sh`; `files_root` is the directory next to the
/// Java batch clients that contains the input, output and error trees.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MtiConfig {
    pub mti_root: PathBuf,
    pub files_root: PathBuf,
    pub inputfiles_dir: String,
    pub email: String,
}

impl Default for MtiConfig {
    fn default() -> Self {
        Self {
            mti_root: PathBuf::from("SKR_Web_API_V2_1"),
            files_root: PathBuf::from("SKR_Web_API_V2_1/examples"),
            inputfiles_dir: "inputfiles".to_string(),
            email: String::new(),
        }
    }
}

impl MtiConfig {
    pub fn run_script(&self) -> PathBuf {
        self.mti_root.join("run.sh")
    }

    /// Root of the numbered input subdirectories
    pub fn inputfiles_root(&self) -> PathBuf {
        self.files_root.join(&self.inputfiles_dir)
    }

    pub fn input_subdir(&self, subdir: &str) -> PathBuf {
        self.inputfiles_root().join(subdir)
    }

    pub fn output_subdir(&self, subdir: &str) -> PathBuf {
        self.files_root.join("outputfiles").join(subdir)
    }

    pub fn error_subdir(&self, subdir: &str) -> PathBuf {
        self.files_root.join("errorfiles").join(subdir)
    }
}

/// Variable name of a value left as an unexpanded `${VAR}` placeholder
pub fn unexpanded_placeholder(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

impl PipelineConfig {
    /// Validate configuration values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool size must be greater than 0",
            ));
        }

        for (field, table) in [
            ("database.source_table", &self.database.source_table),
            ("database.annotation_table", &self.database.annotation_table),
        ] {
            validate_table_name(table).map_err(|reason| {
                ConfigurationError::invalid_value(field, table.as_str(), reason)
            })?;
        }

        if self.chunking.batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "chunking.batch_size",
                "0",
                "batch size must be greater than 0",
            ));
        }

        if self.chunking.files_per_directory == 0 {
            return Err(ConfigurationError::invalid_value(
                "chunking.files_per_directory",
                "0",
                "files per directory must be greater than 0",
            ));
        }

        if self.scheduler.program.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "scheduler.program",
                "scheduler configuration",
            ));
        }

        if self.scheduler.job_name.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "scheduler.job_name",
                "scheduler configuration",
            ));
        }

        if self.mti.inputfiles_dir.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "mti.inputfiles_dir",
                "mti configuration",
            ));
        }

        Ok(())
    }
}
