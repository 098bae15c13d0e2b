#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # MTI Pipeline
//!
//! Annotates ChEMBL assay descriptions with MeSH terms using the NLM Medical
//! Text Indexer (MTI) batch client, run as LSF job arrays.
//!
//! ## Overview
//!
//! Descriptions are read from PostgreSQL, written to numbered flat files,
//! submitted to the cluster scheduler one job array per directory, checked
//! for jobs that died early, and finally parsed back into an annotation
//! table.
//!
//! ```text
//! assays table ─► write_input_files ─► submit_batch ─► (MTI on LSF)
//!                                                        │
//!      annotation table ◄─ ingest_outputs ◄─ resubmit_failed
//! ```
//!
//! ## Module Organization
//!
//! - [`models`] - Assay and annotation records, description query
//! - [`chunking`] - Input file writer
//! - [`scheduler`] - Job array submission and failure resubmission
//! - [`ingest`] - Output parser and ingestion loop
//! - [`reconcile`] - Input/output assay id comparison
//! - [`database`] - Connection pool, schema setup, annotation store
//! - [`config`] - YAML configuration with environment overrides
//! - [`events`] - Observer interface every component reports through
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mti_pipeline::config::ConfigManager;
//! use mti_pipeline::database::DatabaseConnection;
//! use mti_pipeline::events::TracingObserver;
//! use mti_pipeline::{chunking, models};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let config = manager.config();
//! let db = DatabaseConnection::connect(&config.database).await?;
//!
//! let assays = models::fetch_assay_descriptions(db.pool(), &config.database.source_table, None).await?;
//! chunking::write_input_files(
//!     &assays,
//!     &config.chunking,
//!     &config.mti.inputfiles_root(),
//!     &TracingObserver,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                                   # Unit and integration tests
//! DATABASE_URL=postgres://... cargo test -- --ignored   # Database-backed tests
//! ```

pub mod chunking;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod file_layout;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod scheduler;
pub mod validation;

pub use chunking::{write_input_files, ChunkingSummary};
pub use config::{
    ChunkingConfig, ConfigManager, ConfigurationError, DatabaseConfig, MtiConfig, PipelineConfig,
    SchedulerConfig,
};
pub use error::{PipelineError, Result};
pub use events::{PipelineEvent, PipelineObserver, RecordingObserver, TracingObserver};
pub use ingest::{ingest_outputs, AnnotationSink, IngestSummary, MemoryAnnotationSink};
pub use models::{AnnotationRecord, AssayRecord, SentinelRow};
pub use reconcile::{reconcile, ReconciliationReport};
pub use scheduler::{
    resubmit_failed, submit_batch, CommandRunner, ProcessRunner, RecordingRunner,
    SchedulerCommand,
};
