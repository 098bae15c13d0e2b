//! # Database Operations
//!
//! PostgreSQL access through SQLx: connection pooling, the one-shot schema
//! setup for the annotation table, and the row writer used during ingestion.
//!
//! ## Key Components
//!
//! - [`connection`] - Pool creation from [`crate::config::DatabaseConfig`]
//! - [`schema`] - Annotation table, column comments and indexes
//! - [`annotation_store`] - [`crate::ingest::AnnotationSink`] backed by PostgreSQL
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mti_pipeline::config::DatabaseConfig;
//! use mti_pipeline::database::{schema, DatabaseConnection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::default();
//! let db = DatabaseConnection::connect(&config).await?;
//!
//! schema::create_annotation_table(db.pool(), &config.annotation_table).await?;
//! schema::create_annotation_indexes(db.pool(), &config.annotation_table).await?;
//! # Ok(())
//! # }
//! ```

pub mod annotation_store;
pub mod connection;
pub mod schema;

pub use annotation_store::PgAnnotationStore;
pub use connection::DatabaseConnection;
pub use schema::{create_annotation_indexes, create_annotation_table};
