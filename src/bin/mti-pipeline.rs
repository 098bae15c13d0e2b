//! # MTI Pipeline CLI
//!
//! Runs one pipeline step per invocation; the steps are meant to be run in
//! order, with the MTI jobs finishing on the cluster between `submit` and
//! `ingest`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use mti_pipeline::chunking::write_input_files;
use mti_pipeline::config::ConfigManager;
use mti_pipeline::database::{schema, DatabaseConnection, PgAnnotationStore};
use mti_pipeline::events::TracingObserver;
use mti_pipeline::ingest::{ingest_outputs, AnnotationSink, MemoryAnnotationSink};
use mti_pipeline::logging::init_structured_logging;
use mti_pipeline::models::fetch_assay_descriptions;
use mti_pipeline::reconcile::reconcile;
use mti_pipeline::scheduler::{
    resubmit_failed, submit_batch, CommandRunner, ProcessRunner, RecordingRunner,
};
use mti_pipeline::validation::validate_subdir_name;

#[derive(Parser)]
#[command(name = "mti-pipeline")]
#[command(about = "Annotate assay descriptions with MeSH terms through MTI batch jobs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Directory containing mti-pipeline.yaml (default: ./config)
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    /// Configuration environment (default: MTI_ENV, APP_ENV or development)
    #[arg(short, long, global = true)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the annotation table, column comments and indexes
    CreateSchema {
        /// Create the table only
        #[arg(long)]
        skip_indexes: bool,
    },

    /// Query assay descriptions and write MTI input files
    MakeInputs {
        /// SQL predicate appended to the description query
        #[arg(long)]
        condition: Option<String>,

        /// Root of the numbered input directories (default: from configuration)
        #[arg(long)]
        output_root: Option<PathBuf>,
    },

    /// Submit every input file of a subdirectory as one job array
    Submit {
        #[arg(value_parser = parse_subdir)]
        subdir: String,

        /// Print the scheduler command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Resubmit the jobs of a subdirectory whose output is undersized
    Resubmit {
        #[arg(value_parser = parse_subdir)]
        subdir: String,

        #[arg(long)]
        dry_run: bool,
    },

    /// Insert the output files of a subdirectory into the annotation table
    Ingest {
        #[arg(value_parser = parse_subdir)]
        subdir: String,

        /// Read output files from this directory instead of the configured one
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Parse without touching the database
        #[arg(long)]
        dry_run: bool,
    },

    /// List assay ids of a subdirectory that have no result line
    Reconcile {
        #[arg(value_parser = parse_subdir)]
        subdir: String,
    },

    /// Print the effective configuration with secrets masked
    ShowConfig,
}

fn parse_subdir(value: &str) -> Result<String, String> {
    validate_subdir_name(value)?;
    Ok(value.to_string())
}

fn load_config(cli: &Cli) -> anyhow::Result<Arc<ConfigManager>> {
    let manager = match &cli.environment {
        Some(environment) => {
            ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), environment)
        }
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    };
    manager.context("failed to load pipeline configuration")
}

async fn connect(manager: &ConfigManager) -> anyhow::Result<DatabaseConnection> {
    DatabaseConnection::connect(&manager.config().database)
        .await
        .context("failed to connect to the database")
}

fn runner(dry_run: bool) -> Box<dyn CommandRunner> {
    if dry_run {
        Box::new(RecordingRunner::dry_run())
    } else {
        Box::new(ProcessRunner)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();
    let manager = load_config(&cli)?;
    let config = manager.config();
    let observer = TracingObserver;

    match &cli.command {
        Commands::CreateSchema { skip_indexes } => {
            let db = connect(&manager).await?;
            let table = &config.database.annotation_table;

            schema::create_annotation_table(db.pool(), table).await?;
            if !skip_indexes {
                schema::create_annotation_indexes(db.pool(), table).await?;
            }
            db.close().await;
            println!("Created annotation table {table}");
        }

        Commands::MakeInputs {
            condition,
            output_root,
        } => {
            let db = connect(&manager).await?;
            let assays = fetch_assay_descriptions(
                db.pool(),
                &config.database.source_table,
                condition.as_deref(),
            )
            .await?;
            db.close().await;

            let root = output_root
                .clone()
                .unwrap_or_else(|| config.mti.inputfiles_root());
            let summary = write_input_files(&assays, &config.chunking, &root, &observer)?;
            println!(
                "Wrote {} assays to {} files under {}",
                summary.records,
                summary.file_count(),
                root.display()
            );
        }

        Commands::Submit { subdir, dry_run } => {
            let command = submit_batch(
                subdir,
                &config.scheduler,
                &config.mti,
                runner(*dry_run).as_ref(),
                &observer,
            )
            .await?;
            println!("{command}");
        }

        Commands::Resubmit { subdir, dry_run } => {
            match resubmit_failed(
                subdir,
                &config.scheduler,
                &config.mti,
                runner(*dry_run).as_ref(),
                &observer,
            )
            .await?
            {
                Some(command) => println!("{command}"),
                None => println!("No missing files detected in {subdir}"),
            }
        }

        Commands::Ingest {
            subdir,
            dir,
            dry_run,
        } => {
            let outputs = dir.clone().unwrap_or_else(|| config.mti.output_subdir(subdir));

            let summary = if *dry_run {
                ingest_outputs(&outputs, &MemoryAnnotationSink::new(), &observer).await?
            } else {
                let db = connect(&manager).await?;
                let store =
                    PgAnnotationStore::new(db.pool().clone(), &config.database.annotation_table)?;
                let sink: &dyn AnnotationSink = &store;
                let summary = ingest_outputs(&outputs, sink, &observer).await?;
                db.close().await;
                summary
            };

            println!(
                "Ingested {} files: {} annotations, {} sentinels, {} skipped ({} ERROR lines)",
                summary.files,
                summary.annotations,
                summary.sentinels,
                summary.skipped(),
                summary.error_lines
            );
        }

        Commands::Reconcile { subdir } => {
            let report = reconcile(
                &config.mti.input_subdir(subdir),
                &config.mti.output_subdir(subdir),
            )
            .await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_complete() {
                bail!(
                    "{} of {} assay ids in {subdir} have no result",
                    report.missing.len(),
                    report.expected
                );
            }
        }

        Commands::ShowConfig => {
            println!("environment: {}", manager.environment());
            println!("{}", serde_json::to_string_pretty(&manager.debug_config())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdir_arguments_are_single_components() {
        for step in ["submit", "resubmit", "ingest", "reconcile"] {
            assert!(Cli::try_parse_from(["mti-pipeline", step, "0001"]).is_ok());
            assert!(Cli::try_parse_from(["mti-pipeline", step, "../0001"]).is_err());
            assert!(Cli::try_parse_from(["mti-pipeline", step, "/tmp"]).is_err());
        }
    }

    #[test]
    fn test_help_is_reported_as_parse_error() {
        let error = Cli::try_parse_from(["mti-pipeline", "--help"]).err().unwrap();

        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
