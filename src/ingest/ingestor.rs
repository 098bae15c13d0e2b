use std::path::Path;

use super::parser::{parse_output_line, ParsedLine};
use super::sink::AnnotationSink;
use crate::error::{PipelineError, Result};
use crate::events::{PipelineEvent, PipelineObserver, SkipReason};
use crate::file_layout::{indexed_files, parse_output_index};

/// Counts from one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub annotations: usize,
    pub sentinels: usize,
    pub malformed: usize,
    pub unparseable: usize,
    pub error_lines: usize,
}

impl IngestSummary {
    pub fn rows_inserted(&self) -> usize {
        self.annotations + self.sentinels
    }

    pub fn skipped(&self) -> usize {
        self.malformed + self.unparseable + self.error_lines
    }

    fn count_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::Malformed(_) => self.malformed += 1,
            SkipReason::Unparseable => self.unparseable += 1,
            SkipReason::ErrorReported => self.error_lines += 1,
        }
    }
}

/// Insert the results of every `output<N>` file in `outputs_dir`
///
/// Files are processed in index order, lines in file order, one insert per
/// parsed line. Lines that do not parse are reported and skipped. A sink
/// error stops the run; rows already inserted stay inserted.
pub async fn ingest_outputs(
    outputs_dir: &Path,
    sink: &dyn AnnotationSink,
    observer: &dyn PipelineObserver,
) -> Result<IngestSummary> {
    crate::log_pipeline!(info, "Started ingesting outputs", directory: outputs_dir);

    let mut summary = IngestSummary::default();

    for (_, path) in indexed_files(outputs_dir, parse_output_index)? {
        observer.on_event(&PipelineEvent::IngestFileStarted { path: path.clone() });

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| PipelineError::io(&path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let before = summary.rows_inserted();

        for (offset, line) in content.lines().enumerate() {
            match parse_output_line(line) {
                ParsedLine::Annotation(record) => {
                    sink.insert_annotation(&record).await?;
                    summary.annotations += 1;
                }
                ParsedLine::NoTermsSuggested(sentinel) => {
                    sink.insert_sentinel(&sentinel).await?;
                    summary.sentinels += 1;
                }
                ParsedLine::Blank => {}
                ParsedLine::Skipped(reason) => {
                    summary.count_skip(&reason);
                    observer.on_event(&PipelineEvent::LineSkipped {
                        path: path.clone(),
                        line_number: offset + 1,
                        reason,
                    });
                }
            }
        }

        summary.files += 1;
        observer.on_event(&PipelineEvent::IngestFileFinished {
            path,
            rows_inserted: summary.rows_inserted() - before,
        });
    }

    crate::log_pipeline!(info, "Finished ingesting outputs",
        directory: outputs_dir,
        files: summary.files,
        rows_inserted: summary.rows_inserted(),
        skipped: summary.skipped()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::ingest::MemoryAnnotationSink;
    use crate::models::{AnnotationRecord, SentinelRow};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct FailingSink;

    #[async_trait]
    impl AnnotationSink for FailingSink {
        async fn insert_annotation(&self, _record: &AnnotationRecord) -> Result<()> {
            Err(PipelineError::DatabaseError("connection reset".to_string()))
        }

        async fn insert_sentinel(&self, _sentinel: &SentinelRow) -> Result<()> {
            Err(PipelineError::DatabaseError("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_files_are_ingested_in_index_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("output10"),
            "\"10\"|Neoplasms|C0027651|700|MH||x|C04|D009369\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("output2"), "\"2\"||||\n").unwrap();
        fs::write(temp_dir.path().join("errors12_2"), "\"99\"||||\n").unwrap();
        let sink = MemoryAnnotationSink::new();
        let observer = RecordingObserver::new();

        let summary = ingest_outputs(temp_dir.path(), &sink, &observer).await.unwrap();

        let ids: Vec<i64> = sink.rows().iter().map(|row| row.assay_id).collect();
        assert_eq!(ids, vec![2, 10]);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.annotations, 1);
        assert_eq!(summary.sentinels, 1);
    }

    #[tokio::test]
    async fn test_sink_error_stops_ingestion() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("output1"), "\"1\"||||\n").unwrap();

        let result = ingest_outputs(temp_dir.path(), &FailingSink, &RecordingObserver::new()).await;

        assert!(matches!(result, Err(PipelineError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = ingest_outputs(
            &temp_dir.path().join("0042"),
            &MemoryAnnotationSink::new(),
            &RecordingObserver::new(),
        )
        .await;

        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }
}
