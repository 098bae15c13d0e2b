use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;

/// Why an output line was not turned into a database row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Fewer fields than an annotation needs, or a non-numeric score
    Malformed(String),
    /// No numeric assay id; usually a scheduler trailer line
    Unparseable,
    /// The annotation service answered `ERROR` instead of data
    ErrorReported,
}

/// Something a pipeline component did that is worth reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PipelineEvent {
    InputRootCleared {
        root: PathBuf,
    },
    InputFileWritten {
        path: PathBuf,
        file_index: usize,
        records: usize,
    },
    /// Description would break the pipe-delimited line format downstream
    SuspiciousDescription {
        assay_id: i64,
        reason: String,
    },
    JobSubmitted {
        subdir: String,
        job_spec: String,
        exit_code: Option<i32>,
    },
    NoFailedOutputs {
        subdir: String,
    },
    FailedOutputsDetected {
        subdir: String,
        indices: Vec<u32>,
    },
    IngestFileStarted {
        path: PathBuf,
    },
    IngestFileFinished {
        path: PathBuf,
        rows_inserted: usize,
    },
    LineSkipped {
        path: PathBuf,
        line_number: usize,
        reason: SkipReason,
    },
}

/// Receives pipeline events; implementations must be cheap and must not fail
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards events to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::InputRootCleared { root } => {
                crate::log_pipeline!(info, "Cleared input root", root: root);
            }
            PipelineEvent::InputFileWritten {
                path,
                file_index,
                records,
            } => {
                crate::log_pipeline!(debug, "Wrote input file",
                    path: path,
                    file_index: file_index,
                    records: records
                );
            }
            PipelineEvent::SuspiciousDescription { assay_id, reason } => {
                crate::log_pipeline!(warn, "Description may misalign output fields",
                    assay_id: assay_id,
                    reason: reason
                );
            }
            PipelineEvent::JobSubmitted {
                subdir,
                job_spec,
                exit_code,
            } => {
                if *exit_code == Some(0) {
                    crate::log_pipeline!(info, "Submitted job array", subdir: subdir,
                        job_spec: job_spec
                    );
                } else {
                    crate::log_pipeline!(warn, "Job array submission exited abnormally", subdir: subdir,
                        job_spec: job_spec,
                        exit_code: exit_code
                    );
                }
            }
            PipelineEvent::NoFailedOutputs { subdir } => {
                crate::log_pipeline!(info, "No missing files detected", subdir: subdir);
            }
            PipelineEvent::FailedOutputsDetected { subdir, indices } => {
                crate::log_pipeline!(info, "Missing file(s) detected, resubmitting", subdir: subdir,
                    indices: indices
                );
            }
            PipelineEvent::IngestFileStarted { path } => {
                crate::log_pipeline!(info, "Started with file", path: path);
            }
            PipelineEvent::IngestFileFinished {
                path,
                rows_inserted,
            } => {
                crate::log_pipeline!(info, "Finished with file",
                    path: path,
                    rows_inserted: rows_inserted
                );
            }
            PipelineEvent::LineSkipped {
                path,
                line_number,
                reason,
            } => match reason {
                SkipReason::ErrorReported => {
                    crate::log_pipeline!(warn,
                        "Line contains 'ERROR'; check assay ids against the input files",
                        path: path,
                        line_number: line_number
                    );
                }
                SkipReason::Malformed(detail) => {
                    crate::log_pipeline!(info, "Skipped malformed line",
                        path: path,
                        line_number: line_number,
                        detail: detail
                    );
                }
                SkipReason::Unparseable => {
                    crate::log_pipeline!(debug, "Skipped non-annotation line",
                        path: path,
                        line_number: line_number
                    );
                }
            },
        }
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    pub fn skipped_lines(&self) -> Vec<(usize, SkipReason)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PipelineEvent::LineSkipped {
                    line_number,
                    reason,
                    ..
                } => Some((*line_number, reason.clone())),
                _ => None,
            })
            .collect()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}
