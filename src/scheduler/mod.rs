//! # Batch Scheduling
//!
//! Submits MTI input files to the LSF cluster scheduler as job arrays, one
//! array member per input file, and resubmits the members whose output shows
//! the job died before the annotation service answered.
//!
//! Commands are built as an explicit argument vector ([`SchedulerCommand`])
//! and executed through the [`CommandRunner`] seam, so submissions can be
//! recorded instead of run.

pub mod command;
pub mod dispatcher;
pub mod failure;
pub mod runner;

pub use command::{
    build_job_array_command, JobArraySpec, PathTemplate, SchedulerCommand, JOB_INDEX_VARIABLE,
    MAX_CONCURRENT_JOBS,
};
pub use dispatcher::{input_file_indices, submit_batch};
pub use failure::{detect_failed_outputs, resubmit_failed};
pub use runner::{CommandRunner, ProcessRunner, RecordingRunner};
