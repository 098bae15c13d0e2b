use std::path::Path;

use super::command::{build_job_array_command, JobArraySpec, SchedulerCommand};
use super::dispatcher::dispatch;
use super::runner::CommandRunner;
use crate::config::{MtiConfig, SchedulerConfig};
use crate::error::{PipelineError, Result};
use crate::events::{PipelineEvent, PipelineObserver};
use crate::file_layout::{indexed_files, parse_output_index};
use crate::validation::validate_subdir_name;

/// Indices of `output<N>` files in `dir` smaller than `threshold_bytes`
///
/// A job that died early leaves only the scheduler's report behind, which is
/// far shorter than a real annotation result. Sorted ascending.
pub fn detect_failed_outputs(dir: &Path, threshold_bytes: u64) -> Result<Vec<u32>> {
    let mut failed = Vec::new();

    for (index, path) in indexed_files(dir, parse_output_index)? {
        let size = std::fs::metadata(&path)
            .map_err(|e| PipelineError::io(&path, e))?
            .len();
        if size < threshold_bytes {
            failed.push(index);
        }
    }

    Ok(failed)
}

/// Resubmit every undersized output of `subdir` as one job array
///
/// Returns `None` without contacting the scheduler when nothing failed.
pub async fn resubmit_failed(
    subdir: &str,
    scheduler: &SchedulerConfig,
    mti: &MtiConfig,
    runner: &dyn CommandRunner,
    observer: &dyn PipelineObserver,
) -> Result<Option<SchedulerCommand>> {
    validate_subdir_name(subdir).map_err(PipelineError::ValidationError)?;

    let failed = detect_failed_outputs(&mti.output_subdir(subdir), scheduler.failure_threshold_bytes)?;

    if failed.is_empty() {
        observer.on_event(&PipelineEvent::NoFailedOutputs {
            subdir: subdir.to_string(),
        });
        return Ok(None);
    }

    observer.on_event(&PipelineEvent::FailedOutputsDetected {
        subdir: subdir.to_string(),
        indices: failed.clone(),
    });

    let command = build_job_array_command(JobArraySpec::Indices(failed), subdir, scheduler, mti)?;
    dispatch(&command, subdir, mti, runner, observer).await?;

    Ok(Some(command))
}
