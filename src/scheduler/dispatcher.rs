use std::fs;
use std::path::Path;

use super::command::{build_job_array_command, JobArraySpec, SchedulerCommand};
use super::runner::CommandRunner;
use crate::config::{MtiConfig, SchedulerConfig};
use crate::error::{PipelineError, Result};
use crate::events::{PipelineEvent, PipelineObserver};
use crate::file_layout::{indexed_files, parse_input_index};
use crate::validation::validate_subdir_name;

/// Indices of the `input<N>.txt` files in `dir`, ascending
pub fn input_file_indices(dir: &Path) -> Result<Vec<u32>> {
    Ok(indexed_files(dir, parse_input_index)?
        .into_iter()
        .map(|(index, _)| index)
        .collect())
}

/// Make sure the output and error directories for `subdir` exist
///
/// The scheduler writes into both before the job command runs, and does not
/// create missing directories itself.
fn prepare_job_directories(subdir: &str, mti: &MtiConfig) -> Result<()> {
    for dir in [mti.output_subdir(subdir), mti.error_subdir(subdir)] {
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
    }
    Ok(())
}

/// Run `command` and report the submission
///
/// Job directories are created first unless the runner never reaches a
/// scheduler.
pub(crate) async fn dispatch(
    command: &SchedulerCommand,
    subdir: &str,
    mti: &MtiConfig,
    runner: &dyn CommandRunner,
    observer: &dyn PipelineObserver,
) -> Result<()> {
    if runner.needs_job_directories() {
        prepare_job_directories(subdir, mti)?;
    }
    let exit_code = runner.run(command).await?;

    observer.on_event(&PipelineEvent::JobSubmitted {
        subdir: subdir.to_string(),
        job_spec: command.job_spec.to_string(),
        exit_code,
    });

    Ok(())
}

/// Submit one job array covering every input file of `subdir`
///
/// The array spans the lowest to the highest input index found, so the first
/// directory (which has no `input0.txt`) starts at 1 and later ones start at
/// their first file index. A non-zero scheduler status is reported but not
/// treated as an error.
pub async fn submit_batch(
    subdir: &str,
    scheduler: &SchedulerConfig,
    mti: &MtiConfig,
    runner: &dyn CommandRunner,
    observer: &dyn PipelineObserver,
) -> Result<SchedulerCommand> {
    validate_subdir_name(subdir).map_err(PipelineError::ValidationError)?;

    let input_dir = mti.input_subdir(subdir);
    let indices = input_file_indices(&input_dir)?;
    let (first, last) = match (indices.first(), indices.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(PipelineError::NoInputFiles { directory: input_dir }),
    };

    let command = build_job_array_command(
        JobArraySpec::Range { first, last },
        subdir,
        scheduler,
        mti,
    )?;

    dispatch(&command, subdir, mti, runner, observer).await?;

    crate::log_pipeline!(debug, "Input files covered by submission",
        subdir: subdir,
        files: indices.len(),
        command: command.to_string()
    );

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::scheduler::RecordingRunner;
    use tempfile::TempDir;

    fn mti(temp_dir: &TempDir) -> MtiConfig {
        MtiConfig {
            mti_root: temp_dir.path().join("mti"),
            files_root: temp_dir.path().to_path_buf(),
            inputfiles_dir: "inputfiles".to_string(),
            email: "curator@example.org".to_string(),
        }
    }

    fn touch_inputs(mti: &MtiConfig, subdir: &str, indices: &[u32]) {
        let dir = mti.input_subdir(subdir);
        fs::create_dir_all(&dir).unwrap();
        for index in indices {
            fs::write(dir.join(format!("input{index}.txt")), "\"1\"|x\n").unwrap();
        }
    }

    #[tokio::test]
    async fn test_submit_spans_first_to_last_index() {
        let temp_dir = TempDir::new().unwrap();
        let mti = mti(&temp_dir);
        touch_inputs(&mti, "0002", &[100, 101, 150, 199]);
        let runner = RecordingRunner::new();
        let observer = RecordingObserver::new();

        let command = submit_batch("0002", &SchedulerConfig::default(), &mti, &runner, &observer)
            .await
            .unwrap();

        assert_eq!(command.job_spec, JobArraySpec::Range { first: 100, last: 199 });
        assert_eq!(command.args[1], "myArray[100-199]%1");
        assert_eq!(runner.commands(), vec![command]);
        assert!(mti.output_subdir("0002").is_dir());
        assert!(mti.error_subdir("0002").is_dir());
        assert_eq!(
            observer.events(),
            vec![PipelineEvent::JobSubmitted {
                subdir: "0002".to_string(),
                job_spec: "100-199".to_string(),
                exit_code: Some(0),
            }]
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_job_directories_alone() {
        let temp_dir = TempDir::new().unwrap();
        let mti = mti(&temp_dir);
        touch_inputs(&mti, "0001", &[1, 2]);
        let runner = RecordingRunner::dry_run();

        let command = submit_batch(
            "0001",
            &SchedulerConfig::default(),
            &mti,
            &runner,
            &RecordingObserver::new(),
        )
        .await
        .unwrap();

        assert_eq!(runner.commands(), vec![command]);
        assert!(!mti.output_subdir("0001").exists());
        assert!(!mti.error_subdir("0001").exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let mti = mti(&temp_dir);
        touch_inputs(&mti, "0001", &[1, 2]);
        let runner = RecordingRunner::with_exit_code(Some(255));
        let observer = RecordingObserver::new();

        let result =
            submit_batch("0001", &SchedulerConfig::default(), &mti, &runner, &observer).await;

        assert!(result.is_ok());
        assert!(matches!(
            observer.events().as_slice(),
            [PipelineEvent::JobSubmitted { exit_code: Some(255), .. }]
        ));
    }

    #[tokio::test]
    async fn test_empty_directory_submits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mti = mti(&temp_dir);
        touch_inputs(&mti, "0001", &[]);
        let runner = RecordingRunner::new();

        let result = submit_batch(
            "0001",
            &SchedulerConfig::default(),
            &mti,
            &runner,
            &RecordingObserver::new(),
        )
        .await;

        assert!(matches!(result, Err(PipelineError::NoInputFiles { .. })));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_path_like_subdir_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let result = submit_batch(
            "../0001",
            &SchedulerConfig::default(),
            &mti(&temp_dir),
            &runner,
            &RecordingObserver::new(),
        )
        .await;

        assert!(matches!(result, Err(PipelineError::ValidationError(_))));
        assert!(runner.commands().is_empty());
    }
}
