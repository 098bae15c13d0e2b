use async_trait::async_trait;
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::process::Command;

use super::command::SchedulerCommand;
use crate::error::{PipelineError, Result};

/// Runs scheduler commands
///
/// Returns the process exit code (`None` when killed by a signal). Only a
/// failure to start the process is an error; what the scheduler does with
/// the job afterwards is not observable here.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &SchedulerCommand) -> Result<Option<i32>>;

    /// Whether the job's output and error directories must exist before `run`
    fn needs_job_directories(&self) -> bool {
        true
    }
}

/// Spawns the scheduler as a child process and waits for it to exit
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &SchedulerCommand) -> Result<Option<i32>> {
        crate::log_pipeline!(debug, "Spawning scheduler", command: command.to_string());

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                PipelineError::SchedulerError(format!(
                    "failed to start '{}': {e}",
                    command.program
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        crate::log_pipeline!(debug, "Scheduler finished",
            exit_code: output.status.code(),
            stdout: stdout.trim(),
            stderr: stderr.trim()
        );

        Ok(output.status.code())
    }
}

/// Records commands instead of running them
///
/// Every command "exits" with `exit_code`. Used for dry runs and tests.
#[derive(Debug)]
pub struct RecordingRunner {
    exit_code: Option<i32>,
    needs_job_directories: bool,
    commands: Mutex<Vec<SchedulerCommand>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::with_exit_code(Some(0))
    }

    pub fn with_exit_code(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            needs_job_directories: true,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// A runner that leaves the filesystem untouched
    pub fn dry_run() -> Self {
        Self {
            needs_job_directories: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> Vec<SchedulerCommand> {
        self.commands.lock().clone()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &SchedulerCommand) -> Result<Option<i32>> {
        self.commands.lock().push(command.clone());
        Ok(self.exit_code)
    }

    fn needs_job_directories(&self) -> bool {
        self.needs_job_directories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::command::JobArraySpec;

    fn command(program: &str, args: &[&str]) -> SchedulerCommand {
        SchedulerCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            job_spec: JobArraySpec::Range { first: 1, last: 1 },
        }
    }

    #[tokio::test]
    async fn test_process_runner_reports_exit_code() {
        let runner = ProcessRunner;

        let ok = runner.run(&command("sh", &["-c", "exit 0"])).await.unwrap();
        assert_eq!(ok, Some(0));

        let failed = runner.run(&command("sh", &["-c", "exit 3"])).await.unwrap();
        assert_eq!(failed, Some(3));
    }

    #[tokio::test]
    async fn test_process_runner_missing_program() {
        let result = ProcessRunner
            .run(&command("definitely-not-a-scheduler-binary", &[]))
            .await;

        assert!(matches!(result, Err(PipelineError::SchedulerError(_))));
    }

    #[tokio::test]
    async fn test_recording_runner() {
        let runner = RecordingRunner::with_exit_code(Some(255));

        let code = runner.run(&command("bsub", &["-J", "x[1-1]%1"])).await.unwrap();

        assert_eq!(code, Some(255));
        assert_eq!(runner.commands().len(), 1);
        assert_eq!(runner.commands()[0].args[1], "x[1-1]%1");
    }

    #[test]
    fn test_only_dry_run_skips_job_directories() {
        assert!(ProcessRunner.needs_job_directories());
        assert!(RecordingRunner::new().needs_job_directories());
        assert!(!RecordingRunner::dry_run().needs_job_directories());
    }
}
