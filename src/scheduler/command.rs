use std::fmt;
use std::path::Path;

use crate::config::{unexpanded_placeholder, ConfigurationError, MtiConfig, SchedulerConfig};
use crate::error::{PipelineError, Result};

/// Shell variable holding the array member's index inside a running job
pub const JOB_INDEX_VARIABLE: &str = "LSB_JOBINDEX";

/// At most one array member runs at a time; the MTI service slows down
/// badly with more than two or three concurrent batches.
pub const MAX_CONCURRENT_JOBS: u32 = 1;

/// Which members of a job array to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobArraySpec {
    Range { first: u32, last: u32 },
    Indices(Vec<u32>),
}

impl JobArraySpec {
    /// True when the spec selects no array member
    pub fn is_empty(&self) -> bool {
        match self {
            JobArraySpec::Range { first, last } => first > last,
            JobArraySpec::Indices(indices) => indices.is_empty(),
        }
    }
}

impl fmt::Display for JobArraySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobArraySpec::Range { first, last } => write!(f, "{first}-{last}"),
            JobArraySpec::Indices(indices) => {
                let joined = indices
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                f.write_str(&joined)
            }
        }
    }
}

/// A path with the array index spliced in between `prefix` and `suffix`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    prefix: String,
    suffix: String,
}

impl PathTemplate {
    pub fn new(dir: &Path, file_prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: dir.join(file_prefix).to_string_lossy().into_owned(),
            suffix: suffix.to_string(),
        }
    }

    /// Form understood by the scheduler's `-o`/`-e` options (`%I` token)
    pub fn scheduler_form(&self) -> String {
        format!("{}%I{}", self.prefix, self.suffix)
    }

    /// Form for the job's shell, with the literal parts quoted
    pub fn shell_form(&self) -> String {
        let mut rendered = shell_words::quote(&self.prefix).into_owned();
        rendered.push_str(&format!("${{{JOB_INDEX_VARIABLE}}}"));
        if !self.suffix.is_empty() {
            rendered.push_str(&shell_words::quote(&self.suffix));
        }
        rendered
    }
}

/// A scheduler invocation as a program plus explicit argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub job_spec: JobArraySpec,
}

impl fmt::Display for SchedulerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(self.args.iter());
        f.write_str(&shell_words::join(words))
    }
}

/// Build the job-array submission for one input subdirectory
///
/// Equivalent to
///
/// ```text
/// bsub -J "myArray[1-99]%1" -e <errors>/errors%J_%I -o <outputs>/output%I \
///   "<mti_root>/run.sh GenericBatchUser --email <email> --singleLinePMID \
///    <inputs>/input${LSB_JOBINDEX}.txt > <outputs>/output${LSB_JOBINDEX}"
/// ```
pub fn build_job_array_command(
    job_spec: JobArraySpec,
    subdir: &str,
    scheduler: &SchedulerConfig,
    mti: &MtiConfig,
) -> Result<SchedulerCommand> {
    if mti.email.trim().is_empty() {
        return Err(PipelineError::validation(
            "mti.email is required by the MTI batch service",
        ));
    }
    if let Some(variable) = unexpanded_placeholder(&mti.email) {
        return Err(
            ConfigurationError::environment_variable_error(variable, "mti.email is unset").into(),
        );
    }
    if job_spec.is_empty() {
        return Err(PipelineError::validation("job array must contain at least one index"));
    }

    let output_dir = mti.output_subdir(subdir);
    let error_log = PathTemplate::new(&mti.error_subdir(subdir), "errors%J_", "");
    let output_log = PathTemplate::new(&output_dir, "output", "");
    let input_file = PathTemplate::new(&mti.input_subdir(subdir), "input", ".txt");

    let run_script = mti.run_script().to_string_lossy().into_owned();
    let job_command = format!(
        "{} {} > {}",
        shell_words::join([
            run_script.as_str(),
            "GenericBatchUser",
            "--email",
            mti.email.as_str(),
            "--singleLinePMID",
        ]),
        input_file.shell_form(),
        output_log.shell_form(),
    );

    Ok(SchedulerCommand {
        program: scheduler.program.clone(),
        args: vec![
            "-J".to_string(),
            format!("{}[{job_spec}]%{MAX_CONCURRENT_JOBS}", scheduler.job_name),
            "-e".to_string(),
            error_log.scheduler_form(),
            "-o".to_string(),
            output_log.scheduler_form(),
            job_command,
        ],
        job_spec,
    })
}
