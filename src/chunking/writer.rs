use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::ChunkingConfig;
use crate::error::{PipelineError, Result};
use crate::events::{PipelineEvent, PipelineObserver};
use crate::file_layout::input_file_name;
use crate::models::AssayRecord;

/// Literal corrections applied to every description, in order
///
/// ChEMBL 21 and 22 spell the gland "prostrate" throughout.
const TYPO_CORRECTIONS: [(&str, &str); 2] = [("prostrate", "prostate"), ("Prostrate", "Prostate")];

/// What a chunking run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingSummary {
    pub files: Vec<PathBuf>,
    pub records: usize,
}

impl ChunkingSummary {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Name of the numbered subdirectory holding input file `file_index`
///
/// The directory number comes from the running file index, so with 100
/// files per directory `0001` holds files 1..=99 and `0002` holds 100..=199.
pub fn directory_name(file_index: usize, files_per_directory: usize) -> String {
    format!("000{}", 1 + file_index / files_per_directory)
}

pub fn correct_known_typos(description: &str) -> String {
    TYPO_CORRECTIONS
        .iter()
        .fold(description.to_string(), |text, (typo, fix)| {
            text.replace(typo, fix)
        })
}

/// `"<id>"|<description>` with typo corrections, no trailing newline
pub fn format_input_line(record: &AssayRecord) -> String {
    format!("\"{}\"|{}", record.id, correct_known_typos(&record.description))
}

/// Describe why a description would break the line format, if it would
fn line_format_hazard(description: &str) -> Option<&'static str> {
    if description.contains('|') {
        Some("description contains '|'")
    } else if description.contains(['\n', '\r']) {
        Some("description contains a line break")
    } else {
        None
    }
}

/// Create `root` if needed and remove everything inside it
fn recreate_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).map_err(|e| PipelineError::io(root, e))?;

    for entry in fs::read_dir(root).map_err(|e| PipelineError::io(root, e))? {
        let entry = entry.map_err(|e| PipelineError::io(root, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| PipelineError::io(&path, e))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| PipelineError::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
        }
    }

    Ok(())
}

/// Write `records` as MTI input files under `output_root`
///
/// Destroys any existing contents of `output_root` first. Records are split
/// into consecutive chunks of `batch_size`; chunk `n` (1-based) is written to
/// `<output_root>/<directory_name(n)>/input<n>.txt`, one record per line.
pub fn write_input_files(
    records: &[AssayRecord],
    config: &ChunkingConfig,
    output_root: &Path,
    observer: &dyn PipelineObserver,
) -> Result<ChunkingSummary> {
    if config.batch_size == 0 {
        return Err(PipelineError::validation("batch_size must be greater than 0"));
    }
    if config.files_per_directory == 0 {
        return Err(PipelineError::validation(
            "files_per_directory must be greater than 0",
        ));
    }

    recreate_root(output_root)?;
    observer.on_event(&PipelineEvent::InputRootCleared {
        root: output_root.to_path_buf(),
    });

    let mut summary = ChunkingSummary::default();

    for (offset, chunk) in records.chunks(config.batch_size).enumerate() {
        let file_index = offset + 1;
        let directory = output_root.join(directory_name(file_index, config.files_per_directory));
        fs::create_dir_all(&directory).map_err(|e| PipelineError::io(&directory, e))?;

        let path = directory.join(input_file_name(file_index));
        let file = File::create(&path).map_err(|e| PipelineError::io(&path, e))?;
        let mut writer = BufWriter::new(file);

        for record in chunk {
            if let Some(reason) = line_format_hazard(&record.description) {
                observer.on_event(&PipelineEvent::SuspiciousDescription {
                    assay_id: record.id,
                    reason: reason.to_string(),
                });
            }

            writeln!(writer, "{}", format_input_line(record))
                .map_err(|e| PipelineError::io(&path, e))?;
        }
        writer.flush().map_err(|e| PipelineError::io(&path, e))?;

        observer.on_event(&PipelineEvent::InputFileWritten {
            path: path.clone(),
            file_index,
            records: chunk.len(),
        });
        summary.records += chunk.len();
        summary.files.push(path);
    }

    crate::log_pipeline!(info, "Input files written",
        root: output_root,
        files: summary.file_count(),
        records: summary.records
    );

    Ok(summary)
}
