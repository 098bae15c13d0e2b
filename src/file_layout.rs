//! Naming conventions of the MTI file tree.
//!
//! ```text
//! <files_root>/<inputfiles_dir>/0001/input1.txt
//! <files_root>/outputfiles/0001/output1
//! <files_root>/errorfiles/0001/errors<job>_<index>
//! ```

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{PipelineError, Result};

fn input_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^input(\d+)\.txt$").expect("input pattern is valid"))
}

fn output_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^output(\d+)$").expect("output pattern is valid"))
}

pub fn input_file_name(file_index: usize) -> String {
    format!("input{file_index}.txt")
}

/// Index of an `input<N>.txt` file name
pub fn parse_input_index(file_name: &str) -> Option<u32> {
    input_name_pattern()
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Index of an `output<N>` file name
pub fn parse_output_index(file_name: &str) -> Option<u32> {
    output_name_pattern()
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Regular files in `dir` whose names `parse_index` accepts, sorted by index
pub fn indexed_files(
    dir: &Path,
    parse_index: fn(&str) -> Option<u32>,
) -> Result<Vec<(u32, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| PipelineError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        if let Some(index) = entry.file_name().to_str().and_then(parse_index) {
            files.push((index, entry.path()));
        }
    }

    files.sort_by_key(|(index, _)| *index);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_name_round_trip() {
        assert_eq!(parse_input_index(&input_file_name(42)), Some(42));
        assert_eq!(parse_output_index("output7"), Some(7));
    }

    #[test]
    fn test_rejects_lookalike_names() {
        assert_eq!(parse_input_index("input.txt"), None);
        assert_eq!(parse_input_index("input12.txt.bak"), None);
        assert_eq!(parse_input_index("myinput3.txt"), None);
        assert_eq!(parse_output_index("output3.txt"), None);
        assert_eq!(parse_output_index("errors12_3"), None);
    }

    #[test]
    fn test_indexed_files_sorted_numerically() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["output10", "output2", "output1", "notes.txt"] {
            fs::write(temp_dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(temp_dir.path().join("output99")).unwrap();

        let files = indexed_files(temp_dir.path(), parse_output_index).unwrap();
        let indices: Vec<u32> = files.iter().map(|(index, _)| *index).collect();

        assert_eq!(indices, vec![1, 2, 10]);
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("0009");

        let error = indexed_files(&missing, parse_input_index).unwrap_err();
        assert!(error.to_string().contains("0009"));
    }
}
