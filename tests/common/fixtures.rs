//! Throwaway MTI file trees for integration tests.

#![allow(dead_code)] // Not every test binary uses every helper

use mti_pipeline::config::{MtiConfig, SchedulerConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary `files_root` with the input/output/error layout under it
pub struct MtiTree {
    pub temp_dir: TempDir,
    pub mti: MtiConfig,
}

impl MtiTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mti = MtiConfig {
            mti_root: temp_dir.path().join("SKR_Web_API_V2_1"),
            files_root: temp_dir.path().join("examples"),
            inputfiles_dir: "inputfiles".to_string(),
            email: "curator@example.org".to_string(),
        };
        Self { temp_dir, mti }
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig::default()
    }

    pub fn write_input(&self, subdir: &str, index: u32, lines: &[&str]) {
        write_lines(&self.mti.input_subdir(subdir), &format!("input{index}.txt"), lines);
    }

    pub fn write_output(&self, subdir: &str, index: u32, lines: &[&str]) {
        write_lines(&self.mti.output_subdir(subdir), &format!("output{index}"), lines);
    }

    /// An output file of exactly `size` bytes
    pub fn write_output_of_size(&self, subdir: &str, index: u32, size: usize) {
        let dir = self.mti.output_subdir(subdir);
        fs::create_dir_all(&dir).expect("create output dir");
        fs::write(dir.join(format!("output{index}")), vec![b'x'; size]).expect("write output");
    }
}

fn write_lines(dir: &Path, name: &str, lines: &[&str]) {
    fs::create_dir_all(dir).expect("create dir");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(dir.join(name), content).expect("write file");
}
