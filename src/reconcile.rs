//! Compares the assay ids sent to MTI with the ids that came back.
//!
//! MTI occasionally answers `ERROR` for an assay; those lines are skipped at
//! ingestion, so the only way to find the affected assays is to diff the
//! input files against the output files of the same subdirectory.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::file_layout::{indexed_files, parse_input_index, parse_output_index};
use crate::ingest::{parse_output_line, ParsedLine};

/// Result of comparing one input subdirectory with its outputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Distinct assay ids written to input files
    pub expected: usize,
    /// Distinct assay ids with at least one annotation or sentinel line
    pub returned: usize,
    /// Ids sent but never answered, ascending
    pub missing: Vec<i64>,
    /// Ids answered but never sent, ascending
    pub unexpected: Vec<i64>,
}

impl ReconciliationReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Assay id of an input line (`"<id>"|<description>`)
fn input_line_id(line: &str) -> Option<i64> {
    line.split('|').next()?.trim().trim_matches('"').parse().ok()
}

async fn read_lossy(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn input_ids(input_dir: &Path) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    for (_, path) in indexed_files(input_dir, parse_input_index)? {
        ids.extend(read_lossy(&path).await?.lines().filter_map(input_line_id));
    }
    Ok(ids)
}

async fn output_ids(output_dir: &Path) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    for (_, path) in indexed_files(output_dir, parse_output_index)? {
        for line in read_lossy(&path).await?.lines() {
            match parse_output_line(line) {
                ParsedLine::Annotation(record) => {
                    ids.insert(record.assay_id);
                }
                ParsedLine::NoTermsSuggested(sentinel) => {
                    ids.insert(sentinel.assay_id);
                }
                ParsedLine::Blank | ParsedLine::Skipped(_) => {}
            }
        }
    }
    Ok(ids)
}

/// Diff the assay ids of `input_dir` against those answered in `output_dir`
pub async fn reconcile(input_dir: &Path, output_dir: &Path) -> Result<ReconciliationReport> {
    let expected = input_ids(input_dir).await?;
    let returned = output_ids(output_dir).await?;

    let report = ReconciliationReport {
        expected: expected.len(),
        returned: returned.len(),
        missing: expected.difference(&returned).copied().collect(),
        unexpected: returned.difference(&expected).copied().collect(),
    };

    if report.is_complete() {
        crate::log_pipeline!(info, "All assay ids answered",
            input_dir: input_dir,
            expected: report.expected
        );
    } else {
        crate::log_pipeline!(warn, "Assay ids missing from outputs",
            input_dir: input_dir,
            expected: report.expected,
            missing: report.missing.len()
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_input_line_id() {
        assert_eq!(input_line_id("\"42\"|Binding to prostate receptor"), Some(42));
        assert_eq!(input_line_id(""), None);
        assert_eq!(input_line_id("garbage"), None);
    }

    #[tokio::test]
    async fn test_reports_missing_and_unexpected_ids() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = temp_dir.path().join("inputfiles/0001");
        let outputs = temp_dir.path().join("outputfiles/0001");
        fs::create_dir_all(&inputs).unwrap();
        fs::create_dir_all(&outputs).unwrap();

        fs::write(inputs.join("input1.txt"), "\"1\"|a\n\"2\"|b\n").unwrap();
        fs::write(inputs.join("input2.txt"), "\"3\"|c\n").unwrap();
        fs::write(
            outputs.join("output1"),
            "\"1\"|Neoplasms|C0027651|700|MH||x|C04|D009369\n\
             \"1\"|Humans|C0086418|500|CT||x|B01|D006801\n\
             ERROR\n",
        )
        .unwrap();
        fs::write(outputs.join("output2"), "\"3\"||||\n\"8\"||||\n").unwrap();

        let report = reconcile(&inputs, &outputs).await.unwrap();

        assert_eq!(report.expected, 3);
        assert_eq!(report.returned, 3);
        assert_eq!(report.missing, vec![2]);
        assert_eq!(report.unexpected, vec![8]);
        assert!(!report.is_complete());
    }
}
