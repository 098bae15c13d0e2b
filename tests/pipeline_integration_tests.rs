mod common;

use common::MtiTree;
use mti_pipeline::events::{PipelineEvent, RecordingObserver, SkipReason};
use mti_pipeline::ingest::{ingest_outputs, MemoryAnnotationSink};
use mti_pipeline::models::{NOT_APPLICABLE_DESCRIPTOR, NO_TERMS_SUGGESTED};
use mti_pipeline::reconcile::reconcile;
use mti_pipeline::scheduler::{resubmit_failed, submit_batch, JobArraySpec, RecordingRunner};
use mti_pipeline::PipelineError;

#[tokio::test]
async fn test_resubmits_exactly_the_undersized_outputs() {
    let tree = MtiTree::new();
    tree.write_output_of_size("0001", 2, 5_000);
    tree.write_output_of_size("0001", 5, 25_000);
    tree.write_output_of_size("0001", 9, 100);
    let runner = RecordingRunner::new();
    let observer = RecordingObserver::new();

    let command = resubmit_failed("0001", &tree.scheduler(), &tree.mti, &runner, &observer)
        .await
        .unwrap()
        .expect("failed outputs should be resubmitted");

    assert_eq!(command.job_spec, JobArraySpec::Indices(vec![2, 9]));
    assert_eq!(command.args[1], "myArray[2,9]%1");
    assert_eq!(runner.commands().len(), 1);
    assert!(observer.events().contains(&PipelineEvent::FailedOutputsDetected {
        subdir: "0001".to_string(),
        indices: vec![2, 9],
    }));
}

#[tokio::test]
async fn test_complete_outputs_issue_no_command() {
    let tree = MtiTree::new();
    for index in [1, 2, 3] {
        tree.write_output_of_size("0001", index, 20_000 + index as usize);
    }
    let runner = RecordingRunner::new();

    let result = resubmit_failed(
        "0001",
        &tree.scheduler(),
        &tree.mti,
        &runner,
        &RecordingObserver::new(),
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert!(runner.commands().is_empty());
}

#[tokio::test]
async fn test_submit_first_directory_starts_at_one() {
    let tree = MtiTree::new();
    for index in 1..=99 {
        tree.write_input("0001", index, &["\"1\"|Binding to receptor"]);
    }
    let runner = RecordingRunner::new();

    let command = submit_batch(
        "0001",
        &tree.scheduler(),
        &tree.mti,
        &runner,
        &RecordingObserver::new(),
    )
    .await
    .unwrap();

    assert_eq!(command.job_spec, JobArraySpec::Range { first: 1, last: 99 });
    let job_command = command.args.last().unwrap();
    assert!(job_command.contains("GenericBatchUser --email curator@example.org --singleLinePMID"));
    assert!(job_command.contains("input${LSB_JOBINDEX}.txt"));
    assert!(job_command.contains("> "));
}

#[tokio::test]
async fn test_submit_without_inputs_fails() {
    let tree = MtiTree::new();
    let runner = RecordingRunner::new();

    let result = submit_batch(
        "0004",
        &tree.scheduler(),
        &tree.mti,
        &runner,
        &RecordingObserver::new(),
    )
    .await;

    // The subdirectory does not exist at all
    assert!(matches!(result, Err(PipelineError::Io { .. })));
    assert!(runner.commands().is_empty());
}

#[tokio::test]
async fn test_ingests_annotations_and_sentinels() {
    let tree = MtiTree::new();
    tree.write_output(
        "0001",
        1,
        &[
            "\"123\"|Cancer*|C0006826|850|MH||general|RC|D000123",
            "\"456\"||||",
        ],
    );
    let sink = MemoryAnnotationSink::new();
    let observer = RecordingObserver::new();

    let summary = ingest_outputs(&tree.mti.output_subdir("0001"), &sink, &observer)
        .await
        .unwrap();

    assert_eq!(summary.annotations, 1);
    assert_eq!(summary.sentinels, 1);
    assert_eq!(summary.skipped(), 0);

    let rows = sink.rows();
    assert_eq!(rows.len(), 2);

    let annotation = &rows[0];
    assert_eq!(annotation.assay_id, 123);
    assert_eq!(annotation.descriptor_text.as_deref(), Some("Cancer"));
    assert_eq!(annotation.umls_id.as_deref(), Some("C0006826"));
    assert_eq!(annotation.score, Some(850));
    assert_eq!(annotation.term_type.as_deref(), Some("MH"));
    assert_eq!(annotation.paths.as_deref(), Some("RC"));
    assert_eq!(annotation.descriptor_ui.as_deref(), Some("D000123"));
    assert!(annotation.comments.is_none());

    let sentinel = &rows[1];
    assert_eq!(sentinel.assay_id, 456);
    assert_eq!(sentinel.descriptor_ui.as_deref(), Some(NOT_APPLICABLE_DESCRIPTOR));
    assert_eq!(sentinel.comments.as_deref(), Some(NO_TERMS_SUGGESTED));
}

#[tokio::test]
async fn test_bad_lines_are_skipped_and_the_file_continues() {
    let tree = MtiTree::new();
    tree.write_output(
        "0001",
        1,
        &[
            "\"10\"|Neoplasms|C0027651",
            "ERROR",
            "\"11\"|Humans|C0086418|500|CT||x|B01|D006801",
            "",
            "Resource usage summary:",
        ],
    );
    let sink = MemoryAnnotationSink::new();
    let observer = RecordingObserver::new();

    let summary = ingest_outputs(&tree.mti.output_subdir("0001"), &sink, &observer)
        .await
        .unwrap();

    assert_eq!(summary.annotations, 1);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.error_lines, 1);
    assert_eq!(summary.unparseable, 1);
    assert_eq!(sink.rows()[0].assay_id, 11);

    let skipped = observer.skipped_lines();
    assert_eq!(skipped.len(), 3);
    assert_eq!(skipped[0].0, 1);
    assert!(matches!(skipped[0].1, SkipReason::Malformed(_)));
    assert_eq!(skipped[1], (2, SkipReason::ErrorReported));
    assert_eq!(skipped[2], (5, SkipReason::Unparseable));
}

#[tokio::test]
async fn test_reconcile_finds_assays_lost_to_error_lines() {
    let tree = MtiTree::new();
    tree.write_input("0001", 1, &["\"10\"|a", "\"11\"|b", "\"12\"|c"]);
    tree.write_output(
        "0001",
        1,
        &[
            "\"10\"|Neoplasms|C0027651|700|MH||x|C04|D009369",
            "ERROR",
            "\"12\"||||",
        ],
    );

    let report = reconcile(
        &tree.mti.input_subdir("0001"),
        &tree.mti.output_subdir("0001"),
    )
    .await
    .unwrap();

    assert_eq!(report.expected, 3);
    assert_eq!(report.returned, 2);
    assert_eq!(report.missing, vec![11]);
    assert!(report.unexpected.is_empty());
}
