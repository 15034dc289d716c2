//! Batch run integration tests.
//!
//! These tests drive the batch processor with the mock converter over real
//! temp directories, verifying the filesystem bookkeeping:
//! - sources removed only after verified success
//! - failed and empty outputs cleaned up
//! - collision suffixes and placeholder names
//! - idempotent re-runs

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::sync::mpsc;

use wavebatch_core::{
    processor::{BatchProcessor, FileFailure, ProcessorConfig, RunEvent},
    testing::{fixtures, MockConverter},
};

/// Test helper bundling a processor, its mock converter, and a temp root.
struct TestHarness {
    processor: BatchProcessor<MockConverter>,
    converter: MockConverter,
    root: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    fn with_config(config: ProcessorConfig) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let converter = MockConverter::new();
        let processor = BatchProcessor::new(config, converter.clone());

        Self {
            processor,
            converter,
            root,
        }
    }

    fn root(&self) -> &Path {
        self.root.path()
    }

    fn create_source_file(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, b"not really audio").expect("Failed to create source file");
        path
    }
}

#[tokio::test]
async fn test_converts_and_removes_source() {
    let harness = TestHarness::new();
    let source = harness.create_source_file("song.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 1);
    assert_eq!(report.failed, 0);
    assert!(!source.exists());

    let output = harness.root().join("song.wav");
    assert!(output.exists());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
    assert_eq!(harness.converter.conversion_count().await, 1);
}

#[tokio::test]
async fn test_requests_configured_sample_rate() {
    let harness = TestHarness::with_config(ProcessorConfig::default().with_sample_rate(48_000));
    harness.create_source_file("song.mp3");

    harness.processor.run(harness.root()).await.unwrap();

    let jobs = harness.converter.recorded_jobs().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].sample_rate_hz, 48_000);
}

#[tokio::test]
async fn test_skips_files_already_at_target_extension() {
    let harness = TestHarness::new();
    let existing = harness.create_source_file("already.wav");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(harness.converter.conversion_count().await, 0);
    // Untouched, content included.
    assert_eq!(std::fs::read(&existing).unwrap(), b"not really audio");
}

#[tokio::test]
async fn test_failed_conversion_preserves_source() {
    let harness = TestHarness::new();
    let source = harness.create_source_file("noise.mp3");
    harness.converter.fail_on(&source).await;

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.failed, 1);
    assert!(source.exists());
    assert!(!harness.root().join("noise.wav").exists());
}

#[tokio::test]
async fn test_empty_output_is_removed_and_counted_as_error() {
    let harness = TestHarness::new();
    let source = harness.create_source_file("hollow.mp3");
    harness.converter.produce_empty_for(&source).await;

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.failed, 1);
    assert!(source.exists());
    assert!(!harness.root().join("hollow.wav").exists());
}

#[tokio::test]
async fn test_end_to_end_mixed_outcome() {
    let harness = TestHarness::new();
    let good = harness.create_source_file("song.mp3");
    let bad = harness.create_source_file("noise.mp3");
    harness.converter.fail_on(&bad).await;

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 1);
    assert_eq!(report.failed, 1);

    let output = harness.root().join("song.wav");
    assert!(output.exists());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
    assert!(!good.exists());

    assert!(bad.exists());
    assert!(!harness.root().join("noise.wav").exists());
}

#[tokio::test]
async fn test_collision_suffixes() {
    let harness = TestHarness::new();
    // Both sanitize to "song"; sorted order converts "Song!.mp3" first.
    harness.create_source_file("Song!.mp3");
    harness.create_source_file("song.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 2);
    assert!(harness.root().join("song.wav").exists());
    assert!(harness.root().join("song_1.wav").exists());
}

#[tokio::test]
async fn test_placeholder_name_and_suffix() {
    let harness = TestHarness::new();
    // Nothing survives sanitization for either name.
    harness.create_source_file("!!!.mp3");
    harness.create_source_file("---.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 2);
    assert!(harness.root().join("untitled.wav").exists());
    assert!(harness.root().join("untitled1.wav").exists());
}

#[tokio::test]
async fn test_sanitizes_cyrillic_names() {
    let harness = TestHarness::new();
    harness.create_source_file("Моя Песня.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 1);
    assert!(harness.root().join("moapesna.wav").exists());
}

#[tokio::test]
async fn test_converts_nested_directories() {
    let harness = TestHarness::new();
    harness.create_source_file("album/track.mp3");
    harness.create_source_file("album/disc2/track.flac");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 2);
    // Output lands beside each source.
    assert!(harness.root().join("album/track.wav").exists());
    assert!(harness.root().join("album/disc2/track.wav").exists());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let harness = TestHarness::new();
    harness.create_source_file("song.mp3");

    let first = harness.processor.run(harness.root()).await.unwrap();
    assert_eq!(first.converted, 1);

    let second = harness.processor.run(harness.root()).await.unwrap();
    assert_eq!(second.converted, 0);
    assert_eq!(second.failed, 0);
    // The first run's output is recognized and skipped, not reconverted.
    assert_eq!(second.skipped, 1);
    assert_eq!(harness.converter.conversion_count().await, 1);
}

#[tokio::test]
async fn test_preserve_originals_keeps_sources() {
    let harness =
        TestHarness::with_config(ProcessorConfig::default().with_preserved_originals());
    let source = harness.create_source_file("song.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 1);
    assert!(source.exists());
    assert!(harness.root().join("song.wav").exists());
}

#[tokio::test]
async fn test_progress_events_for_success_and_failure() {
    let harness = TestHarness::new();
    harness.create_source_file("song.mp3");
    let bad = harness.create_source_file("noise.mp3");
    harness.converter.fail_on(&bad).await;

    let (tx, mut rx) = mpsc::channel(16);
    let report = harness
        .processor
        .run_with_progress(harness.root(), tx)
        .await
        .unwrap();
    assert_eq!(report.converted, 1);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(events[0], RunEvent::Started { candidates: 2 }));
    let conversions = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Converting { .. }))
        .count();
    assert_eq!(conversions, 2);
    assert!(events
        .iter()
        .any(|e| matches!(e, RunEvent::Converted { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        RunEvent::Failed {
            failure: FileFailure::Transcode { .. },
            ..
        }
    )));
}

#[tokio::test]
async fn test_error_log_records_failures() {
    let log_dir = TempDir::new().unwrap();
    let log_path = log_dir.path().join("errors.log");
    let harness =
        TestHarness::with_config(ProcessorConfig::default().with_error_log(log_path.clone()));

    let bad = harness.create_source_file("noise.mp3");
    harness.converter.fail_on(&bad).await;

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.error_log, Some(log_path.clone()));

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("noise.mp3"));
    assert!(contents.contains("transcoder failed"));
}

#[tokio::test]
async fn test_verify_output_rejects_wrong_sample_rate() {
    let harness =
        TestHarness::with_config(ProcessorConfig::default().with_output_verification());
    let source = harness.create_source_file("song.mp3");

    // The output the processor will create probes at the wrong rate.
    let output = harness.root().join("song.wav");
    harness
        .converter
        .set_probe_result(&output, fixtures::media_info(&output, 22_050))
        .await;

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.failed, 1);
    assert!(source.exists());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_verify_output_accepts_target_sample_rate() {
    let harness =
        TestHarness::with_config(ProcessorConfig::default().with_output_verification());
    let source = harness.create_source_file("song.mp3");

    let report = harness.processor.run(harness.root()).await.unwrap();

    // Default mock probe reports 44100 Hz, matching the default target.
    assert_eq!(report.converted, 1);
    assert!(!source.exists());
    assert!(harness.root().join("song.wav").exists());
}

#[tokio::test]
async fn test_missing_root_aborts_run() {
    let harness = TestHarness::new();
    let missing = harness.root().join("nope");

    let result = harness.processor.run(&missing).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_directory_reports_zeroes() {
    let harness = TestHarness::new();

    let report = harness.processor.run(harness.root()).await.unwrap();

    assert_eq!(report.converted, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped, 0);
    assert!(report.is_clean());
}
