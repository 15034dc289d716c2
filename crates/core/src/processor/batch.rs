//! Batch processor implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::converter::{ConversionJob, Converter};
use crate::naming::{sanitize_stem, unique_destination};
use crate::scanner::{scan_audio_files, ScanError};

use super::config::ProcessorConfig;
use super::types::{FileFailure, RunEvent, RunReport, TARGET_EXTENSION};

/// Error type for batch operations.
///
/// Per-file failures are not errors at this level; they are accumulated in
/// the [`RunReport`]. A `ProcessorError` aborts the whole run.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Candidate enumeration failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The configured error log could not be opened.
    #[error("Failed to open error log {path}: {source}")]
    ErrorLogFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Drives a whole directory tree through conversion, one file at a time.
///
/// Each candidate is converted, verified, and cleaned up before the next
/// begins. Counters live in the returned [`RunReport`], not in the
/// processor.
pub struct BatchProcessor<C: Converter> {
    config: ProcessorConfig,
    converter: C,
}

impl<C: Converter> BatchProcessor<C> {
    /// Creates a new batch processor.
    pub fn new(config: ProcessorConfig, converter: C) -> Self {
        Self { config, converter }
    }

    /// Returns the converter backing this processor.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Processes every candidate under `root` and returns the tally.
    pub async fn run(&self, root: &Path) -> Result<RunReport, ProcessorError> {
        self.run_inner(root, None).await
    }

    /// Same as [`run`](Self::run), emitting per-file lifecycle events.
    ///
    /// If the receiver is dropped, processing continues without events.
    pub async fn run_with_progress(
        &self,
        root: &Path,
        progress_tx: mpsc::Sender<RunEvent>,
    ) -> Result<RunReport, ProcessorError> {
        self.run_inner(root, Some(progress_tx)).await
    }

    async fn run_inner(
        &self,
        root: &Path,
        progress: Option<mpsc::Sender<RunEvent>>,
    ) -> Result<RunReport, ProcessorError> {
        let start = Instant::now();

        let candidates =
            scan_audio_files(root, self.converter.supported_input_formats()).await?;

        let mut error_log = match &self.config.error_log {
            Some(path) => Some(ErrorLog::open(path).await?),
            None => None,
        };

        let mut report = RunReport {
            converted: 0,
            failed: 0,
            skipped: 0,
            duration_ms: 0,
            error_log: self.config.error_log.clone(),
        };

        emit(
            &progress,
            RunEvent::Started {
                candidates: candidates.len(),
            },
        )
        .await;

        for input in &candidates {
            if has_target_extension(input) {
                report.skipped += 1;
                continue;
            }

            let dir = input.parent().unwrap_or(root);
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let output = unique_destination(dir, &sanitize_stem(&stem), TARGET_EXTENSION);

            emit(
                &progress,
                RunEvent::Converting {
                    input: input.clone(),
                    output: output.clone(),
                },
            )
            .await;

            match self.process_file(input, &output).await {
                Ok(()) => {
                    report.converted += 1;
                    tracing::info!(
                        "Converted {} to {}",
                        input.display(),
                        output.display()
                    );
                    emit(
                        &progress,
                        RunEvent::Converted {
                            input: input.clone(),
                            output: output.clone(),
                        },
                    )
                    .await;
                }
                Err(failure) => {
                    report.failed += 1;
                    tracing::warn!("Failed to convert {}: {}", input.display(), failure);
                    if let Some(log) = &mut error_log {
                        log.append(input, &failure).await;
                    }
                    emit(
                        &progress,
                        RunEvent::Failed {
                            input: input.clone(),
                            failure,
                        },
                    )
                    .await;
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Converts one candidate and performs the filesystem bookkeeping.
    async fn process_file(&self, input: &Path, output: &Path) -> Result<(), FileFailure> {
        let job = ConversionJob {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            sample_rate_hz: self.config.sample_rate_hz,
        };

        let result = match self.converter.convert(job).await {
            Ok(result) => result,
            Err(e) => {
                // No partial output may be left behind.
                remove_stale_output(output).await;
                return Err(FileFailure::Transcode {
                    reason: e.to_string(),
                });
            }
        };

        if result.output_size_bytes == 0 {
            remove_stale_output(output).await;
            return Err(FileFailure::EmptyOutput {
                output: output.to_path_buf(),
            });
        }

        if self.config.verify_output {
            self.verify_output(output).await?;
        }

        if !self.config.preserve_originals {
            if let Err(e) = fs::remove_file(input).await {
                tracing::warn!(
                    "Failed to remove source file {}: {}",
                    input.display(),
                    e
                );
                return Err(FileFailure::SourceCleanupFailed {
                    reason: e.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Probes the output and requires an audio stream at the target rate.
    async fn verify_output(&self, output: &Path) -> Result<(), FileFailure> {
        match self.converter.probe(output).await {
            Ok(info) if info.sample_rate_hz == Some(self.config.sample_rate_hz) => Ok(()),
            Ok(info) => {
                remove_stale_output(output).await;
                Err(FileFailure::VerificationFailed {
                    reason: format!(
                        "output sample rate is {:?}, expected {}",
                        info.sample_rate_hz, self.config.sample_rate_hz
                    ),
                })
            }
            Err(e) => {
                remove_stale_output(output).await;
                Err(FileFailure::VerificationFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Removes a failed or empty output file, if it was created at all.
async fn remove_stale_output(output: &Path) {
    if output.exists() {
        if let Err(e) = fs::remove_file(output).await {
            tracing::warn!(
                "Failed to remove stale output {}: {}",
                output.display(),
                e
            );
        }
    }
}

fn has_target_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(TARGET_EXTENSION))
        .unwrap_or(false)
}

async fn emit(progress: &Option<mpsc::Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = progress {
        let _ = tx.send(event).await;
    }
}

/// Append-only log collecting per-file failure details.
struct ErrorLog {
    file: fs::File,
}

impl ErrorLog {
    async fn open(path: &Path) -> Result<Self, ProcessorError> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| ProcessorError::ErrorLogFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self { file })
    }

    /// Writes one failure line; write problems are logged, not propagated.
    async fn append(&mut self, input: &Path, failure: &FileFailure) {
        let line = format!(
            "{} {} {}\n",
            chrono::Utc::now().to_rfc3339(),
            input.display(),
            failure
        );
        if let Err(e) = self.file.write_all(line.as_bytes()).await {
            tracing::warn!("Failed to write error log entry: {}", e);
        }
    }
}
