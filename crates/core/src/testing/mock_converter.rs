//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, Converter, ConverterError, MediaInfo,
};

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion jobs for assertions
/// - Script per-input failures and empty outputs
/// - Control probe results
///
/// Unlike a pure stub, successful conversions write real bytes to the
/// output path so the processor's filesystem bookkeeping (size checks,
/// source deletion, stale-output cleanup) is exercised against the actual
/// filesystem.
///
/// # Example
///
/// ```rust,ignore
/// use wavebatch_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_on("/music/corrupt.mp3").await;
///
/// // Convert...
///
/// let jobs = converter.recorded_jobs().await;
/// assert_eq!(jobs.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversion jobs.
    jobs: Arc<RwLock<Vec<ConversionJob>>>,
    /// Inputs whose conversion fails without producing output.
    fail_inputs: Arc<RwLock<HashSet<PathBuf>>>,
    /// Inputs whose conversion "succeeds" with an empty output file.
    empty_inputs: Arc<RwLock<HashSet<PathBuf>>>,
    /// Pre-configured probe results by path.
    probe_results: Arc<RwLock<HashMap<PathBuf, MediaInfo>>>,
    /// Bytes written to the output path on success.
    output_payload: Arc<RwLock<Vec<u8>>>,
    /// Whether validate() should report a missing binary.
    fail_validate: Arc<RwLock<bool>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            fail_inputs: Arc::new(RwLock::new(HashSet::new())),
            empty_inputs: Arc::new(RwLock::new(HashSet::new())),
            probe_results: Arc::new(RwLock::new(HashMap::new())),
            output_payload: Arc::new(RwLock::new(
                b"RIFF0000WAVEfmt mock audio payload".to_vec(),
            )),
            fail_validate: Arc::new(RwLock::new(false)),
        }
    }

    /// Get all recorded conversion jobs.
    pub async fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Script a transcoder failure for the given input path.
    pub async fn fail_on(&self, input: impl AsRef<Path>) {
        self.fail_inputs
            .write()
            .await
            .insert(input.as_ref().to_path_buf());
    }

    /// Script an empty output file for the given input path.
    pub async fn produce_empty_for(&self, input: impl AsRef<Path>) {
        self.empty_inputs
            .write()
            .await
            .insert(input.as_ref().to_path_buf());
    }

    /// Set a probe result for a specific path.
    pub async fn set_probe_result(&self, path: impl AsRef<Path>, info: MediaInfo) {
        self.probe_results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), info);
    }

    /// Set the bytes written on successful conversion.
    pub async fn set_output_payload(&self, payload: Vec<u8>) {
        *self.output_payload.write().await = payload;
    }

    /// Make validate() report a missing ffmpeg binary.
    pub async fn set_validate_failure(&self, fail: bool) {
        *self.fail_validate.write().await = fail;
    }

    /// Create a default MediaInfo for probing unscripted paths.
    fn create_default_info(path: &Path) -> MediaInfo {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown");

        MediaInfo {
            path: path.to_path_buf(),
            size_bytes: 1024,
            duration_secs: 180.0,
            format: extension.to_string(),
            codec: Some("pcm_s16le".to_string()),
            bitrate_kbps: Some(1411),
            sample_rate_hz: Some(44100),
            channels: Some(2),
        }
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if let Some(info) = self.probe_results.read().await.get(path) {
            return Ok(info.clone());
        }

        Ok(Self::create_default_info(path))
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        self.jobs.write().await.push(job.clone());

        if self.fail_inputs.read().await.contains(&job.input_path) {
            return Err(ConverterError::conversion_failed(
                "scripted transcoder failure",
                None,
            ));
        }

        let payload = if self.empty_inputs.read().await.contains(&job.input_path) {
            Vec::new()
        } else {
            self.output_payload.read().await.clone()
        };

        tokio::fs::write(&job.output_path, &payload).await?;

        Ok(ConversionResult {
            output_path: job.output_path,
            output_size_bytes: payload.len() as u64,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if *self.fail_validate.read().await {
            return Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            });
        }
        Ok(())
    }
}
