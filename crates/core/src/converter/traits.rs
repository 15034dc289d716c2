//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult, MediaInfo, AUDIO_EXTENSIONS};

/// A converter that can transcode audio files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Probes an audio file to get its information.
    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError>;

    /// Converts an audio file according to the job specification.
    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;

    /// Returns the input extensions this converter accepts.
    fn supported_input_formats(&self) -> &[&str] {
        AUDIO_EXTENSIONS
    }
}
