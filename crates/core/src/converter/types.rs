//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File extensions FFmpeg can decode that this tool treats as audio.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "aac", "m4a", "flac", "ogg", "wma", "aiff", "alac",
];

/// A conversion request.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Target sample rate in Hz.
    pub sample_rate_hz: u32,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Conversion duration in milliseconds.
    pub duration_ms: u64,
}

/// Information about an audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File path.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Container format (e.g. "mp3", "wav").
    pub format: String,
    /// Audio codec (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Audio bitrate in kbps (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    /// Sample rate in Hz (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
    /// Number of channels (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
}
