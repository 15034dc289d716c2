//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Install prefixes probed when a binary is not on PATH.
const COMMON_INSTALL_PREFIXES: &[&str] = &[
    "/usr/local/bin",
    "/usr/bin",
    "/opt/homebrew/bin",
    "/opt/local/bin",
];

/// Resolves a binary by searching PATH, then well-known install prefixes.
///
/// Falls back to the bare name so the OS gets a final chance to resolve it
/// at spawn time.
pub fn locate_binary(name: &str) -> PathBuf {
    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return candidate;
            }
        }
    }

    for prefix in COMMON_INSTALL_PREFIXES {
        let candidate = Path::new(prefix).join(name);
        if candidate.is_file() {
            return candidate;
        }
    }

    PathBuf::from(name)
}

/// Configuration for the FFmpeg-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Timeout for a single conversion in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose,
    /// debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional ffmpeg arguments inserted before the output path.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,
}

fn default_ffmpeg_path() -> PathBuf {
    locate_binary("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    locate_binary("ffprobe")
}

fn default_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "warning".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the ffmpeg log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.ffmpeg_log_level = level.into();
        self
    }
}
