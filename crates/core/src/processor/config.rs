//! Configuration for the batch processor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a batch conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Target sample rate for output files in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: u32,

    /// Keep source files after successful conversion.
    #[serde(default)]
    pub preserve_originals: bool,

    /// Probe converted output and require a decodable stream at the target
    /// sample rate.
    #[serde(default)]
    pub verify_output: bool,

    /// File to append per-file failure details to.
    #[serde(default)]
    pub error_log: Option<PathBuf>,
}

fn default_sample_rate() -> u32 {
    44_100
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate(),
            preserve_originals: false,
            verify_output: false,
            error_log: None,
        }
    }
}

impl ProcessorConfig {
    /// Sets the target sample rate.
    pub fn with_sample_rate(mut self, sample_rate_hz: u32) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Keeps source files after successful conversion.
    pub fn with_preserved_originals(mut self) -> Self {
        self.preserve_originals = true;
        self
    }

    /// Enables probe-based output verification.
    pub fn with_output_verification(mut self) -> Self {
        self.verify_output = true;
        self
    }

    /// Sets the error log path.
    pub fn with_error_log(mut self, path: PathBuf) -> Self {
        self.error_log = Some(path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert_eq!(config.sample_rate_hz, 44_100);
        assert!(!config.preserve_originals);
        assert!(!config.verify_output);
        assert!(config.error_log.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::default()
            .with_sample_rate(48_000)
            .with_preserved_originals()
            .with_error_log(PathBuf::from("/tmp/errors.log"));

        assert_eq!(config.sample_rate_hz, 48_000);
        assert!(config.preserve_originals);
        assert_eq!(config.error_log, Some(PathBuf::from("/tmp/errors.log")));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ProcessorConfig = toml::from_str("").unwrap();
        assert_eq!(config.sample_rate_hz, 44_100);
    }
}
