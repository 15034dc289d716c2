use super::{types::Config, ConfigError};

/// Log levels ffmpeg accepts for `-loglevel`.
const FFMPEG_LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

/// Validate configuration
/// Currently validates:
/// - Target sample rate is non-zero
/// - Conversion timeout is non-zero
/// - FFmpeg log level is one ffmpeg understands
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.processor.sample_rate_hz == 0 {
        return Err(ConfigError::ValidationError(
            "processor.sample_rate_hz cannot be 0".to_string(),
        ));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    if !FFMPEG_LOG_LEVELS.contains(&config.converter.ffmpeg_log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "converter.ffmpeg_log_level must be one of {:?}",
            FFMPEG_LOG_LEVELS
        )));
    }

    Ok(())
}
