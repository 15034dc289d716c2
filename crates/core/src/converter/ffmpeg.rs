//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, MediaInfo};

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds ffmpeg arguments for a conversion job.
    fn build_args(&self, job: &ConversionJob) -> Vec<String> {
        let mut args = vec![
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
            "-ar".to_string(),
            job.sample_rate_hz.to_string(),
        ];

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());
        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    /// Parses ffprobe JSON output into MediaInfo.
    fn parse_probe_output(path: &Path, output: &str) -> Result<MediaInfo, ConverterError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: String,
            duration: Option<String>,
            size: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: String,
            codec_name: Option<String>,
            bit_rate: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| ConverterError::ParseError {
                reason: format!("Failed to parse ffprobe output: {}", e),
            })?;

        let duration_secs = probe
            .format
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let size_bytes = probe
            .format
            .size
            .as_ref()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

        let format_name = probe
            .format
            .format_name
            .split(',')
            .next()
            .unwrap_or("unknown");

        Ok(MediaInfo {
            path: path.to_path_buf(),
            size_bytes,
            duration_secs,
            format: format_name.to_string(),
            codec: audio_stream.and_then(|s| s.codec_name.clone()),
            bitrate_kbps: audio_stream
                .and_then(|s| s.bit_rate.as_ref())
                .and_then(|b| b.parse::<u32>().ok())
                .map(|b| b / 1000),
            sample_rate_hz: audio_stream
                .and_then(|s| s.sample_rate.as_ref())
                .and_then(|r| r.parse::<u32>().ok()),
            channels: audio_stream.and_then(|s| s.channels),
        })
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout)
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let args = self.build_args(&job);

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let stderr = child.stderr.take();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut stderr_output = String::new();
            if let Some(mut pipe) = stderr {
                pipe.read_to_string(&mut stderr_output).await?;
            }
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, stderr_output))
        })
        .await;

        match result {
            Ok(Ok((status, stderr_output))) => {
                if !status.success() {
                    return Err(ConverterError::conversion_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if stderr_output.trim().is_empty() {
                            None
                        } else {
                            Some(stderr_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => return Err(ConverterError::Io(e)),
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(ConversionResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        // Check ffmpeg exists
        let ffmpeg_result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        // Check ffprobe exists
        let ffprobe_result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffprobe_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        Ok(())
    }
}
