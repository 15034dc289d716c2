//! Converter module for transcoding audio files.
//!
//! This module provides the `Converter` trait and the FFmpeg-backed
//! implementation used to turn candidate audio files into WAV output.
//!
//! # Example
//!
//! ```ignore
//! use wavebatch_core::converter::{Converter, ConversionJob, FfmpegConverter};
//!
//! let converter = FfmpegConverter::with_defaults();
//!
//! // Validate ffmpeg is available
//! converter.validate().await?;
//!
//! let result = converter
//!     .convert(ConversionJob {
//!         input_path: "/music/song.mp3".into(),
//!         output_path: "/music/song.wav".into(),
//!         sample_rate_hz: 44100,
//!     })
//!     .await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::{locate_binary, ConverterConfig};
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{ConversionJob, ConversionResult, MediaInfo, AUDIO_EXTENSIONS};
