pub mod config;
pub mod converter;
pub mod naming;
pub mod processor;
pub mod scanner;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use converter::{
    locate_binary, ConversionJob, ConversionResult, Converter, ConverterConfig, ConverterError,
    FfmpegConverter, MediaInfo, AUDIO_EXTENSIONS,
};
pub use processor::{
    BatchProcessor, FileFailure, ProcessorConfig, ProcessorError, RunEvent, RunReport,
    TARGET_EXTENSION,
};
pub use scanner::{scan_audio_files, ScanError};
