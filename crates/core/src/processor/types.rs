//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Extension all candidates are converted to.
pub const TARGET_EXTENSION: &str = "wav";

/// Result of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Files converted, verified, and cleaned up.
    pub converted: u64,
    /// Files that failed to convert.
    pub failed: u64,
    /// Candidates skipped because they were already at the target extension.
    pub skipped: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Error log path, when one was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<PathBuf>,
}

impl RunReport {
    /// Whether the run completed without any per-file failures.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Why a single file failed to convert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileFailure {
    /// The transcoder invocation itself failed.
    Transcode { reason: String },
    /// The transcoder reported success but produced an empty file.
    EmptyOutput { output: PathBuf },
    /// The converted output did not pass verification.
    VerificationFailed { reason: String },
    /// Conversion succeeded but the source file could not be removed.
    SourceCleanupFailed { reason: String },
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transcode { reason } => write!(f, "transcoder failed: {}", reason),
            Self::EmptyOutput { output } => {
                write!(f, "empty output produced: {}", output.display())
            }
            Self::VerificationFailed { reason } => {
                write!(f, "output verification failed: {}", reason)
            }
            Self::SourceCleanupFailed { reason } => {
                write!(f, "source cleanup failed: {}", reason)
            }
        }
    }
}

/// Progress event emitted while a batch run is in flight.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Scanning finished, the conversion loop is starting.
    Started { candidates: usize },
    /// A file is being converted.
    Converting { input: PathBuf, output: PathBuf },
    /// A file was converted and its bookkeeping completed.
    Converted { input: PathBuf, output: PathBuf },
    /// A file failed to convert.
    Failed {
        input: PathBuf,
        failure: FileFailure,
    },
}
