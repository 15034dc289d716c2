//! Directory scanning for conversion candidates.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

/// Errors that can occur while enumerating candidates.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("Scan root is not a directory: {path}")]
    RootNotADirectory { path: PathBuf },

    /// A directory in the tree could not be read.
    #[error("Failed to read directory {path}: {source}")]
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Returns true when the path carries one of the given extensions,
/// matched case-insensitively.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|known| e.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Recursively collects files under `root` whose extension is in
/// `extensions`.
///
/// The result is sorted by path so processing order is deterministic
/// regardless of how the platform enumerates directories.
pub async fn scan_audio_files(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut pending = vec![root.to_path_buf()];
    let mut found = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| ScanError::ReadDirFailed {
                path: dir.clone(),
                source: e,
            })?;

        while let Some(entry) =
            entries
                .next_entry()
                .await
                .map_err(|e| ScanError::ReadDirFailed {
                    path: dir.clone(),
                    source: e,
                })?
        {
            let path = entry.path();
            let file_type =
                entry
                    .file_type()
                    .await
                    .map_err(|e| ScanError::ReadDirFailed {
                        path: dir.clone(),
                        source: e,
                    })?;

            if file_type.is_dir() {
                pending.push(path);
            } else if has_extension(&path, extensions) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
