//! Output writer for the generated merge file.
//!
//! Files are replaced atomically: the content goes to a sibling temporary file
//! which is then renamed over the target, so a failed run never leaves a
//! truncated artifact behind.

use crate::error::{GenMergeResult, WriteError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// The file already held exactly this content and was left alone.
    Unchanged {
        /// Path to the existing file.
        path: PathBuf,
    },
    /// Content went to a stream.
    Streamed {
        /// Number of bytes written.
        bytes: usize,
    },
}

/// Outcome of comparing a checked-in artifact with fresh output.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// The file matches byte for byte.
    UpToDate,
    /// The file differs.
    Stale,
    /// The file does not exist.
    Missing,
}

/// Writer for generated output.
#[derive(Debug, Default)]
pub struct FileWriter;

impl FileWriter {
    /// Create a new file writer.
    pub fn new() -> Self {
        Self
    }

    /// Write content to a stream in a single call.
    pub fn write_stream<W: Write>(&self, writer: &mut W, content: &str) -> GenMergeResult<WriteResult> {
        writer
            .write_all(content.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(WriteError::Stream)?;

        Ok(WriteResult::Streamed {
            bytes: content.len(),
        })
    }

    /// Atomically replace `path` with `content`.
    ///
    /// Identical existing content is not rewritten.
    pub fn write(&self, path: &Path, content: &str) -> GenMergeResult<WriteResult> {
        if let Ok(existing) = std::fs::read_to_string(path) {
            if existing == content {
                tracing::debug!(path = %path.display(), "output unchanged");
                return Ok(WriteResult::Unchanged {
                    path: path.to_path_buf(),
                });
            }
        }

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let temp_path = temp_path_for(path);
        let result = std::fs::write(&temp_path, content)
            .and_then(|()| std::fs::rename(&temp_path, path));

        if let Err(e) = result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(WriteError::WriteFile {
                path: path.to_path_buf(),
                source: e,
            }
            .into());
        }

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Compare an existing file with freshly generated content.
    pub fn check(&self, path: &Path, content: &str) -> GenMergeResult<CheckResult> {
        match std::fs::read_to_string(path) {
            Ok(existing) if existing == content => Ok(CheckResult::UpToDate),
            Ok(_) => Ok(CheckResult::Stale),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CheckResult::Missing),
            Err(e) => Err(WriteError::WriteFile {
                path: path.to_path_buf(),
                source: e,
            }
            .into()),
        }
    }
}

impl WriteResult {
    /// Get the number of bytes written (0 when unchanged).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } | WriteResult::Streamed { bytes } => *bytes,
            WriteResult::Unchanged { .. } => 0,
        }
    }
}

/// `dir/.name.gen-merge.tmp` next to the target, so the rename stays on one
/// filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.gen-merge.tmp", file_name))
}
