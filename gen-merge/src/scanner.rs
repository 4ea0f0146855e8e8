//! Source file scanner for discovering the Go files of one package.
//!
//! Only files directly inside the package directory are considered. Test
//! files and files matching an exclude pattern are left out.

use crate::error::AnalysisError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering Go source files.
#[derive(Debug)]
pub struct SourceScanner {
    /// Package directory to scan.
    root: PathBuf,

    /// File name suffix marking test files.
    test_marker: String,

    /// Exclude patterns.
    excludes: Vec<glob::Pattern>,
}

impl SourceScanner {
    /// Create a new scanner for the given package directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            test_marker: "_test".to_string(),
            excludes: Vec::new(),
        }
    }

    /// Set the file name fragment that marks test files.
    pub fn with_test_marker(mut self, marker: impl Into<String>) -> Self {
        self.test_marker = marker.into();
        self
    }

    /// Add a glob pattern for files to skip.
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self, AnalysisError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| AnalysisError::invalid_pattern(pattern, e.to_string()))?;
        self.excludes.push(glob_pattern);
        Ok(self)
    }

    /// Scan the directory and return its Go files sorted by path.
    pub fn scan(&self) -> Result<Vec<SourceFile>, AnalysisError> {
        if !self.root.is_dir() {
            return Err(AnalysisError::not_found(self.root.clone()));
        }

        let mut files = Vec::new();

        // A Go package is one directory; subdirectories are other packages.
        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(1))
            .standard_filters(false)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if path.extension().map_or(true, |ext| ext != "go") {
                continue;
            }

            let relative = self.relative_path(path);

            // The go tool ignores these too.
            if is_hidden(path) {
                tracing::debug!(file = %relative.display(), "skipping hidden file");
                continue;
            }

            if self.is_test_file(path) {
                tracing::debug!(file = %relative.display(), "skipping test file");
                continue;
            }

            if self.excludes.iter().any(|p| p.matches_path(&relative)) {
                tracing::debug!(file = %relative.display(), "skipping excluded file");
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path: relative,
                content,
            });
        }

        if files.is_empty() {
            return Err(AnalysisError::no_source_files(self.root.clone()));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    fn is_test_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| !self.test_marker.is_empty() && name.contains(&self.test_marker))
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name.starts_with('_'))
}
