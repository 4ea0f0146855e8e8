//! Error types for gen-merge.
//!
//! The pipeline has two failure kinds: [`AnalysisError`] while reading and
//! classifying the Go package, and [`RenderError`] while expanding the merge
//! template. Configuration and output errors wrap around them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gen-merge operations.
pub type GenMergeResult<T> = Result<T, GenMergeError>;

/// Main error type for gen-merge operations.
#[derive(Debug, Error)]
pub enum GenMergeError {
    /// Error while extracting the package model.
    #[error("Failed to analyse package: {0}")]
    Analysis(#[from] AnalysisError),

    /// Error while rendering the merge file.
    #[error("Failed to render merge functions: {0}")]
    Render(#[from] RenderError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Invalid combination of options.
    #[error("Invalid usage: {0}")]
    Usage(String),

    /// The checked-in artifact differs from a fresh generation.
    #[error("Generated file is out of date: {}", .path.display())]
    Stale { path: PathBuf },
}

/// Error raised while scanning, parsing or classifying the input package.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input directory does not exist.
    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// No eligible Go files in the directory.
    #[error("No Go source files found in: {}", .path.display())]
    NoSourceFiles { path: PathBuf },

    /// Invalid exclude pattern.
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error reading a file.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// The Go grammar could not be loaded into the parser.
    #[error("Failed to initialise Go parser: {0}")]
    Grammar(String),

    /// Syntax error in Go source.
    #[error("Syntax error in {}:{line}:{column}: {message}", .file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// A file has no `package` clause.
    #[error("Missing package clause in {}", .file.display())]
    MissingPackageClause { file: PathBuf },

    /// Files in the directory declare different packages.
    #[error(
        "Multiple packages in one directory: '{first}' and '{second}' (declared in {})",
        .file.display()
    )]
    MultiplePackages {
        first: String,
        second: String,
        file: PathBuf,
    },

    /// A struct field's declared type has no zero-value classification.
    #[error(
        "Unsupported field shape in {}:{line}: {struct_name}.{field} has {shape} type",
        .file.display()
    )]
    UnsupportedFieldShape {
        file: PathBuf,
        line: usize,
        struct_name: String,
        field: String,
        shape: String,
    },
}

/// Error raised while expanding the merge template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The model carries no package name.
    #[error("Package model has no package name")]
    MissingPackage,

    /// A struct descriptor has an empty name.
    #[error("Struct descriptor has an empty name")]
    EmptyStructName,

    /// A field descriptor cannot be spliced into the template.
    #[error("Field '{field}' of struct '{struct_name}' {reason}")]
    InvalidField {
        struct_name: String,
        field: String,
        reason: &'static str,
    },

    /// Formatting into the output buffer failed.
    #[error("Template expansion failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to the output stream.
    #[error("Failed to write to output stream: {0}")]
    Stream(#[source] std::io::Error),
}

impl AnalysisError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no source files error.
    pub fn no_source_files(path: PathBuf) -> Self {
        Self::NoSourceFiles { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a syntax error with location information.
    pub fn parse(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an unsupported field shape error.
    pub fn unsupported_field(
        file: PathBuf,
        line: usize,
        struct_name: impl Into<String>,
        field: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldShape {
            file,
            line,
            struct_name: struct_name.into(),
            field: field.into(),
            shape: shape.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}
