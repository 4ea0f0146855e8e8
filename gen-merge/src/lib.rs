//! # gen-merge
//!
//! Generates `Merge` and `MergeOverride` methods for the exported structs of a
//! Go package.
//!
//! `Merge` fills every zero-valued field of the receiver from the argument;
//! `MergeOverride` copies every non-zero field of the argument over the
//! receiver. Zero values are decided from the declared type's syntax alone:
//! pointers and slices are zero only when `nil`, everything else compares
//! against `*(new(T))`.
//!
//! ## Architecture
//!
//! - [`scanner`] - Go file discovery for one package directory
//! - [`parser`] - tree-sitter parsing of package clause, imports and structs
//! - [`extractor`] - builds the [`model::PackageModel`]
//! - [`renderer`] - expands the model into Go source
//! - [`writer`] - stdout, atomic file output and staleness checks
//! - [`config`] - `gen-merge.toml` loading and CLI overrides
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,ignore
//! use gen_merge::{generate, Config};
//!
//! let source = generate("./models".as_ref(), &Config::default())?;
//! print!("{}", source);
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod scanner;
pub mod writer;

use std::path::Path;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{AnalysisError, GenMergeError, GenMergeResult, RenderError};
pub use extractor::Extractor;
pub use model::{FieldDescriptor, ImportSpec, PackageModel, StructDescriptor, TypeShape};
pub use renderer::MergeRenderer;
pub use writer::FileWriter;

/// Extract the package in `dir` and render its merge file.
pub fn generate(dir: &Path, config: &Config) -> GenMergeResult<String> {
    let model = Extractor::new(config.extract.clone()).extract_dir(dir)?;
    let content = MergeRenderer::new().render(&model)?;
    Ok(content)
}
