//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `gen-merge.toml` files
//! and merging with command-line arguments.

use crate::error::{ConfigError, GenMergeResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "gen-merge.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extraction settings.
    pub extract: ExtractConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// What to do with a field whose type shape has no zero-value classification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedFieldPolicy {
    /// Fail the run, naming the struct and field.
    #[default]
    Error,

    /// Leave the field out of the generated merge functions.
    Skip,
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Policy for maps, channels, functions, embedded fields and the like.
    pub unsupported_fields: UnsupportedFieldPolicy,

    /// Only keep the first name of a `X, Y T` declaration.
    pub first_name_only: bool,

    /// Files whose name contains this fragment are never analysed.
    pub test_file_marker: String,

    /// Glob patterns, relative to the input directory, of files to skip.
    pub exclude: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write to this file instead of stdout.
    pub file: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            unsupported_fields: UnsupportedFieldPolicy::Error,
            first_name_only: false,
            test_file_marker: "_test".to_string(),
            exclude: Vec::new(),
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without an explicit path, `gen-merge.toml` in the working directory is
    /// used if present and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> GenMergeResult<Config> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::not_found(path.to_path_buf()).into());
                }
                path.to_path_buf()
            }
            None => {
                let default_path = PathBuf::from(CONFIG_FILENAME);
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::parse(&content, &config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str, origin: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::invalid_toml(origin.to_path_buf(), e.to_string()))
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.file = Some(output.clone());
        }

        if args.skip_unsupported {
            config.extract.unsupported_fields = UnsupportedFieldPolicy::Skip;
        }

        if args.first_name_only {
            config.extract.first_name_only = true;
        }

        config.extract.exclude.extend(args.exclude.iter().cloned());

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# gen-merge configuration file

[extract]
# What to do with fields whose type has no zero-value classification
# (maps, channels, functions, interfaces, embedded fields): "error" or "skip"
unsupported_fields = "error"

# Only keep the first name of a multi-name declaration such as `X, Y int`
first_name_only = false

# Files whose name contains this fragment are never analysed
test_file_marker = "_test"

# Glob patterns (relative to the input directory) of files to skip
exclude = []

[output]
# Write the generated file here instead of stdout
# file = "genmerge_models.go"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output file override.
    pub output: Option<PathBuf>,

    /// Skip unsupported fields instead of failing.
    pub skip_unsupported: bool,

    /// Legacy multi-name handling.
    pub first_name_only: bool,

    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}
