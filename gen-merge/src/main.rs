//! # gen-merge
//!
//! Generate Go `Merge`/`MergeOverride` methods for the structs of a package.
//!
//! ## Usage
//!
//! ```bash
//! # Print the generated file
//! gen-merge ./models
//!
//! # Write it next to the sources
//! gen-merge ./models --output ./models/genmerge_models.go
//!
//! # Fail when the checked-in file is out of date
//! gen-merge ./models --output ./models/genmerge_models.go --check
//!
//! # Print a commented default configuration
//! gen-merge --print-config > gen-merge.toml
//! ```

use clap::{ArgAction, Parser};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

use gen_merge::{
    config::{CliArgs, ConfigManager},
    error::{GenMergeError, GenMergeResult},
    generate,
    writer::{CheckResult, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "gen-merge")]
#[command(author, version, about = "Generate Go merge functions for package structs", long_about = None)]
struct Cli {
    /// Directory containing the Go package
    #[arg(required_unless_present = "print_config")]
    dir: Option<PathBuf>,

    /// Write the generated file here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compare the output file with a fresh generation instead of writing it
    #[arg(long)]
    check: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip files matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Leave fields with unsupported types out instead of failing
    #[arg(long)]
    skip_unsupported: bool,

    /// Only use the first name of multi-name field declarations
    #[arg(long)]
    first_name_only: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print a commented default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                GenMergeError::Stale { .. } => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Logs go to stderr; stdout carries only the generated file.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> GenMergeResult<()> {
    if cli.print_config {
        print!("{}", ConfigManager::default_config_content());
        return Ok(());
    }

    let Some(dir) = cli.dir else {
        return Ok(());
    };

    let config = ConfigManager::load(cli.config.as_deref())?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            output: cli.output,
            skip_unsupported: cli.skip_unsupported,
            first_name_only: cli.first_name_only,
            exclude: cli.exclude,
        },
    );

    let content = generate(&dir, &config)?;
    let writer = FileWriter::new();

    match (&config.output.file, cli.check) {
        (Some(path), true) => match writer.check(path, &content)? {
            CheckResult::UpToDate => {
                eprintln!("{} {} is up-to-date", "✓".green(), path.display());
                Ok(())
            }
            CheckResult::Stale | CheckResult::Missing => {
                eprintln!("  Run 'gen-merge {}' to update", dir.display());
                Err(GenMergeError::Stale { path: path.clone() })
            }
        },
        (None, true) => Err(GenMergeError::Usage(
            "--check needs an output file (--output or [output] file)".to_string(),
        )),
        (Some(path), false) => {
            match writer.write(path, &content)? {
                WriteResult::Written { path, bytes } => {
                    eprintln!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
                }
                WriteResult::Unchanged { path } => {
                    eprintln!("{} {} unchanged", "✓".green(), path.display());
                }
                WriteResult::Streamed { .. } => {}
            }
            Ok(())
        }
        (None, false) => {
            let stdout = std::io::stdout();
            writer.write_stream(&mut stdout.lock(), &content)?;
            Ok(())
        }
    }
}

/// Print an error with formatting.
fn print_error(error: &GenMergeError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
