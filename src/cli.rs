// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::errors::Result;
use crate::transform::CompressorCommand;
use crate::types::FeedMode;

/// Command-line arguments for `mashwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mashwatch",
    version,
    about = "Keep minified JavaScript and CSS up to date while you edit.",
    long_about = None
)]
pub struct CliArgs {
    /// Project root: the directory containing the `.mash` file.
    #[arg(value_name = "PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Change detection strategy.
    #[arg(long, value_enum, default_value_t = FeedMode::Auto)]
    pub mode: FeedMode,

    /// Delay between two scans in poll mode, in milliseconds.
    #[arg(
        long,
        value_name = "MILLIS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: u64,

    /// Compressor command; the source path is appended and the minified
    /// output is read from stdout.
    ///
    /// Default: `java -jar yuicompressor-2.4.5.jar`, with the jar next to
    /// the `mashwatch` executable.
    #[arg(long, value_name = "COMMAND")]
    pub compressor: Option<String>,

    /// Scan once, minify whatever is stale, then exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MASHWATCH_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load the `.mash` file, print the compiled patterns, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn compressor_command(&self) -> Result<CompressorCommand> {
        match &self.compressor {
            Some(line) => CompressorCommand::parse(line),
            None => Ok(CompressorCommand::yui_compressor()),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
