// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `adobe-bridge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "adobe-bridge",
    version,
    about = "Run ExtendScript functions inside Adobe applications through osascript.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `AdobeBridge.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ADOBE_BRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// List available payload scripts.
    #[arg(short, long)]
    pub list: bool,

    /// Print the payload script named by `--javascript`.
    #[arg(short, long, requires = "javascript")]
    pub show: bool,

    /// Payload script to show or run.
    #[arg(short, long, value_name = "NAME")]
    pub javascript: Option<String>,

    /// Payload function to run.
    #[arg(short, long = "function", value_name = "NAME")]
    pub function: Option<String>,

    /// Arguments for the function (JSON).
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    pub args: String,

    /// Decode the response, replay its log and print the result instead of
    /// the raw envelope.
    #[arg(long)]
    pub run: bool,

    /// Target application; overrides the config.
    #[arg(long, value_name = "NAME")]
    pub app: Option<String>,

    /// AppleScript timeout in seconds; overrides the config.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u32>,

    /// Print the generated AppleScript instead of running it.
    #[arg(long)]
    pub print_script: bool,

    /// Print the elapsed time when done.
    #[arg(long)]
    pub time: bool,
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
