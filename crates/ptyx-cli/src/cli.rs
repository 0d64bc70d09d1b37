//! CLI argument definitions for ptyx.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ptyx",
    version,
    about = "Inspect and maintain ptyx reconstruction settings",
    long_about = "Inspect and maintain ptyx reconstruction settings files.\n\n\
                  Settings are TOML documents with one table per settings group\n\
                  and one string entry per parameter."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file used when a command is not given one.
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a settings file holding every default value.
    Defaults(DefaultsArgs),

    /// Load a settings file and list every parameter.
    Show(ShowArgs),

    /// Re-save a settings file with path values moved to a new prefix.
    RewritePaths(RewritePathsArgs),
}

#[derive(Parser)]
pub struct DefaultsArgs {
    /// Destination file (prints to stdout when omitted).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Settings file (default: --settings, then the user settings file).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct RewritePathsArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Prefix to replace.
    #[arg(long = "find", value_name = "PREFIX")]
    pub find: PathBuf,

    /// Replacement prefix.
    #[arg(long = "replace", value_name = "PREFIX")]
    pub replace: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
