//! CLI argument definitions for `addrkit`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "addrkit",
    version,
    about = "Parse, normalize and validate US postal addresses",
    long_about = "Parse free-form postal addresses into structured records.\n\n\
                  Every normalization is recorded in an audit log, and results are\n\
                  validated against a ZIP reference dataset. Addresses that do not\n\
                  validate can fall back to an international parser service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

/// Flags that override the `ADDRKIT_*` environment configuration.
#[derive(Args)]
pub struct ServiceArgs {
    /// ZIP reference dataset (CSV with zip, city, state_id, county_name).
    #[arg(long = "dataset", value_name = "CSV", global = true)]
    pub dataset: Option<PathBuf>,

    /// Base URL of a libpostal-style parser service for international input.
    #[arg(long = "libpostal-url", value_name = "URL", global = true)]
    pub libpostal_url: Option<String>,

    /// Timeout for international parser calls.
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Report a ZIP code that lies outside the parsed state as invalid.
    #[arg(long = "check-state-match", global = true)]
    pub check_state_match: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse and validate one or more addresses.
    Parse(ParseArgs),

    /// Show every normalization applied to an address.
    Audit(AuditArgs),

    /// Look up ZIP codes in the reference dataset.
    Zip(ZipArgs),

    /// Parse an address column of a CSV file.
    Batch(BatchArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    #[arg(value_name = "ADDRESS", required = true)]
    pub addresses: Vec<String>,

    /// Print results as JSON lines.
    #[arg(long = "json")]
    pub json: bool,

    /// Fall back to the international parser when the domestic result is invalid.
    #[arg(long = "auto")]
    pub auto: bool,

    /// Skip ZIP and state validation.
    #[arg(long = "no-validate", conflicts_with = "auto")]
    pub no_validate: bool,
}

#[derive(Args)]
pub struct AuditArgs {
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Print the audit trail as JSON.
    #[arg(long = "json")]
    pub json: bool,

    #[arg(long = "auto")]
    pub auto: bool,
}

#[derive(Args)]
pub struct ZipArgs {
    #[arg(value_name = "ZIP", required = true)]
    pub zips: Vec<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Input CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Column holding the address text.
    #[arg(long = "column", short = 'c')]
    pub column: String,

    /// Output CSV file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Prefix for the added columns.
    #[arg(long = "prefix", default_value = "")]
    pub prefix: String,

    /// What to do with rows that fail to parse.
    #[arg(long = "errors", value_enum, default_value = "coerce")]
    pub errors: ErrorModeArg,

    #[arg(long = "auto")]
    pub auto: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ErrorModeArg {
    /// Leave the row's output columns empty.
    Coerce,
    /// Stop at the first failing row.
    Raise,
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
