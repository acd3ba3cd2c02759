//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "loanstar",
    version,
    about = "Loan extract to star schema ETL",
    long_about = "Load a delimited loan extract, drop sparse columns and incomplete rows,\n\
                  and write dimension tables plus a fact table keyed by surrogate ids."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
    /// Build the star schema from an input file and load it.
    Run(RunArgs),

    /// Show inferred column types and missing counts of an input file.
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Delimited input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Field delimiter (single ASCII character).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// The file has no header row; columns are named 0, 1, ...
    #[arg(long = "no-header")]
    pub no_header: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// TOML configuration file; flags override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Drop columns with a larger percentage of missing values.
    #[arg(long = "max-missing-percent", value_name = "PERCENT")]
    pub max_missing_percent: Option<f64>,

    /// Drop columns with more missing values (after the percentage filter).
    #[arg(long = "max-missing-count", value_name = "COUNT")]
    pub max_missing_count: Option<usize>,

    /// Column to build a dimension table for (repeatable).
    #[arg(long = "dimension", value_name = "COLUMN")]
    pub dimensions: Vec<String>,

    /// Column to keep in the fact table, in order (repeatable).
    #[arg(long = "fact-column", value_name = "COLUMN")]
    pub fact_columns: Vec<String>,

    /// Output directory for the tables (default: <INPUT dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format to write.
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Database file for --format duckdb (default: <output dir>/loanstar.duckdb).
    #[arg(long = "database", value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Build and check the star schema without writing tables.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Duckdb,
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
