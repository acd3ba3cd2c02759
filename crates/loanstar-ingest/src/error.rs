//! Error types for loading and typing the input table.

use std::path::PathBuf;

use loanstar_model::{ConfigError, ModelError};
use thiserror::Error;

/// Errors that can occur while loading the input file.
///
/// Every variant is fatal for a pipeline run: no partial table is returned.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Malformed delimited structure (inconsistent field counts, bad UTF-8).
    #[error("failed to parse {path}{}: {message}", line_suffix(.line))]
    CsvParse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    /// The file has no header row or no columns.
    #[error("input file has no columns: {path}")]
    EmptyCsv { path: PathBuf },

    /// Rows could not be assembled into a table (e.g. duplicate headers).
    #[error("invalid table in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// The input options are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|line| format!(" (line {line})"))
        .unwrap_or_default()
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
