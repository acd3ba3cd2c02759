//! Output error types.

use std::path::PathBuf;

use loanstar_model::ModelError;
use thiserror::Error;

/// Failure of a single [`TableSink`](crate::TableSink) write.
#[derive(Debug, Error)]
pub enum SinkError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be moved over the target.
    #[error("failed to replace {target_path} with {temp_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataframe error: {message}")]
    DataFrame { message: String },

    #[error("failed to encode JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The table name cannot be used as a file or table name.
    #[error("invalid table name '{name}'")]
    InvalidName { name: String },

    /// Database statement failed.
    #[error("database failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: duckdb::Error,
    },

    /// A database table needs at least one column.
    #[error("table '{name}' has no columns")]
    NoColumns { name: String },
}

impl From<polars::prelude::PolarsError> for SinkError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Errors from loading a star schema into a sink.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A table failed to persist. Tables in `loaded` were written before the
    /// failure and are left in place.
    #[error("failed to load table '{table}' ({} table(s) already loaded): {source}", .loaded.len())]
    Sink {
        table: String,
        loaded: Vec<String>,
        #[source]
        source: SinkError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, OutputError>;
