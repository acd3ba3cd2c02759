use thiserror::Error;

/// Structural errors raised while building tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    #[error("duplicate column name '{column}'")]
    DuplicateColumn { column: String },

    #[error("column '{column}' not found")]
    UnknownColumn { column: String },
}

/// Invalid pipeline configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_missing_percent must be within 0..=100, got {value}")]
    InvalidThreshold { value: f64 },

    #[error("delimiter '{delimiter}' is not a single ASCII character")]
    InvalidDelimiter { delimiter: char },

    #[error("fact column list is empty")]
    EmptyFactColumns,

    #[error("dimension '{name}' is configured more than once")]
    DuplicateDimension { name: String },

    #[error("fact column '{name}' is configured more than once")]
    DuplicateFactColumn { name: String },

    #[error("fact table name is empty")]
    EmptyFactTable,
}

pub type Result<T> = std::result::Result<T, ModelError>;
