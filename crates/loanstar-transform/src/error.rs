use loanstar_model::ModelError;
use thiserror::Error;

/// Errors raised while turning the typed table into a star schema.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// A value does not have the shape a named rule expects.
    #[error("rule '{rule}' failed on column '{column}' row {row}: '{value}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        rule: &'static str,
    },

    /// A fact row refers to a value its dimension does not contain.
    #[error("integrity violation: '{value}' in row {row} has no key in dimension '{dimension}'")]
    Integrity {
        dimension: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
