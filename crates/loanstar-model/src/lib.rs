//! Core types shared by the loanstar crates.
//!
//! - **cell**: the typed [`Cell`] union every row is built from
//! - **table**: immutable-by-convention [`Table`] of cells
//! - **column_type**: semantic column tags produced by type inference
//! - **star**: dimension tables, key maps, fact table, star schema
//! - **config**: the explicit [`PipelineConfig`] passed to every stage

#![deny(unsafe_code)]

pub mod cell;
pub mod column_type;
pub mod config;
pub mod error;
pub mod star;
pub mod table;

pub use cell::{Cell, CellKey, CellKind, DATE_FORMAT, DATETIME_FORMAT, DEFAULT_MISSING_MARKERS};
pub use column_type::{ColumnType, ColumnTypeMap, InferredKind};
pub use config::{InputConfig, PipelineConfig, QualityConfig, StarConfig};
pub use error::{ConfigError, ModelError, Result};
pub use star::{
    DimensionRow, DimensionTable, FactTable, KeyMap, StarSchema, dimension_table_name,
    key_column_name,
};
pub use table::Table;
