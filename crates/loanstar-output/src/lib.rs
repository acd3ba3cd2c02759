//! Persisting star schemas.
//!
//! A [`TableSink`] replaces named tables; [`load_star_schema`] writes the
//! dimensions and then the fact table of a [`StarSchema`](loanstar_model::StarSchema).

pub mod csv_sink;
pub mod duckdb_sink;
pub mod error;
pub mod json_sink;
pub mod load;
pub mod sink;

pub use csv_sink::{CsvDirectorySink, table_to_dataframe};
pub use duckdb_sink::DuckDbSink;
pub use error::{OutputError, Result, SinkError};
pub use json_sink::{JsonDirectorySink, table_to_json};
pub use load::{LoadReport, LoadedTable, load_star_schema};
pub use sink::{MemorySink, TableSink};
