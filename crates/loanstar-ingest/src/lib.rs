//! Input loading for loanstar.
//!
//! Reads the delimited input into a [`Table`], infers a [`ColumnTypeMap`] and
//! re-types columns whose values are all exact dates. All failures are reported
//! as [`IngestError`].

pub mod error;
pub mod inference;
pub mod reader;
pub mod schema;

use std::time::Instant;

use loanstar_model::{ColumnTypeMap, InputConfig, Table};
use tracing::{debug, info_span};

pub use error::{IngestError, Result};
pub use inference::{generic_kind, infer_column_type, infer_column_types};
pub use reader::{ReadOptions, read_input_table, read_table, read_table_from_reader};
pub use schema::apply_column_types;

/// The input as read, its inferred types, and the re-typed table.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub raw: Table,
    pub types: ColumnTypeMap,
    pub typed: Table,
}

/// Read, infer, and re-type the configured input file.
pub fn load_typed_table(input: &InputConfig) -> Result<LoadedTable> {
    let span = info_span!("ingest", path = %input.path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let raw = read_input_table(input)?;
    let types = infer_column_types(&raw);
    let typed = apply_column_types(&raw, &types);

    debug!(
        rows = raw.height(),
        columns = raw.width(),
        duration_ms = start.elapsed().as_millis(),
        "input loaded"
    );
    Ok(LoadedTable { raw, types, typed })
}
