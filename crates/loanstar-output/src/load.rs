//! Loading a star schema into a sink, one table at a time.

use std::time::Instant;

use loanstar_model::StarSchema;
use tracing::{info, info_span};

use crate::error::{OutputError, Result};
use crate::sink::TableSink;

/// A table persisted by [`load_star_schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Tables in load order: dimensions first, then the fact table.
    pub tables: Vec<LoadedTable>,
}

impl LoadReport {
    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.name.clone()).collect()
    }
}

/// Replace every table of `star` in `sink`.
///
/// Stops at the first failure. Tables loaded before it are not rolled back
/// and are listed in the returned [`OutputError::Sink`].
pub fn load_star_schema(sink: &mut dyn TableSink, star: &StarSchema) -> Result<LoadReport> {
    let span = info_span!("load", sink = %sink.describe());
    let _guard = span.enter();
    let start = Instant::now();

    let mut report = LoadReport::default();
    for (name, table) in star.named_tables()? {
        sink.replace_table(&name, &table)
            .map_err(|source| OutputError::Sink {
                table: name.clone(),
                loaded: report.names(),
                source,
            })?;
        info!(table = %name, rows = table.height(), "table loaded");
        report.tables.push(LoadedTable {
            name,
            rows: table.height(),
            columns: table.width(),
        });
    }

    info!(
        tables = report.tables.len(),
        duration_ms = start.elapsed().as_millis(),
        "star schema loaded"
    );
    Ok(report)
}
